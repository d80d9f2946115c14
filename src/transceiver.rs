//! Transceptor de radio (microcontrolador puente I2C a RFM69)
//!
//! Los mensajes viajan en un paquete de hasta 61 bytes. El búfer I2C del
//! puente admite 32 bytes, así que las cargas se envían en trozos de 31 y se
//! leen en trozos de 32. Al recibir, el puente antepone tres bytes: RSSI
//! (negado) y la dirección de radio de origen en big-endian.
//!
//! Formato de los mensajes tipados (tras la cabecera):
//! - texto: `[3, len, utf8...]`
//! - entero: `[1, i32 BE, len, clave...]`
//! - real: `[2, f32 BE, len, clave...]`

use embedded_hal::delay::DelayNs;

use crate::config::IdentityCheck;
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::module::{ModuleLayout, SmartModule};
use crate::register::transceiver as regs;
use crate::types::Address;

const READY_POLL_MS: u32 = 10;
const PAYLOAD_STEP_MS: u32 = 5;
const DESTINATION_SETTLE_MS: u32 = 8;
const RESET_MS: u32 = 10;
const SPEED_STEP_MS: u32 = 10;
const FREQUENCY_STEP_MS: u32 = 5;
const RECEIVE_HEADER: usize = 3;

pub const RADIO_ADDRESS_MAX: u8 = 127;
pub const TX_POWER_MIN: i8 = -2;
pub const TX_POWER_MAX: i8 = 20;
/// Texto máximo de un mensaje de tipo texto
pub const MAXIMUM_TEXT_LENGTH: usize = regs::MAXIMUM_PAYLOAD_LENGTH - 2;
/// Clave máxima de un mensaje numérico
pub const MAXIMUM_KEY_LENGTH: usize = regs::MAXIMUM_PAYLOAD_LENGTH - 6;

const TYPE_INT: u8 = 1;
const TYPE_FLOAT: u8 = 2;
const TYPE_TEXT: u8 = 3;

/// Velocidad de transmisión por aire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadioSpeed {
    /// 9,6 kbps
    Low,
    /// 115,2 kbps
    #[default]
    Medium,
    /// 300 kbps
    High,
}

impl RadioSpeed {
    /// Nivel 1, 2 o 3
    pub fn from_level(level: u8) -> Result<Self, PiicoDevError> {
        match level {
            1 => Ok(RadioSpeed::Low),
            2 => Ok(RadioSpeed::Medium),
            3 => Ok(RadioSpeed::High),
            _ => Err(PiicoDevError::InvalidParameter("la velocidad debe ser 1, 2 o 3")),
        }
    }

    /// Registros BITRATE `(MSB, LSB)` del RFM69
    fn bitrate(self) -> (u8, u8) {
        match self {
            RadioSpeed::Low => (0x0D, 0x05),
            RadioSpeed::Medium => (0x01, 0x16),
            RadioSpeed::High => (0x00, 0x6B),
        }
    }
}

/// Frecuencia portadora en MHz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadioFrequency {
    Mhz915,
    Mhz918,
    #[default]
    Mhz922,
    Mhz925,
    Mhz928,
}

impl RadioFrequency {
    pub fn from_mhz(mhz: u16) -> Result<Self, PiicoDevError> {
        match mhz {
            915 => Ok(RadioFrequency::Mhz915),
            918 => Ok(RadioFrequency::Mhz918),
            922 => Ok(RadioFrequency::Mhz922),
            925 => Ok(RadioFrequency::Mhz925),
            928 => Ok(RadioFrequency::Mhz928),
            _ => Err(PiicoDevError::InvalidParameter(
                "frecuencia no soportada (915, 918, 922, 925 o 928 MHz)",
            )),
        }
    }

    pub fn mhz(self) -> u16 {
        match self {
            RadioFrequency::Mhz915 => 915,
            RadioFrequency::Mhz918 => 918,
            RadioFrequency::Mhz922 => 922,
            RadioFrequency::Mhz925 => 925,
            RadioFrequency::Mhz928 => 928,
        }
    }

    /// Registros FRF `(MSB, MID, LSB)` del RFM69
    fn frf(self) -> [u8; 3] {
        match self {
            RadioFrequency::Mhz915 => [0xE4, 0xC0, 0x00],
            RadioFrequency::Mhz918 => [0xE5, 0x80, 0x00],
            RadioFrequency::Mhz922 => [0xE6, 0x80, 0x00],
            RadioFrequency::Mhz925 => [0xE7, 0x40, 0x00],
            RadioFrequency::Mhz928 => [0xE8, 0x00, 0x00],
        }
    }
}

/// Mensaje tipado
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    /// Entero con clave opcional (vacía si no hay)
    Int { key: String, value: i32 },
    Float { key: String, value: f32 },
    /// Tipo desconocido o carga truncada
    Unknown { kind: u8, data: Vec<u8> },
}

impl Message {
    /// Codifica el mensaje, truncando el texto o la clave al máximo admitido
    pub fn encode(&self) -> Result<Vec<u8>, PiicoDevError> {
        let mut out = Vec::with_capacity(regs::MAXIMUM_PAYLOAD_LENGTH);
        match self {
            Message::Text(text) => {
                let text = truncate_utf8(text, MAXIMUM_TEXT_LENGTH);
                out.push(TYPE_TEXT);
                out.push(text.len() as u8);
                out.extend_from_slice(text.as_bytes());
            }
            Message::Int { key, value } => {
                let key = truncate_utf8(key, MAXIMUM_KEY_LENGTH);
                out.push(TYPE_INT);
                out.extend_from_slice(&value.to_be_bytes());
                out.push(key.len() as u8);
                out.extend_from_slice(key.as_bytes());
            }
            Message::Float { key, value } => {
                let key = truncate_utf8(key, MAXIMUM_KEY_LENGTH);
                out.push(TYPE_FLOAT);
                out.extend_from_slice(&value.to_be_bytes());
                out.push(key.len() as u8);
                out.extend_from_slice(key.as_bytes());
            }
            Message::Unknown { .. } => {
                return Err(PiicoDevError::InvalidParameter("tipo de mensaje no transmisible"));
            }
        }
        Ok(out)
    }

    /// Decodifica el cuerpo del mensaje (sin la cabecera de recepción)
    pub fn decode(body: &[u8]) -> Self {
        let kind = body.first().copied().unwrap_or_default();
        let numeric = |body: &[u8]| -> Option<([u8; 4], String)> {
            let value: [u8; 4] = body.get(1..5)?.try_into().ok()?;
            let key = String::from_utf8_lossy(body.get(6..).unwrap_or_default()).into_owned();
            Some((value, key))
        };
        let parsed = match kind {
            TYPE_INT => numeric(body).map(|(v, key)| Message::Int {
                key,
                value: i32::from_be_bytes(v),
            }),
            TYPE_FLOAT => numeric(body).map(|(v, key)| Message::Float {
                key,
                value: f32::from_be_bytes(v),
            }),
            TYPE_TEXT if body.len() >= 2 => {
                Some(Message::Text(String::from_utf8_lossy(&body[2..]).into_owned()))
            }
            _ => None,
        };
        parsed.unwrap_or_else(|| {
            log::warn!("Carga de radio no reconocida (tipo {})", kind);
            Message::Unknown {
                kind,
                data: body.to_vec(),
            }
        })
    }
}

/// Recorta a `max` bytes sin partir un carácter
fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Paquete recibido
#[derive(Debug, Clone, PartialEq)]
pub struct Received<T> {
    /// Intensidad de señal en dBm
    pub rssi: i16,
    pub source_radio_address: u16,
    pub payload: T,
}

#[derive(Debug, Clone, Copy)]
pub struct TransceiverConfig {
    pub address: Address,
    /// Red de radio (solo se comunican módulos del mismo grupo)
    pub group: u8,
    /// Dirección de radio del módulo (se satura a 127)
    pub radio_address: u8,
    pub speed: RadioSpeed,
    pub frequency: RadioFrequency,
    /// Potencia de transmisión en dBm (-2..=20)
    pub tx_power: i8,
    /// Espera máxima a que el puente esté listo
    pub ready_timeout_ms: u32,
    pub identity: IdentityCheck,
}

impl Default for TransceiverConfig {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::BASE_ADDRESS),
            group: 0,
            radio_address: 0,
            speed: RadioSpeed::Medium,
            frequency: RadioFrequency::Mhz922,
            tx_power: 20,
            ready_timeout_ms: 1000,
            identity: IdentityCheck::default(),
        }
    }
}

pub struct Transceiver<I, D> {
    module: SmartModule<I, D>,
    speed: RadioSpeed,
    frequency: RadioFrequency,
    ready_timeout_ms: u32,
}

impl<I, D, E> Transceiver<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    pub fn new(interface: I, delay: D, config: TransceiverConfig) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::BASE_ADDRESS);
        let layout = ModuleLayout {
            all_writes_flagged: true,
            ..Default::default()
        };
        let mut radio = Self {
            module: SmartModule::new(DeviceHandle::new(interface, delay, address), layout),
            speed: config.speed,
            frequency: config.frequency,
            ready_timeout_ms: config.ready_timeout_ms,
        };
        radio.module.verify(config.identity, &[regs::DEVICE_ID])?;
        radio.module.set_led(true)?;
        radio.module.write_u16(
            regs::RFM69_NODE_ID,
            config.radio_address.min(RADIO_ADDRESS_MAX) as u16,
        )?;
        radio.wait_ready()?;
        radio.module.write_u8(regs::RFM69_NETWORK_ID, config.group)?;
        radio.set_radio_frequency(config.frequency)?;
        radio.set_speed(config.speed)?;
        radio.set_tx_power(config.tx_power)?;
        Ok(radio)
    }

    pub fn transceiver_ready(&mut self) -> Result<bool, PiicoDevError> {
        Ok(self.module.read_u8(regs::TRANSCEIVER_READY)? != 0)
    }

    /// Sondea el puente cada 10 ms hasta que esté listo o venza el plazo
    pub fn wait_ready(&mut self) -> Result<(), PiicoDevError> {
        let attempts = self.ready_timeout_ms / READY_POLL_MS + 1;
        for _ in 0..attempts {
            if self.transceiver_ready()? {
                return Ok(());
            }
            self.module.delay_ms(READY_POLL_MS);
        }
        log::error!(
            "El transceptor en {:#04x} no está listo tras {} ms",
            self.module.address(),
            self.ready_timeout_ms
        );
        Err(PiicoDevError::Timeout)
    }

    pub fn rfm69_register(&mut self, register: u8) -> Result<u8, PiicoDevError> {
        self.module.write_u8(regs::RFM69_REG, register)?;
        self.module.read_u8(regs::RFM69_VALUE)
    }

    pub fn set_rfm69_register(&mut self, register: u8, value: u8) -> Result<(), PiicoDevError> {
        self.module.write_u8(regs::RFM69_REG, register)?;
        self.module.write_u8(regs::RFM69_VALUE, value)
    }

    pub fn speed(&self) -> RadioSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: RadioSpeed) -> Result<(), PiicoDevError> {
        let (msb, lsb) = speed.bitrate();
        self.module.delay_ms(SPEED_STEP_MS);
        self.set_rfm69_register(regs::RFM69_BITRATE_MSB, msb)?;
        self.module.delay_ms(SPEED_STEP_MS);
        self.set_rfm69_register(regs::RFM69_BITRATE_LSB, lsb)?;
        self.module.delay_ms(SPEED_STEP_MS);
        self.speed = speed;
        Ok(())
    }

    pub fn radio_frequency(&self) -> RadioFrequency {
        self.frequency
    }

    pub fn set_radio_frequency(&mut self, frequency: RadioFrequency) -> Result<(), PiicoDevError> {
        self.wait_ready()?;
        let registers = [regs::RFM69_FRF_MSB, regs::RFM69_FRF_MID, regs::RFM69_FRF_LSB];
        for (register, value) in registers.into_iter().zip(frequency.frf()) {
            self.module.delay_ms(FREQUENCY_STEP_MS);
            self.set_rfm69_register(register, value)?;
        }
        self.module.delay_ms(FREQUENCY_STEP_MS);
        self.frequency = frequency;
        Ok(())
    }

    /// Potencia de transmisión en dBm
    pub fn tx_power(&mut self) -> Result<i8, PiicoDevError> {
        self.wait_ready()?;
        Ok(self.module.read_u8(regs::TX_POWER)? as i8)
    }

    /// Fija la potencia, saturada a -2..=20 dBm
    pub fn set_tx_power(&mut self, dbm: i8) -> Result<(), PiicoDevError> {
        let dbm = dbm.clamp(TX_POWER_MIN, TX_POWER_MAX);
        self.wait_ready()?;
        self.module.write_u8(regs::TX_POWER, dbm as u8)
    }

    /// Grupo configurado; solo se fija al construir porque el puente se reinicia
    pub fn group(&mut self) -> Result<u8, PiicoDevError> {
        self.module.read_u8(regs::RFM69_NETWORK_ID)
    }

    pub fn radio_address(&mut self) -> Result<u16, PiicoDevError> {
        self.module.read_u16(regs::RFM69_NODE_ID)
    }

    pub fn destination_radio_address(&mut self) -> Result<u16, PiicoDevError> {
        self.module.read_u16(regs::RFM69_TO_NODE_ID)
    }

    fn set_destination(&mut self, radio_address: u8) -> Result<(), PiicoDevError> {
        if radio_address > RADIO_ADDRESS_MAX {
            return Err(PiicoDevError::InvalidParameter(
                "la dirección de radio debe estar en 0..=127",
            ));
        }
        self.module
            .write_u16(regs::RFM69_TO_NODE_ID, radio_address as u16)
    }

    /// Envía un mensaje tipado. `radio_address == 0` difunde a todo el grupo.
    pub fn send(&mut self, message: &Message, radio_address: u8) -> Result<(), PiicoDevError> {
        let payload = message.encode()?;
        self.set_destination(radio_address)?;
        self.module.delay_ms(DESTINATION_SETTLE_MS);
        self.send_payload(&payload)
    }

    /// Envía bytes sin formato
    pub fn send_bytes(&mut self, data: &[u8], radio_address: u8) -> Result<(), PiicoDevError> {
        if data.len() > regs::MAXIMUM_PAYLOAD_LENGTH {
            return Err(PiicoDevError::InvalidParameter("la carga supera los 61 bytes"));
        }
        self.set_destination(radio_address)?;
        self.send_payload(data)
    }

    fn send_payload(&mut self, payload: &[u8]) -> Result<(), PiicoDevError> {
        self.module
            .write_u8(regs::PAYLOAD_LENGTH, payload.len() as u8)?;
        self.module.delay_ms(PAYLOAD_STEP_MS);
        for chunk in payload.chunks(regs::MAXIMUM_I2C_SIZE - 1) {
            self.module.write(regs::PAYLOAD, chunk)?;
            self.module.delay_ms(PAYLOAD_STEP_MS);
        }
        self.module.write_u8(regs::PAYLOAD_GO, 1)
    }

    /// Lee el paquete pendiente, cabecera incluida
    fn receive_payload(&mut self) -> Result<Option<Vec<u8>>, PiicoDevError> {
        if self.module.read_u8(regs::PAYLOAD_NEW)? != 1 {
            return Ok(None);
        }
        let length = self.module.read_u8(regs::PAYLOAD_LENGTH)? as usize + RECEIVE_HEADER;
        self.module.delay_ms(PAYLOAD_STEP_MS);
        let mut payload = vec![0u8; length];
        for chunk in payload.chunks_mut(regs::MAXIMUM_I2C_SIZE) {
            self.module.dev.read_regs(regs::PAYLOAD, chunk)?;
            self.module.delay_ms(PAYLOAD_STEP_MS);
        }
        Ok(Some(payload))
    }

    fn split_header(payload: &[u8]) -> (i16, u16, &[u8]) {
        let rssi = -(payload[0] as i16);
        let source = u16::from_be_bytes([payload[1], payload[2]]);
        (rssi, source, &payload[RECEIVE_HEADER..])
    }

    /// Devuelve el mensaje tipado pendiente, si lo hay
    pub fn receive(&mut self) -> Result<Option<Received<Message>>, PiicoDevError> {
        Ok(self.receive_payload()?.map(|payload| {
            let (rssi, source_radio_address, body) = Self::split_header(&payload);
            Received {
                rssi,
                source_radio_address,
                payload: Message::decode(body),
            }
        }))
    }

    /// Devuelve los bytes pendientes sin interpretar, si los hay
    pub fn receive_bytes(&mut self) -> Result<Option<Received<Vec<u8>>>, PiicoDevError> {
        Ok(self.receive_payload()?.map(|payload| {
            let (rssi, source_radio_address, body) = Self::split_header(&payload);
            Received {
                rssi,
                source_radio_address,
                payload: body.to_vec(),
            }
        }))
    }

    fn set_radio_state(&mut self, on: bool) -> Result<(), PiicoDevError> {
        self.module.delay_ms(PAYLOAD_STEP_MS);
        self.module.write_u8(regs::RFM69_RADIO_STATE, on as u8)?;
        self.module.delay_ms(PAYLOAD_STEP_MS);
        Ok(())
    }

    pub fn on(&mut self) -> Result<(), PiicoDevError> {
        self.set_radio_state(true)
    }

    pub fn off(&mut self) -> Result<(), PiicoDevError> {
        self.set_radio_state(false)
    }

    pub fn rfm69_reset(&mut self) -> Result<(), PiicoDevError> {
        self.module.write_u8(regs::RFM69_RESET, 1)?;
        self.module.delay_ms(RESET_MS);
        Ok(())
    }

    pub fn led(&mut self) -> Result<bool, PiicoDevError> {
        self.module.led()
    }

    pub fn set_led(&mut self, on: bool) -> Result<(), PiicoDevError> {
        self.module.set_led(on)
    }

    pub fn whoami(&mut self) -> Result<u16, PiicoDevError> {
        self.module.whoami()
    }

    pub fn firmware(&mut self) -> Result<(u8, u8), PiicoDevError> {
        self.module.firmware()
    }

    pub fn set_i2c_address(&mut self, new_address: u8) -> Result<(), PiicoDevError> {
        self.module.set_i2c_address(new_address)
    }

    pub fn address(&self) -> u8 {
        self.module.address()
    }

    pub fn release(self) -> (I, D) {
        self.module.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::UnifiedI2c;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x1A;

    fn rfm(reg: u8, value: u8) -> [I2cTransaction; 2] {
        [
            I2cTransaction::write(ADDR, vec![0x98, reg]),
            I2cTransaction::write(ADDR, vec![0x99, value]),
        ]
    }

    fn ready() -> I2cTransaction {
        I2cTransaction::write_read(ADDR, vec![0x25], vec![0x01])
    }

    fn init_expectations() -> Vec<I2cTransaction> {
        let mut e = vec![
            I2cTransaction::write_read(ADDR, vec![0x01], vec![0x01, 0xEF]),
            I2cTransaction::write(ADDR, vec![0x85, 0x01]),
            I2cTransaction::write(ADDR, vec![0x95, 0x00, 0x00]),
            ready(),
            I2cTransaction::write(ADDR, vec![0x96, 0x00]),
            ready(),
        ];
        e.extend(rfm(0x07, 0xE6));
        e.extend(rfm(0x08, 0x80));
        e.extend(rfm(0x09, 0x00));
        e.extend(rfm(0x03, 0x01));
        e.extend(rfm(0x04, 0x16));
        e.push(ready());
        e.push(I2cTransaction::write(ADDR, vec![0x93, 20]));
        e
    }

    fn radio(expectations: &[I2cTransaction]) -> (I2cMock, Transceiver<UnifiedI2c<I2cMock>, NoopDelay>) {
        let i2c = I2cMock::new(expectations);
        let radio = Transceiver::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default())
            .unwrap();
        (i2c, radio)
    }

    #[test]
    fn test_init_sequence() {
        let (mut i2c, radio) = radio(&init_expectations());
        assert_eq!(radio.radio_frequency().mhz(), 922);
        assert_eq!(radio.speed(), RadioSpeed::Medium);
        i2c.done();
    }

    #[test]
    fn test_ready_timeout() {
        let mut expectations = init_expectations();
        expectations.extend(std::iter::repeat_with(|| {
            I2cTransaction::write_read(ADDR, vec![0x25], vec![0x00])
        })
        .take(101));
        let (mut i2c, mut radio) = radio(&expectations);
        assert_eq!(radio.wait_ready(), Err(PiicoDevError::Timeout));
        i2c.done();
    }

    #[test]
    fn test_send_text() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write(ADDR, vec![0x97, 0x00, 0x05]),
            I2cTransaction::write(ADDR, vec![0xA1, 7]),
            I2cTransaction::write(ADDR, vec![0xA2, 3, 5, b'h', b'e', b'l', b'l', b'o']),
            I2cTransaction::write(ADDR, vec![0xA4, 1]),
        ]);
        let (mut i2c, mut radio) = radio(&expectations);
        radio.send(&Message::Text("hello".into()), 5).unwrap();
        assert!(radio.send(&Message::Text("x".into()), 128).is_err());
        i2c.done();
    }

    #[test]
    fn test_payload_chunking() {
        let data: Vec<u8> = (0..40).collect();
        let mut received = vec![20, 0x00, 0x07];
        received.extend_from_slice(&data[..37]);

        let mut first = vec![0xA2];
        first.extend_from_slice(&data[..31]);
        let mut second = vec![0xA2];
        second.extend_from_slice(&data[31..]);

        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write(ADDR, vec![0x97, 0x00, 0x00]),
            I2cTransaction::write(ADDR, vec![0xA1, 40]),
            I2cTransaction::write(ADDR, first),
            I2cTransaction::write(ADDR, second),
            I2cTransaction::write(ADDR, vec![0xA4, 1]),
            I2cTransaction::write_read(ADDR, vec![0x23], vec![0x01]),
            I2cTransaction::write_read(ADDR, vec![0x21], vec![37]),
            I2cTransaction::write_read(ADDR, vec![0x22], received[..32].to_vec()),
            I2cTransaction::write_read(ADDR, vec![0x22], received[32..].to_vec()),
            I2cTransaction::write_read(ADDR, vec![0x23], vec![0x00]),
        ]);
        let (mut i2c, mut radio) = radio(&expectations);
        radio.send_bytes(&data, 0).unwrap();

        let packet = radio.receive_bytes().unwrap().unwrap();
        assert_eq!(packet.rssi, -20);
        assert_eq!(packet.source_radio_address, 7);
        assert_eq!(packet.payload, data[..37].to_vec());
        assert!(radio.receive_bytes().unwrap().is_none());
        i2c.done();
    }

    #[test]
    fn test_receive_typed() {
        let mut packet = vec![45, 0x00, 0x02, 1];
        packet.extend_from_slice(&(-42i32).to_be_bytes());
        packet.extend_from_slice(&[3, b'k', b'e', b'y']);

        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0x23], vec![0x01]),
            I2cTransaction::write_read(ADDR, vec![0x21], vec![(packet.len() - 3) as u8]),
            I2cTransaction::write_read(ADDR, vec![0x22], packet.clone()),
        ]);
        let (mut i2c, mut radio) = radio(&expectations);
        let received = radio.receive().unwrap().unwrap();
        assert_eq!(received.rssi, -45);
        assert_eq!(received.source_radio_address, 2);
        assert_eq!(
            received.payload,
            Message::Int {
                key: "key".into(),
                value: -42
            }
        );
        i2c.done();
    }

    #[test]
    fn test_message_encoding() {
        let float = Message::Float {
            key: String::new(),
            value: 1.5,
        };
        let encoded = float.encode().unwrap();
        assert_eq!(encoded, vec![2, 0x3F, 0xC0, 0x00, 0x00, 0]);
        assert_eq!(Message::decode(&encoded), float);

        let long = "é".repeat(40);
        let encoded = Message::Text(long).encode().unwrap();
        assert_eq!(encoded[1], 58);
        assert_eq!(encoded.len(), 60);

        assert!(matches!(Message::decode(&[1, 0, 0]), Message::Unknown { kind: 1, .. }));
    }

    #[test]
    fn test_config_validation() {
        assert!(RadioFrequency::from_mhz(900).is_err());
        assert_eq!(RadioFrequency::from_mhz(915).unwrap(), RadioFrequency::Mhz915);
        assert!(RadioSpeed::from_level(0).is_err());
    }
}
