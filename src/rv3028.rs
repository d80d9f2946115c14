//! Reloj de tiempo real RV3028 con supercondensador
//!
//! Fecha y hora en BCD (24 h o AM/PM), contador UNIX independiente, marca de
//! tiempo de eventos en el pin EVI, alarma por minutos/horas/día y salida de
//! reloj configurable.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::conversion::{
    bcd_decode, bcd_encode, clear_bit, read_bit, set_bit, write_bit, write_crumb, write_tribit,
};
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::rv3028 as regs;
use crate::types::Address;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Índice 0..=6 de un nombre de día de la semana
pub fn weekday_from_name(name: &str) -> Option<u8> {
    WEEKDAY_NAMES.iter().position(|d| *d == name).map(|i| i as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourFormat {
    #[default]
    H24,
    Am,
    Pm,
}

/// Fecha y hora del calendario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// Año completo (2000..=2099)
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// 0 = lunes ... 6 = domingo
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub format: HourFormat,
}

impl Default for DateTime {
    fn default() -> Self {
        Self {
            year: 2000,
            month: 1,
            day: 1,
            weekday: 0,
            hour: 0,
            minute: 0,
            second: 0,
            format: HourFormat::H24,
        }
    }
}

impl DateTime {
    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[(self.weekday % 7) as usize]
    }

    pub fn set_weekday_name(&mut self, name: &str) -> Result<(), PiicoDevError> {
        self.weekday = weekday_from_name(name).ok_or(PiicoDevError::InvalidParameter(
            "el día debe ser Monday, Tuesday, ... o Sunday",
        ))?;
        Ok(())
    }

    fn validate(&self) -> Result<(), PiicoDevError> {
        let hour_ok = match self.format {
            HourFormat::H24 => self.hour <= 23,
            _ => (1..=12).contains(&self.hour),
        };
        if !hour_ok {
            return Err(PiicoDevError::InvalidParameter("hora fuera de rango"));
        }
        if self.minute > 59 || self.second > 59 {
            return Err(PiicoDevError::InvalidParameter("minutos o segundos fuera de 0..=59"));
        }
        if !(1..=31).contains(&self.day) || !(1..=12).contains(&self.month) {
            return Err(PiicoDevError::InvalidParameter("fecha fuera de rango"));
        }
        if self.weekday > 6 {
            return Err(PiicoDevError::InvalidParameter("el día de la semana debe estar en 0..=6"));
        }
        if !(2000..=2099).contains(&self.year) && self.year > 99 {
            return Err(PiicoDevError::InvalidParameter("el año debe estar en 2000..=2099"));
        }
        Ok(())
    }

    fn year_two_digits(&self) -> u8 {
        (self.year % 100) as u8
    }
}

/// `YYYY-MM-DD HH:MM:SS`, con ` AM`/` PM` en formato de 12 horas
impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        match self.format {
            HourFormat::H24 => Ok(()),
            HourFormat::Am => write!(f, " AM"),
            HourFormat::Pm => write!(f, " PM"),
        }
    }
}

/// Resistencia del cargador del supercondensador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrickleResistor {
    #[default]
    R3k,
    R5k,
    R9k,
    R15k,
}

impl TrickleResistor {
    fn code(self) -> u8 {
        match self {
            TrickleResistor::R3k => 0b00,
            TrickleResistor::R5k => 0b01,
            TrickleResistor::R9k => 0b10,
            TrickleResistor::R15k => 0b11,
        }
    }
}

/// Frecuencia del pin CLKOUT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockOutput {
    Hz32768,
    Hz8192,
    Hz1024,
    Hz64,
    Hz32,
    Hz1,
    Off,
}

impl ClockOutput {
    pub fn from_hz(hz: u32) -> Result<Self, PiicoDevError> {
        match hz {
            32768 => Ok(ClockOutput::Hz32768),
            8192 => Ok(ClockOutput::Hz8192),
            1024 => Ok(ClockOutput::Hz1024),
            64 => Ok(ClockOutput::Hz64),
            32 => Ok(ClockOutput::Hz32),
            1 => Ok(ClockOutput::Hz1),
            0 => Ok(ClockOutput::Off),
            _ => Err(PiicoDevError::InvalidParameter(
                "CLKOUT debe ser 32768, 8192, 1024, 64, 32, 1 o 0 Hz",
            )),
        }
    }

    fn code(self) -> u8 {
        match self {
            ClockOutput::Hz32768 => 0,
            ClockOutput::Hz8192 => 1,
            ClockOutput::Hz1024 => 2,
            ClockOutput::Hz64 => 3,
            ClockOutput::Hz32 => 4,
            ClockOutput::Hz1 => 5,
            ClockOutput::Off => 7,
        }
    }
}

/// Flanco activo del pin EVI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventEdge {
    /// La placa tiene pull-up en EVI
    #[default]
    Falling,
    Rising,
}

/// Campo de día de la alarma
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmDay {
    /// Día de la semana 0..=6
    Weekday(u8),
    /// Día del mes 1..=31
    Date(u8),
}

/// Campos que compara la alarma; `None` los deja fuera de la comparación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alarm {
    pub minutes: Option<u8>,
    pub hours: Option<u8>,
    /// Solo se usa si el reloj está en formato de 12 horas
    pub pm: bool,
    pub day: Option<AlarmDay>,
    /// Activa la salida de la alarma en el pin INT
    pub interrupt: bool,
}

impl Default for Alarm {
    fn default() -> Self {
        Self {
            minutes: None,
            hours: None,
            pm: false,
            day: None,
            interrupt: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rv3028Config {
    pub address: Address,
    pub battery_switchover: bool,
    pub trickle_resistor: TrickleResistor,
    pub trickle_charger: bool,
}

impl Default for Rv3028Config {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::I2C_ADDRESS),
            battery_switchover: true,
            trickle_resistor: TrickleResistor::R3k,
            trickle_charger: true,
        }
    }
}

pub struct Rv3028<I, D> {
    dev: DeviceHandle<I, D>,
}

impl<I, D, E> Rv3028<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    /// Lee el registro de identidad (un fallo aquí se propaga) y configura la
    /// conmutación a batería y el cargador del supercondensador
    pub fn new(interface: I, delay: D, config: Rv3028Config) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::I2C_ADDRESS);
        let mut rtc = Self {
            dev: DeviceHandle::new(interface, delay, address),
        };
        let part = rtc.dev.read_reg(regs::ID).map_err(|e| {
            log::error!("RV3028 no responde en {:#04x}", address);
            e
        })?;
        log::debug!("RV3028 id {:#04x}", part);

        rtc.set_battery_switchover(config.battery_switchover)?;
        rtc.config_trickle_charger(config.trickle_resistor)?;
        rtc.set_trickle_charger(config.trickle_charger)?;
        Ok(rtc)
    }

    pub fn unix_time(&mut self) -> Result<u32, PiicoDevError> {
        let mut buf = [0u8; 4];
        self.dev.read_regs(regs::UNIX, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn set_unix_time(&mut self, time: u32) -> Result<(), PiicoDevError> {
        self.dev.write_regs(regs::UNIX, &time.to_le_bytes())
    }

    /// Conmutación automática a la reserva cuando cae la alimentación
    pub fn set_battery_switchover(&mut self, enable: bool) -> Result<(), PiicoDevError> {
        let mode = if enable { 0b01 } else { 0b00 };
        self.dev
            .modify_reg(regs::EE_BACKUP, |v| write_crumb(v, regs::BACKUP_BSM, mode))?;
        Ok(())
    }

    pub fn set_trickle_charger(&mut self, enable: bool) -> Result<(), PiicoDevError> {
        self.dev
            .modify_reg(regs::EE_BACKUP, |v| write_bit(v, regs::BACKUP_TCE, enable))?;
        Ok(())
    }

    pub fn config_trickle_charger(&mut self, resistor: TrickleResistor) -> Result<(), PiicoDevError> {
        self.dev.modify_reg(regs::EE_BACKUP, |v| {
            write_crumb(set_bit(v, regs::BACKUP_EEOFFSET), regs::BACKUP_TCR, resistor.code())
        })?;
        Ok(())
    }

    pub fn config_clock_output(&mut self, clock: ClockOutput) -> Result<(), PiicoDevError> {
        self.dev
            .modify_reg(regs::EE_CLKOUT, |v| write_tribit(v, 0, clock.code()))?;
        Ok(())
    }

    /// Borra el flag de evento y rearma la captura de la marca de tiempo en EVI
    pub fn reset_event_interrupt(&mut self, edge: EventEdge) -> Result<(), PiicoDevError> {
        self.dev
            .modify_reg(regs::STATUS, |v| clear_bit(v, regs::STATUS_EVF))?;

        // fuente externa, se conserva el primer evento, reinicio de la marca
        self.dev.modify_reg(regs::ECTRL, |v| {
            let v = clear_bit(v, regs::ECTRL_TSS);
            let v = write_bit(v, regs::ECTRL_EHL, edge == EventEdge::Rising);
            let v = clear_bit(v, regs::ECTRL_TSOW);
            set_bit(v, regs::ECTRL_TSR)
        })?;

        self.dev.modify_reg(regs::CTRL2, |v| {
            set_bit(set_bit(v, regs::CTRL2_EIE), regs::CTRL2_TSE)
        })?;
        Ok(())
    }

    /// Se ha registrado un evento en EVI
    pub fn event_interrupt(&mut self) -> Result<bool, PiicoDevError> {
        Ok(read_bit(self.dev.read_reg(regs::STATUS)?, regs::STATUS_EVF))
    }

    fn twelve_hour_mode(&mut self) -> Result<bool, PiicoDevError> {
        Ok(read_bit(self.dev.read_reg(regs::CTRL2)?, regs::CTRL2_12_24))
    }

    fn decode_hour(hour: u8, twelve_hour: bool) -> (u8, HourFormat) {
        if !twelve_hour {
            (bcd_decode(hour), HourFormat::H24)
        } else if read_bit(hour, regs::HOUR_PM) {
            (bcd_decode(clear_bit(hour, regs::HOUR_PM)), HourFormat::Pm)
        } else {
            (bcd_decode(hour), HourFormat::Am)
        }
    }

    pub fn date_time(&mut self) -> Result<DateTime, PiicoDevError> {
        let mut t = [0u8; 7];
        self.dev.read_regs(regs::SEC, &mut t)?;
        let twelve_hour = self.twelve_hour_mode()?;
        let (hour, format) = Self::decode_hour(t[2], twelve_hour);
        Ok(DateTime {
            year: 2000 + bcd_decode(t[6]) as u16,
            month: bcd_decode(t[5]),
            day: bcd_decode(t[4]),
            weekday: t[3],
            hour,
            minute: bcd_decode(t[1]),
            second: bcd_decode(t[0]),
            format,
        })
    }

    /// Marca de tiempo del último evento en EVI. El registro no guarda el día
    /// de la semana, que se devuelve a 0.
    pub fn event_timestamp(&mut self) -> Result<DateTime, PiicoDevError> {
        let mut t = [0u8; 6];
        self.dev.read_regs(regs::SECTS, &mut t)?;
        let twelve_hour = self.twelve_hour_mode()?;
        let (hour, format) = Self::decode_hour(t[2], twelve_hour);
        Ok(DateTime {
            year: 2000 + bcd_decode(t[5]) as u16,
            month: bcd_decode(t[4]),
            day: bcd_decode(t[3]),
            weekday: 0,
            hour,
            minute: bcd_decode(t[1]),
            second: bcd_decode(t[0]),
            format,
        })
    }

    /// Escribe fecha y hora; el formato de 12/24 horas del reloj pasa a ser el de `dt`
    pub fn set_date_time(&mut self, dt: &DateTime) -> Result<(), PiicoDevError> {
        dt.validate()?;
        let twelve_hour = dt.format != HourFormat::H24;
        let hour = match dt.format {
            HourFormat::Pm => set_bit(bcd_encode(dt.hour), regs::HOUR_PM),
            _ => bcd_encode(dt.hour),
        };
        self.dev
            .modify_reg(regs::CTRL2, |v| write_bit(v, regs::CTRL2_12_24, twelve_hour))?;
        self.dev.write_regs(
            regs::SEC,
            &[
                bcd_encode(dt.second),
                bcd_encode(dt.minute),
                hour,
                dt.weekday,
                bcd_encode(dt.day),
                bcd_encode(dt.month),
                bcd_encode(dt.year_two_digits()),
            ],
        )
    }

    /// Fecha y hora como texto
    pub fn timestamp(&mut self) -> Result<String, PiicoDevError> {
        Ok(self.date_time()?.to_string())
    }

    pub fn event_timestamp_string(&mut self) -> Result<String, PiicoDevError> {
        Ok(self.event_timestamp()?.to_string())
    }

    /// Programa la alarma. Los campos a `None` quedan deshabilitados (bit 7 a 1).
    pub fn alarm_setup(&mut self, alarm: &Alarm) -> Result<(), PiicoDevError> {
        if alarm.minutes.is_some_and(|m| m > 59) {
            return Err(PiicoDevError::InvalidParameter("minutos de alarma fuera de 0..=59"));
        }
        if alarm.hours.is_some_and(|h| h > 23) {
            return Err(PiicoDevError::InvalidParameter("hora de alarma fuera de 0..=23"));
        }
        let (by_date, day) = match alarm.day {
            Some(AlarmDay::Weekday(d)) if d <= 6 => (false, Some(d)),
            Some(AlarmDay::Date(d)) if (1..=31).contains(&d) => (true, Some(d)),
            Some(_) => {
                return Err(PiicoDevError::InvalidParameter("día de alarma fuera de rango"))
            }
            None => (false, None),
        };

        self.dev
            .modify_reg(regs::CTRL1, |v| write_bit(v, regs::CTRL1_WADA, by_date))?;
        let ctrl2 = self.dev.read_reg(regs::CTRL2)?;

        let field = |value: Option<u8>| match value {
            Some(v) => bcd_encode(v),
            None => set_bit(0, regs::ALARM_DISABLE),
        };
        let mut hours = field(alarm.hours);
        if alarm.hours.is_some() && read_bit(ctrl2, regs::CTRL2_12_24) {
            hours = write_bit(hours, regs::HOUR_PM, alarm.pm);
        }
        self.dev
            .write_regs(regs::ALMIN, &[field(alarm.minutes), hours, field(day)])?;
        self.dev
            .write_reg(regs::CTRL2, write_bit(ctrl2, regs::CTRL2_AIE, alarm.interrupt))
    }

    /// Deshabilita la alarma y su interrupción, y borra el flag si estaba activo
    pub fn alarm_disable(&mut self) -> Result<(), PiicoDevError> {
        self.alarm_setup(&Alarm {
            interrupt: false,
            ..Default::default()
        })?;
        self.check_alarm()?;
        Ok(())
    }

    /// Devuelve el flag de alarma y lo borra si estaba activo
    pub fn check_alarm(&mut self) -> Result<bool, PiicoDevError> {
        let status = self.dev.read_reg(regs::STATUS)?;
        if read_bit(status, regs::STATUS_AF) {
            self.dev
                .write_reg(regs::STATUS, clear_bit(status, regs::STATUS_AF))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn clear_all_interrupts(&mut self) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::STATUS, 0)
    }

    pub fn address(&self) -> u8 {
        self.dev.address()
    }

    pub fn release(self) -> (I, D) {
        self.dev.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::UnifiedI2c;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x52;

    fn init_expectations() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write_read(ADDR, vec![0x28], vec![0x30]),
            I2cTransaction::write_read(ADDR, vec![0x37], vec![0x00]),
            I2cTransaction::write(ADDR, vec![0x37, 0x04]),
            I2cTransaction::write_read(ADDR, vec![0x37], vec![0x04]),
            I2cTransaction::write(ADDR, vec![0x37, 0x84]),
            I2cTransaction::write_read(ADDR, vec![0x37], vec![0x84]),
            I2cTransaction::write(ADDR, vec![0x37, 0xA4]),
        ]
    }

    fn rtc(expectations: &[I2cTransaction]) -> (I2cMock, Rv3028<UnifiedI2c<I2cMock>, NoopDelay>) {
        let i2c = I2cMock::new(expectations);
        let rtc = Rv3028::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default())
            .unwrap();
        (i2c, rtc)
    }

    #[test]
    fn test_init_configures_backup() {
        let (mut i2c, _rtc) = rtc(&init_expectations());
        i2c.done();
    }

    #[test]
    fn test_init_propagates_missing_device() {
        let expectations =
            [I2cTransaction::write_read(ADDR, vec![0x28], vec![0]).with_error(ErrorKind::Other)];
        let mut i2c = I2cMock::new(&expectations);
        let result = Rv3028::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default());
        assert!(matches!(result, Err(PiicoDevError::Interface(_))));
        i2c.done();
    }

    #[test]
    fn test_read_date_time_24h() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write_read(
                ADDR,
                vec![0x00],
                vec![0x45, 0x30, 0x13, 0x02, 0x16, 0x10, 0x26],
            ),
            I2cTransaction::write_read(ADDR, vec![0x10], vec![0x00]),
        ]);
        let (mut i2c, mut rtc) = rtc(&expectations);
        let dt = rtc.date_time().unwrap();
        assert_eq!(dt.year, 2026);
        assert_eq!(dt.month, 10);
        assert_eq!(dt.day, 16);
        assert_eq!(dt.hour, 13);
        assert_eq!(dt.weekday_name(), "Wednesday");
        assert_eq!(dt.to_string(), "2026-10-16 13:30:45");
        i2c.done();
    }

    #[test]
    fn test_timestamp_12h_pm() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write_read(
                ADDR,
                vec![0x00],
                vec![0x05, 0x07, 0x21, 0x04, 0x01, 0x02, 0x25],
            ),
            I2cTransaction::write_read(ADDR, vec![0x10], vec![0x02]),
        ]);
        let (mut i2c, mut rtc) = rtc(&expectations);
        assert_eq!(rtc.timestamp().unwrap(), "2025-02-01 01:07:05 PM");
        i2c.done();
    }

    #[test]
    fn test_set_date_time() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0x10], vec![0x00]),
            I2cTransaction::write(ADDR, vec![0x10, 0x02]),
            I2cTransaction::write(ADDR, vec![0x00, 0x59, 0x15, 0x31, 0x06, 0x31, 0x12, 0x30]),
        ]);
        let (mut i2c, mut rtc) = rtc(&expectations);
        let dt = DateTime {
            year: 2030,
            month: 12,
            day: 31,
            weekday: 6,
            hour: 11,
            minute: 15,
            second: 59,
            format: HourFormat::Pm,
        };
        rtc.set_date_time(&dt).unwrap();
        let bad = DateTime {
            hour: 13,
            ..dt
        };
        assert!(rtc.set_date_time(&bad).is_err());
        i2c.done();
    }

    #[test]
    fn test_event_timestamp() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0x15], vec![0x10, 0x20, 0x08, 0x09, 0x03, 0x24]),
            I2cTransaction::write_read(ADDR, vec![0x10], vec![0x00]),
        ]);
        let (mut i2c, mut rtc) = rtc(&expectations);
        assert_eq!(rtc.event_timestamp_string().unwrap(), "2024-03-09 08:20:10");
        i2c.done();
    }

    #[test]
    fn test_reset_event_interrupt_keeps_edge() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0x0E], vec![0x02]),
            I2cTransaction::write(ADDR, vec![0x0E, 0x00]),
            I2cTransaction::write_read(ADDR, vec![0x13], vec![0x03]),
            I2cTransaction::write(ADDR, vec![0x13, 0x44]),
            I2cTransaction::write_read(ADDR, vec![0x10], vec![0x00]),
            I2cTransaction::write(ADDR, vec![0x10, 0x84]),
            I2cTransaction::write_read(ADDR, vec![0x0E], vec![0x02]),
        ]);
        let (mut i2c, mut rtc) = rtc(&expectations);
        rtc.reset_event_interrupt(EventEdge::Rising).unwrap();
        assert!(rtc.event_interrupt().unwrap());
        i2c.done();
    }

    #[test]
    fn test_alarm_by_date() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0x0F], vec![0x00]),
            I2cTransaction::write(ADDR, vec![0x0F, 0x20]),
            I2cTransaction::write_read(ADDR, vec![0x10], vec![0x00]),
            I2cTransaction::write(ADDR, vec![0x07, 0x30, 0x07, 0x15]),
            I2cTransaction::write(ADDR, vec![0x10, 0x08]),
        ]);
        let (mut i2c, mut rtc) = rtc(&expectations);
        rtc.alarm_setup(&Alarm {
            minutes: Some(30),
            hours: Some(7),
            day: Some(AlarmDay::Date(15)),
            ..Default::default()
        })
        .unwrap();
        i2c.done();
    }

    #[test]
    fn test_alarm_disable_clears_flag() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0x0F], vec![0x20]),
            I2cTransaction::write(ADDR, vec![0x0F, 0x00]),
            I2cTransaction::write_read(ADDR, vec![0x10], vec![0x08]),
            I2cTransaction::write(ADDR, vec![0x07, 0x80, 0x80, 0x80]),
            I2cTransaction::write(ADDR, vec![0x10, 0x00]),
            I2cTransaction::write_read(ADDR, vec![0x0E], vec![0x04]),
            I2cTransaction::write(ADDR, vec![0x0E, 0x00]),
            I2cTransaction::write_read(ADDR, vec![0x0E], vec![0x00]),
        ]);
        let (mut i2c, mut rtc) = rtc(&expectations);
        rtc.alarm_disable().unwrap();
        assert!(!rtc.check_alarm().unwrap());
        i2c.done();
    }

    #[test]
    fn test_unix_time_and_clock_output() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write(ADDR, vec![0x1B, 0x78, 0x56, 0x34, 0x12]),
            I2cTransaction::write_read(ADDR, vec![0x1B], vec![0x78, 0x56, 0x34, 0x12]),
            I2cTransaction::write_read(ADDR, vec![0x35], vec![0xC0]),
            I2cTransaction::write(ADDR, vec![0x35, 0xC7]),
        ]);
        let (mut i2c, mut rtc) = rtc(&expectations);
        rtc.set_unix_time(0x1234_5678).unwrap();
        assert_eq!(rtc.unix_time().unwrap(), 0x1234_5678);
        rtc.config_clock_output(ClockOutput::from_hz(0).unwrap()).unwrap();
        assert!(ClockOutput::from_hz(100).is_err());
        i2c.done();
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_from_name("Sunday"), Some(6));
        assert_eq!(weekday_from_name("Funday"), None);
        let mut dt = DateTime::default();
        dt.set_weekday_name("Friday").unwrap();
        assert_eq!(dt.weekday, 4);
        assert!(dt.set_weekday_name("friday").is_err());
    }
}
