//! Zumbador piezoeléctrico
//!
//! Firmware de primera generación: la identidad es de un byte en el registro 0
//! y las escrituras no llevan bit de escritura.

use embedded_hal::delay::DelayNs;

use crate::config::IdentityCheck;
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::buzzer as regs;
use crate::types::{validate_i2c_address, Address};

const VOLUME_SETTLE_MS: u32 = 5;

/// Volumen del zumbador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Volume {
    Low = 0,
    Medium = 1,
    #[default]
    High = 2,
}

impl Volume {
    pub fn from_level(level: u8) -> Result<Self, PiicoDevError> {
        match level {
            0 => Ok(Volume::Low),
            1 => Ok(Volume::Medium),
            2 => Ok(Volume::High),
            _ => Err(PiicoDevError::InvalidParameter("el volumen debe ser 0, 1 o 2")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BuzzerConfig {
    pub address: Address,
    pub volume: Volume,
    pub identity: IdentityCheck,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::BASE_ADDRESS),
            volume: Volume::High,
            identity: IdentityCheck::default(),
        }
    }
}

pub struct Buzzer<I, D> {
    dev: DeviceHandle<I, D>,
    volume: Volume,
}

impl<I, D, E> Buzzer<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    pub fn new(interface: I, delay: D, config: BuzzerConfig) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::BASE_ADDRESS);
        let mut buzzer = Self {
            dev: DeviceHandle::new(interface, delay, address),
            volume: config.volume,
        };
        buzzer
            .dev
            .check_identity(config.identity, &[regs::DEVICE_ID as u16], |dev| {
                dev.read_reg(regs::DEV_ID).map(u16::from)
            })?;
        buzzer.set_volume(config.volume)?;
        Ok(buzzer)
    }

    /// Emite un tono de `frequency_hz`. Con `duration_ms == 0` suena hasta `no_tone`.
    pub fn tone(&mut self, frequency_hz: u16, duration_ms: u16) -> Result<(), PiicoDevError> {
        let f = frequency_hz.to_be_bytes();
        let d = duration_ms.to_be_bytes();
        self.dev.write_regs(regs::TONE, &[f[0], f[1], d[0], d[1]])
    }

    pub fn no_tone(&mut self) -> Result<(), PiicoDevError> {
        self.tone(0, 0)
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn set_volume(&mut self, volume: Volume) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::VOLUME, volume as u8)?;
        self.dev.delay_ms(VOLUME_SETTLE_MS);
        self.volume = volume;
        Ok(())
    }

    pub fn set_led(&mut self, on: bool) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::LED, on as u8)
    }

    /// Versión de firmware `(mayor, menor)`
    pub fn firmware(&mut self) -> Result<(u8, u8), PiicoDevError> {
        let mut v = [0u8; 2];
        self.dev.read_regs(regs::FIRM_VER, &mut v)?;
        Ok((v[1], v[0]))
    }

    pub fn device_id(&mut self) -> Result<u8, PiicoDevError> {
        self.dev.read_reg(regs::DEV_ID)
    }

    pub fn set_i2c_address(&mut self, new_address: u8) -> Result<(), PiicoDevError> {
        validate_i2c_address(new_address)?;
        self.dev.write_reg(regs::I2C_ADDRESS, new_address)?;
        self.dev.set_address(new_address)
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
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    fn init_expectations(addr: u8) -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write_read(addr, vec![0x00], vec![0x51]),
            I2cTransaction::write(addr, vec![0x06, 0x02]),
        ]
    }

    #[test]
    fn test_tone_and_volume() {
        let mut expectations = init_expectations(0x08);
        expectations.extend([
            I2cTransaction::write(0x08, vec![0x05, 0x01, 0xB8, 0x01, 0xF4]),
            I2cTransaction::write(0x08, vec![0x05, 0x00, 0x00, 0x00, 0x00]),
            I2cTransaction::write(0x08, vec![0x06, 0x00]),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut buzzer =
            Buzzer::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default()).unwrap();
        buzzer.tone(440, 500).unwrap();
        buzzer.no_tone().unwrap();
        buzzer.set_volume(Volume::Low).unwrap();
        assert_eq!(buzzer.volume(), Volume::Low);
        assert!(Volume::from_level(3).is_err());
        i2c.done();
    }

    #[test]
    fn test_selector_firmware_and_address() {
        let mut expectations = init_expectations(0x09);
        expectations.extend([
            I2cTransaction::write_read(0x09, vec![0x02], vec![0x03, 0x01]),
            I2cTransaction::write(0x09, vec![0x04, 0x20]),
            I2cTransaction::write(0x20, vec![0x07, 0x00]),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let config = BuzzerConfig {
            address: Address::Selector([true, false, false, false]),
            ..Default::default()
        };
        let mut buzzer = Buzzer::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), config).unwrap();
        assert_eq!(buzzer.firmware().unwrap(), (1, 3));
        buzzer.set_i2c_address(0x20).unwrap();
        assert_eq!(buzzer.address(), 0x20);
        assert!(buzzer.set_i2c_address(0x05).is_err());
        buzzer.set_led(false).unwrap();
        i2c.done();
    }
}
