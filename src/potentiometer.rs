//! Potenciómetro rotativo o deslizante
//!
//! El valor se escala linealmente desde la lectura de 10 bits al rango
//! `minimum..=maximum` configurado.

use embedded_hal::delay::DelayNs;

use crate::config::IdentityCheck;
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::module::{ModuleLayout, SmartModule};
use crate::register::potentiometer as regs;
use crate::types::Address;

const FULL_SCALE: f32 = 1023.0;

#[derive(Debug, Clone, Copy)]
pub struct PotentiometerConfig {
    pub address: Address,
    pub minimum: f32,
    pub maximum: f32,
    pub identity: IdentityCheck,
}

impl Default for PotentiometerConfig {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::BASE_ADDRESS),
            minimum: 0.0,
            maximum: 100.0,
            identity: IdentityCheck::default(),
        }
    }
}

pub struct Potentiometer<I, D> {
    module: SmartModule<I, D>,
    minimum: f32,
    maximum: f32,
}

impl<I, D, E> Potentiometer<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    /// Acepta tanto la versión rotativa como la deslizante
    pub fn new(interface: I, delay: D, config: PotentiometerConfig) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::BASE_ADDRESS);
        let layout = ModuleLayout {
            led: regs::LED,
            ..Default::default()
        };
        let mut pot = Self {
            module: SmartModule::new(DeviceHandle::new(interface, delay, address), layout),
            minimum: config.minimum,
            maximum: config.maximum,
        };
        pot.module
            .verify(config.identity, &[regs::DEVICE_ID_POT, regs::DEVICE_ID_SLIDE])?;
        Ok(pot)
    }

    /// Lectura del ADC (0..=1023)
    pub fn raw(&mut self) -> Result<u16, PiicoDevError> {
        self.module.read_u16(regs::POT)
    }

    /// Valor escalado al rango configurado
    pub fn value(&mut self) -> Result<f32, PiicoDevError> {
        let raw = self.raw()? as f32;
        Ok(self.minimum + (self.maximum - self.minimum) / FULL_SCALE * raw)
    }

    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    pub fn set_minimum(&mut self, minimum: f32) {
        self.minimum = minimum;
    }

    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    pub fn set_maximum(&mut self, maximum: f32) {
        self.maximum = maximum;
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
    use crate::base::ReadingExt;
    use crate::interface::UnifiedI2c;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x35;

    #[test]
    fn test_value_scaling() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![0x01], vec![0x01, 0x9B]),
            I2cTransaction::write_read(ADDR, vec![0x05], vec![0x03, 0xFF]),
            I2cTransaction::write_read(ADDR, vec![0x05], vec![0x00, 0x00]),
            I2cTransaction::write_read(ADDR, vec![0x05], vec![0x00, 0x00])
                .with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut pot = Potentiometer::new(
            UnifiedI2c::new(i2c.clone()),
            NoopDelay::new(),
            PotentiometerConfig {
                minimum: -1.0,
                ..Default::default()
            },
        )
        .unwrap();
        assert!((pot.value().unwrap() - 100.0).abs() < 1e-4);
        assert_eq!(pot.value().unwrap(), -1.0);
        assert!(pot.value().or_sentinel().is_nan());
        i2c.done();
    }

    #[test]
    fn test_led_and_address() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![0x01], vec![0x01, 0x7B]),
            I2cTransaction::write(ADDR, vec![0x87, 0x01]),
            I2cTransaction::write(ADDR, vec![0x04, 0x36]),
            I2cTransaction::write_read(0x36, vec![0x07], vec![0x00]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut pot =
            Potentiometer::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default())
                .unwrap();
        pot.set_led(true).unwrap();
        pot.set_i2c_address(0x36).unwrap();
        assert!(!pot.led().unwrap());
        i2c.done();
    }
}
