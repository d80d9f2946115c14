//! Sensor de luz ambiente VEML6030

use embedded_hal::delay::DelayNs;

use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::veml6030 as regs;
use crate::types::Address;

/// Resolución con ganancia 1x e integración de 100 ms (lx por LSB)
pub const RESOLUTION_LUX: f32 = 0.0288;

#[derive(Debug, Clone, Copy)]
pub struct Veml6030Config {
    pub address: Address,
    /// Valor inicial de ALS_CONF (ganancia, integración, persistencia, interrupción)
    pub settings: u16,
}

impl Default for Veml6030Config {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::I2C_ADDRESS),
            settings: regs::DEFAULT_SETTINGS,
        }
    }
}

pub struct Veml6030<I, D> {
    dev: DeviceHandle<I, D>,
}

impl<I, D, E> Veml6030<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    pub fn new(interface: I, delay: D, config: Veml6030Config) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::I2C_ADDRESS);
        let mut als = Self {
            dev: DeviceHandle::new(interface, delay, address),
        };
        // registro de 16 bits, byte bajo primero
        als.dev
            .write_regs(regs::ALS_CONF, &config.settings.to_le_bytes())?;
        Ok(als)
    }

    /// Iluminancia en lux
    pub fn read(&mut self) -> Result<f32, PiicoDevError> {
        Ok(self.dev.read_u16_le(regs::ALS)? as f32 * RESOLUTION_LUX)
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
    use crate::base::ReadingExt;
    use crate::interface::UnifiedI2c;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn test_read_lux() {
        let expectations = [
            I2cTransaction::write(0x10, vec![0x00, 0x00, 0x00]),
            I2cTransaction::write_read(0x10, vec![0x04], vec![0xE8, 0x03]),
            I2cTransaction::write_read(0x10, vec![0x04], vec![0, 0]).with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut als =
            Veml6030::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default())
                .unwrap();
        assert!((als.read().unwrap() - 28.8).abs() < 1e-4);
        assert!(als.read().or_sentinel().is_nan());
        i2c.done();
    }
}
