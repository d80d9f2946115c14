//! Botón con firmware propio (pulsaciones, dobles pulsaciones y filtro EMA)

use embedded_hal::delay::DelayNs;

use crate::config::IdentityCheck;
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::module::{ModuleLayout, SmartModule};
use crate::register::switch as regs;
use crate::types::Address;

#[derive(Debug, Clone, Copy)]
pub struct SwitchConfig {
    pub address: Address,
    /// Ventana máxima entre pulsaciones para contar como doble (ms)
    pub double_press_duration: u16,
    /// Coeficiente del filtro antirrebote (0..=255)
    pub ema_parameter: u8,
    /// Periodo de muestreo del filtro (ms)
    pub ema_period: u8,
    pub identity: IdentityCheck,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::BASE_ADDRESS),
            double_press_duration: 300,
            ema_parameter: 63,
            ema_period: 20,
            identity: IdentityCheck::default(),
        }
    }
}

pub struct Switch<I, D> {
    module: SmartModule<I, D>,
}

impl<I, D, E> Switch<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    pub fn new(interface: I, delay: D, config: SwitchConfig) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::BASE_ADDRESS);
        let layout = ModuleLayout {
            address_flagged: true,
            ..Default::default()
        };
        let mut switch = Self {
            module: SmartModule::new(DeviceHandle::new(interface, delay, address), layout),
        };
        switch.module.verify(config.identity, &[regs::DEVICE_ID])?;
        switch.set_double_press_duration(config.double_press_duration)?;
        switch.set_ema_parameter(config.ema_parameter)?;
        switch.set_ema_period(config.ema_period)?;
        Ok(switch)
    }

    /// Estado actual del botón (el registro vale 1 en reposo)
    pub fn is_pressed(&mut self) -> Result<bool, PiicoDevError> {
        Ok(self.module.read_u8(regs::IS_PRESSED)? != 1)
    }

    /// Si hubo alguna pulsación desde la última lectura
    pub fn was_pressed(&mut self) -> Result<bool, PiicoDevError> {
        Ok(self.module.read_u8(regs::WAS_PRESSED)? != 0)
    }

    pub fn was_double_pressed(&mut self) -> Result<bool, PiicoDevError> {
        Ok(self.module.read_u8(regs::DOUBLE_PRESS_DETECTED)? == 1)
    }

    /// Pulsaciones desde la última lectura
    pub fn press_count(&mut self) -> Result<u16, PiicoDevError> {
        self.module.read_u16(regs::PRESS_COUNT)
    }

    pub fn double_press_duration(&mut self) -> Result<u16, PiicoDevError> {
        self.module.read_u16(regs::DOUBLE_PRESS_DURATION)
    }

    pub fn set_double_press_duration(&mut self, ms: u16) -> Result<(), PiicoDevError> {
        self.module
            .write_flagged(regs::DOUBLE_PRESS_DURATION, &ms.to_be_bytes())
    }

    pub fn ema_parameter(&mut self) -> Result<u8, PiicoDevError> {
        self.module.read_u8(regs::EMA_PARAMETER)
    }

    pub fn set_ema_parameter(&mut self, value: u8) -> Result<(), PiicoDevError> {
        self.module.write_flagged(regs::EMA_PARAMETER, &[value])
    }

    pub fn ema_period(&mut self) -> Result<u8, PiicoDevError> {
        self.module.read_u8(regs::EMA_PERIOD)
    }

    pub fn set_ema_period(&mut self, ms: u8) -> Result<(), PiicoDevError> {
        self.module.write_flagged(regs::EMA_PERIOD, &[ms])
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

    const ADDR: u8 = 0x42;

    fn init_expectations() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write_read(ADDR, vec![0x01], vec![0x01, 0x99]),
            I2cTransaction::write(ADDR, vec![0xA1, 0x01, 0x2C]),
            I2cTransaction::write(ADDR, vec![0xA2, 63]),
            I2cTransaction::write(ADDR, vec![0xA3, 20]),
        ]
    }

    fn switch(expectations: &[I2cTransaction]) -> (I2cMock, Switch<UnifiedI2c<I2cMock>, NoopDelay>) {
        let i2c = I2cMock::new(expectations);
        let switch = Switch::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default())
            .unwrap();
        (i2c, switch)
    }

    #[test]
    fn test_press_state() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0x11], vec![0x00]),
            I2cTransaction::write_read(ADDR, vec![0x11], vec![0x01]),
            I2cTransaction::write_read(ADDR, vec![0x12], vec![0x01]),
            I2cTransaction::write_read(ADDR, vec![0x13], vec![0x00]),
            I2cTransaction::write_read(ADDR, vec![0x14], vec![0x01, 0x02]),
        ]);
        let (mut i2c, mut switch) = switch(&expectations);
        assert!(switch.is_pressed().unwrap());
        assert!(!switch.is_pressed().unwrap());
        assert!(switch.was_pressed().unwrap());
        assert!(!switch.was_double_pressed().unwrap());
        assert_eq!(switch.press_count().unwrap(), 258);
        i2c.done();
    }

    #[test]
    fn test_address_write_is_flagged() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write(ADDR, vec![0x84, 0x43]),
            I2cTransaction::write(0x43, vec![0x85, 0x00]),
        ]);
        let (mut i2c, mut switch) = switch(&expectations);
        switch.set_i2c_address(0x43).unwrap();
        switch.set_led(false).unwrap();
        i2c.done();
    }
}
