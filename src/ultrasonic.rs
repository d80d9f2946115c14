//! Telémetro ultrasónico

use embedded_hal::delay::DelayNs;

use crate::config::IdentityCheck;
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::module::{ModuleLayout, SmartModule};
use crate::register::ultrasonic as regs;
use crate::types::Address;

/// Velocidad del sonido en mm/µs
pub const MILLIMETERS_PER_MICROSECOND: f32 = 0.343;
const MILLIMETERS_PER_INCH: f32 = 25.4;

#[derive(Debug, Clone, Copy)]
pub struct UltrasonicConfig {
    pub address: Address,
    /// Periodo de muestreo en ms (0 lo desactiva)
    pub period_ms: u16,
    pub identity: IdentityCheck,
}

impl Default for UltrasonicConfig {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::BASE_ADDRESS),
            period_ms: 20,
            identity: IdentityCheck::default(),
        }
    }
}

pub struct Ultrasonic<I, D> {
    module: SmartModule<I, D>,
}

impl<I, D, E> Ultrasonic<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    pub fn new(interface: I, delay: D, config: UltrasonicConfig) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::BASE_ADDRESS);
        let layout = ModuleLayout {
            led: regs::LED,
            ..Default::default()
        };
        let mut sensor = Self {
            module: SmartModule::new(DeviceHandle::new(interface, delay, address), layout),
        };
        sensor.module.verify(config.identity, &[regs::DEVICE_ID])?;
        sensor.set_period_ms(config.period_ms)?;
        sensor.set_led(true)?;
        Ok(sensor)
    }

    pub fn new_sample_available(&mut self) -> Result<bool, PiicoDevError> {
        Ok(self.module.read_u8(regs::STATUS)? & 0x01 != 0)
    }

    /// Tiempo de ida y vuelta del pulso en µs
    pub fn round_trip_us(&mut self) -> Result<u16, PiicoDevError> {
        self.module.read_u16(regs::RAW)
    }

    pub fn distance_mm(&mut self) -> Result<u32, PiicoDevError> {
        let us = self.round_trip_us()? as f32;
        Ok((us * MILLIMETERS_PER_MICROSECOND / 2.0).round() as u32)
    }

    pub fn distance_inch(&mut self) -> Result<f32, PiicoDevError> {
        Ok(self.distance_mm()? as f32 / MILLIMETERS_PER_INCH)
    }

    pub fn period_ms(&mut self) -> Result<u16, PiicoDevError> {
        self.module.read_u16(regs::PERIOD)
    }

    pub fn set_period_ms(&mut self, period_ms: u16) -> Result<(), PiicoDevError> {
        self.module.write_flagged(regs::PERIOD, &period_ms.to_be_bytes())
    }

    /// Resultado de la autocomprobación de fábrica
    pub fn self_test(&mut self) -> Result<u8, PiicoDevError> {
        self.module.read_u8(regs::SELF_TEST)
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
