//! Sensor táctil capacitivo de tres pads CAP1203

use embedded_hal::delay::DelayNs;

use crate::config::IdentityCheck;
use crate::conversion::{read_bit, write_masked};
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::cap1203 as regs;
use crate::types::Address;

/// Bloqueo de pulsaciones simultáneas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchMode {
    /// Solo se informa de un pad a la vez
    Single,
    #[default]
    Multi,
}

/// Estado de los pads; el índice 0 corresponde al pad 1 de la placa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchStatus {
    pub pads: [bool; 3],
    /// Bit TOUCH de GENERAL_STATUS
    pub any: bool,
}

impl TouchStatus {
    /// Estado del pad con la numeración de la placa (1..=3)
    pub fn pad(&self, label: usize) -> Option<bool> {
        label.checked_sub(1).and_then(|i| self.pads.get(i).copied())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Cap1203Config {
    pub address: Address,
    pub touch_mode: TouchMode,
    /// 0 (máxima) ..= 7 (mínima)
    pub sensitivity: u8,
    pub identity: IdentityCheck,
}

impl Default for Cap1203Config {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::I2C_ADDRESS),
            touch_mode: TouchMode::Multi,
            sensitivity: 3,
            identity: IdentityCheck::default(),
        }
    }
}

pub struct Cap1203<I, D> {
    dev: DeviceHandle<I, D>,
}

impl<I, D, E> Cap1203<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    pub fn new(interface: I, delay: D, config: Cap1203Config) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::I2C_ADDRESS);
        let mut touch = Self {
            dev: DeviceHandle::new(interface, delay, address),
        };
        touch
            .dev
            .check_identity(config.identity, &[regs::PRODUCT_ID_VALUE as u16], |dev| {
                dev.read_reg(regs::PRODUCT_ID).map(u16::from)
            })?;
        touch.set_touch_mode(config.touch_mode)?;
        touch.set_sensitivity(config.sensitivity)?;
        Ok(touch)
    }

    pub fn product_id(&mut self) -> Result<u8, PiicoDevError> {
        self.dev.read_reg(regs::PRODUCT_ID)
    }

    pub fn set_touch_mode(&mut self, mode: TouchMode) -> Result<(), PiicoDevError> {
        let value = match mode {
            TouchMode::Single => regs::MULTI_TOUCH_BLOCK,
            TouchMode::Multi => 0x00,
        };
        self.dev.modify_reg(regs::MULTIPLE_TOUCH_CONFIG, |v| {
            write_masked(v, value, regs::MULTI_TOUCH_BLOCK)
        })?;
        Ok(())
    }

    pub fn set_sensitivity(&mut self, sensitivity: u8) -> Result<(), PiicoDevError> {
        if sensitivity > 7 {
            return Err(PiicoDevError::InvalidParameter("la sensibilidad debe estar en 0..=7"));
        }
        self.dev.modify_reg(regs::SENSITIVITY_CONTROL, |v| {
            write_masked(v, sensitivity << 4, regs::SENSITIVITY_MASK)
        })?;
        Ok(())
    }

    pub fn sensitivity(&mut self) -> Result<u8, PiicoDevError> {
        Ok((self.dev.read_reg(regs::SENSITIVITY_CONTROL)? & regs::SENSITIVITY_MASK) >> 4)
    }

    /// Borra el bit INT de MAIN_CONTROL para que se actualice el estado de los pads
    pub fn clear_interrupt(&mut self) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::MAIN_CONTROL, 0x00)?;
        self.dev.read_reg(regs::MAIN_CONTROL)?;
        Ok(())
    }

    pub fn read(&mut self) -> Result<TouchStatus, PiicoDevError> {
        self.clear_interrupt()?;
        let general = self.dev.read_reg(regs::GENERAL_STATUS)?;
        let inputs = self.dev.read_reg(regs::SENSOR_INPUT_STATUS)?;
        Ok(TouchStatus {
            pads: [read_bit(inputs, 0), read_bit(inputs, 1), read_bit(inputs, 2)],
            any: read_bit(general, 0),
        })
    }

    /// Cuentas delta de cada pad (con signo)
    pub fn read_delta_counts(&mut self) -> Result<[i8; 3], PiicoDevError> {
        let mut counts = [0i8; 3];
        for (i, count) in counts.iter_mut().enumerate() {
            *count = self.dev.read_reg(regs::SENSOR_INPUT_1_DELTA_COUNT + i as u8)? as i8;
        }
        Ok(counts)
    }

    pub fn address(&self) -> u8 {
        self.dev.address()
    }

    pub fn release(self) -> (I, D) {
        self.dev.release()
    }
}
