//! Base común de los módulos con firmware propio (Switch, Potentiometer,
//! Ultrasonic, Transceiver)
//!
//! Todos comparten el mismo bloque de registros: identidad de 16 bits,
//! versión de firmware, dirección I2C y LED de alimentación. Las escrituras
//! que el firmware debe aceptar llevan el bit 7 del número de registro a 1.

use embedded_hal::delay::DelayNs;

use crate::config::IdentityCheck;
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::module as regs;
use crate::types::validate_i2c_address;

/// Cómo escribe cada módulo en sus registros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleLayout {
    /// Registro del LED de alimentación
    pub led: u8,
    /// La escritura de la dirección lleva el bit de escritura
    pub address_flagged: bool,
    /// Todas las escrituras llevan el bit de escritura
    pub all_writes_flagged: bool,
}

impl Default for ModuleLayout {
    fn default() -> Self {
        Self {
            led: regs::LED,
            address_flagged: false,
            all_writes_flagged: false,
        }
    }
}

/// Módulo con firmware PiicoDev
pub struct SmartModule<I, D> {
    pub(crate) dev: DeviceHandle<I, D>,
    layout: ModuleLayout,
}

impl<I, D, E> SmartModule<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    pub fn new(dev: DeviceHandle<I, D>, layout: ModuleLayout) -> Self {
        Self { dev, layout }
    }

    /// Comprueba la identidad contra los valores aceptados
    pub fn verify(&mut self, check: IdentityCheck, accepted: &[u16]) -> Result<(), PiicoDevError> {
        self.dev
            .check_identity(check, accepted, |dev| dev.read_u16_be(regs::WHOAMI))
    }

    pub fn read_u8(&mut self, reg: u8) -> Result<u8, PiicoDevError> {
        self.dev.read_reg(reg)
    }

    /// Entero sin signo de 16 bits big-endian
    pub fn read_u16(&mut self, reg: u8) -> Result<u16, PiicoDevError> {
        self.dev.read_u16_be(reg)
    }

    /// Escritura con el bit de escritura activo
    pub fn write_flagged(&mut self, reg: u8, data: &[u8]) -> Result<(), PiicoDevError> {
        self.dev.write_regs(reg | regs::WRITE_FLAG, data)
    }

    /// Escritura según la política del módulo
    pub fn write(&mut self, reg: u8, data: &[u8]) -> Result<(), PiicoDevError> {
        if self.layout.all_writes_flagged {
            self.write_flagged(reg, data)
        } else {
            self.dev.write_regs(reg, data)
        }
    }

    pub fn write_u8(&mut self, reg: u8, value: u8) -> Result<(), PiicoDevError> {
        self.write(reg, &[value])
    }

    pub fn write_u16(&mut self, reg: u8, value: u16) -> Result<(), PiicoDevError> {
        self.write(reg, &value.to_be_bytes())
    }

    /// Identificador del dispositivo
    pub fn whoami(&mut self) -> Result<u16, PiicoDevError> {
        self.dev.read_u16_be(regs::WHOAMI)
    }

    /// Versión de firmware `(mayor, menor)`
    pub fn firmware(&mut self) -> Result<(u8, u8), PiicoDevError> {
        let major = self.dev.read_reg(regs::FIRM_MAJ)?;
        let minor = self.dev.read_reg(regs::FIRM_MIN)?;
        Ok((major, minor))
    }

    /// Estado del LED de alimentación
    pub fn led(&mut self) -> Result<bool, PiicoDevError> {
        Ok(self.dev.read_reg(self.layout.led)? != 0)
    }

    pub fn set_led(&mut self, on: bool) -> Result<(), PiicoDevError> {
        self.write_flagged(self.layout.led, &[on as u8])
    }

    pub fn address(&self) -> u8 {
        self.dev.address()
    }

    /// Cambia la dirección I2C del módulo (se guarda en su memoria no volátil)
    pub fn set_i2c_address(&mut self, new_address: u8) -> Result<(), PiicoDevError> {
        validate_i2c_address(new_address)?;
        if self.layout.address_flagged {
            self.write_flagged(regs::I2C_ADDRESS, &[new_address])?;
        } else {
            self.write(regs::I2C_ADDRESS, &[new_address])?;
        }
        self.dev.set_address(new_address)
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.dev.delay_ms(ms);
    }

    pub fn release(self) -> (I, D) {
        self.dev.release()
    }
}
