//! Manejador genérico de un periférico I2C y tipo de error común
//!
//! `DeviceHandle` agrupa la interfaz de bus, el proveedor de retardos y la
//! dirección resuelta del dispositivo. Todos los drivers se construyen sobre él.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;

use crate::config::IdentityCheck;
use crate::interface::Interface;
use crate::types::validate_i2c_address;

/// Tiempo que necesita un módulo para guardar su nueva dirección (ms)
pub const ADDRESS_SETTLE_MS: u32 = 5;

/// Errores comunes a todos los drivers PiicoDev
#[derive(Debug, Clone, PartialEq)]
pub enum PiicoDevError {
    /// Fallo de transporte en el bus I2C (reintentable)
    Interface(ErrorKind),
    /// Parámetro fuera de rango en la llamada
    InvalidParameter(&'static str),
    /// No hay ningún dispositivo respondiendo
    DeviceNotFound,
    /// El registro de identidad no coincide con el esperado
    WrongDevice { expected: u16, found: u16 },
    /// El dispositivo todavía no tiene una muestra nueva
    DataNotReady,
    /// El sensor informa de desbordamiento de la medida
    Overflow,
    /// Se agotó la espera activa
    Timeout,
    /// Error de E/S al guardar o cargar la calibración
    Calibration(std::io::ErrorKind),
    /// El fichero de calibración no tiene el formato esperado
    CalibrationFormat,
}

impl PiicoDevError {
    /// Indica si el error es transitorio y la operación puede repetirse
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PiicoDevError::Interface(_) | PiicoDevError::DataNotReady | PiicoDevError::Timeout
        )
    }
}

impl fmt::Display for PiicoDevError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PiicoDevError::Interface(kind) => write!(f, "error de bus I2C: {:?}", kind),
            PiicoDevError::InvalidParameter(what) => write!(f, "parámetro inválido: {}", what),
            PiicoDevError::DeviceNotFound => write!(f, "dispositivo no encontrado"),
            PiicoDevError::WrongDevice { expected, found } => write!(
                f,
                "identidad inesperada: se esperaba {:#06x}, leído {:#06x}",
                expected, found
            ),
            PiicoDevError::DataNotReady => write!(f, "datos no disponibles"),
            PiicoDevError::Overflow => write!(f, "desbordamiento del sensor"),
            PiicoDevError::Timeout => write!(f, "tiempo de espera agotado"),
            PiicoDevError::Calibration(kind) => write!(f, "error de fichero de calibración: {:?}", kind),
            PiicoDevError::CalibrationFormat => write!(f, "fichero de calibración mal formado"),
        }
    }
}

impl std::error::Error for PiicoDevError {}

impl From<std::io::Error> for PiicoDevError {
    fn from(error: std::io::Error) -> Self {
        PiicoDevError::Calibration(error.kind())
    }
}

/// Un periférico concreto en el bus
pub struct DeviceHandle<I, D> {
    pub(crate) interface: I,
    pub(crate) delay: D,
    pub(crate) address: u8,
}

impl<I, D, E> DeviceHandle<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    /// Crea un manejador para el dispositivo en `address`
    pub fn new(interface: I, delay: D, address: u8) -> Self {
        Self {
            interface,
            delay,
            address,
        }
    }

    /// Dirección I2C actual
    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn read_reg(&mut self, reg: u8) -> Result<u8, PiicoDevError> {
        let mut data = [0u8];
        self.read_regs(reg, &mut data)?;
        Ok(data[0])
    }

    /// Lee varios registros consecutivos
    pub fn read_regs(&mut self, reg: u8, data: &mut [u8]) -> Result<(), PiicoDevError> {
        let address = self.address;
        self.interface
            .read_reg(address, reg, data)
            .map_err(|e| Self::bus_error(address, e))
    }

    pub fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), PiicoDevError> {
        self.write_regs(reg, &[value])
    }

    /// Escribe varios bytes a partir de `reg`
    pub fn write_regs(&mut self, reg: u8, data: &[u8]) -> Result<(), PiicoDevError> {
        let address = self.address;
        self.interface
            .write_reg(address, reg, data)
            .map_err(|e| Self::bus_error(address, e))
    }

    /// Envía un comando de un solo byte (sin registro)
    pub fn write_command(&mut self, cmd: u8) -> Result<(), PiicoDevError> {
        let address = self.address;
        self.interface
            .write(address, &[cmd])
            .map_err(|e| Self::bus_error(address, e))
    }

    pub fn read_u16_be(&mut self, reg: u8) -> Result<u16, PiicoDevError> {
        let mut data = [0u8; 2];
        self.read_regs(reg, &mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    pub fn read_u16_le(&mut self, reg: u8) -> Result<u16, PiicoDevError> {
        let mut data = [0u8; 2];
        self.read_regs(reg, &mut data)?;
        Ok(u16::from_le_bytes(data))
    }

    pub fn read_i16_le(&mut self, reg: u8) -> Result<i16, PiicoDevError> {
        Ok(self.read_u16_le(reg)? as i16)
    }

    pub fn read_i16_be(&mut self, reg: u8) -> Result<i16, PiicoDevError> {
        Ok(self.read_u16_be(reg)? as i16)
    }

    pub fn write_u16_be(&mut self, reg: u8, value: u16) -> Result<(), PiicoDevError> {
        self.write_regs(reg, &value.to_be_bytes())
    }

    /// Lectura-modificación-escritura de un registro
    pub fn modify_reg<F>(&mut self, reg: u8, f: F) -> Result<u8, PiicoDevError>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = f(self.read_reg(reg)?);
        self.write_reg(reg, value)?;
        Ok(value)
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Actualiza la dirección local tras cambiarla en el dispositivo y espera
    /// a que el módulo la guarde en memoria no volátil
    pub fn set_address(&mut self, new_address: u8) -> Result<(), PiicoDevError> {
        validate_i2c_address(new_address)?;
        self.address = new_address;
        self.delay.delay_ms(ADDRESS_SETTLE_MS);
        Ok(())
    }

    /// Comprueba el registro de identidad según `check`.
    ///
    /// Con `IdentityCheck::Warn` una identidad distinta o un fallo de lectura
    /// solo se registran. Con `Strict` se devuelve el error.
    pub fn check_identity<F>(
        &mut self,
        check: IdentityCheck,
        accepted: &[u16],
        read: F,
    ) -> Result<(), PiicoDevError>
    where
        F: FnOnce(&mut Self) -> Result<u16, PiicoDevError>,
    {
        if check == IdentityCheck::Skip {
            return Ok(());
        }
        let error = match read(self) {
            Ok(found) if accepted.contains(&found) => return Ok(()),
            Ok(found) => {
                log::warn!(
                    "Dispositivo incorrecto en {:#04x} (identidad {:#06x})",
                    self.address,
                    found
                );
                PiicoDevError::WrongDevice {
                    expected: accepted.first().copied().unwrap_or_default(),
                    found,
                }
            }
            Err(e) => {
                log::warn!(
                    "No se encuentra el dispositivo en {:#04x}, revisa interruptores y cableado ({})",
                    self.address,
                    e
                );
                PiicoDevError::DeviceNotFound
            }
        };
        match check {
            IdentityCheck::Strict => Err(error),
            _ => Ok(()),
        }
    }

    /// Consume el manejador y devuelve la interfaz y el retardo
    pub fn release(self) -> (I, D) {
        (self.interface, self.delay)
    }

    fn bus_error(address: u8, error: E) -> PiicoDevError {
        let error = PiicoDevError::from(error);
        log::debug!("Dispositivo {:#04x}: {}", address, error);
        error
    }
}
