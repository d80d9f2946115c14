//! Capa de transporte I2C unificada para los módulos PiicoDev
//!
//! Todos los drivers acceden al bus a través del trait [`Interface`]. El bus
//! lo construye quien llama y se presta a cada driver, nunca se crea de forma
//! global.

use embedded_hal::i2c::{self, I2c};

use crate::device::PiicoDevError;

/// Máximo número de bytes de datos en una escritura de registro
pub const MAX_WRITE_LEN: usize = 32;

/// Error genérico para interfaces de comunicación
#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceError<E> {
    /// Error de comunicación I2C
    I2cError(E),
    /// Parámetro inválido (p.ej. escritura demasiado larga)
    InvalidParameter,
}

/// Trait para abstraer el acceso a registros de un dispositivo I2C
pub trait Interface {
    /// Tipo de error que puede producir la interfaz
    type Error;

    /// Escribe `data` a partir del registro `reg`
    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Lee `data.len()` bytes a partir del registro `reg`
    fn read_reg(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error>;

    /// Escritura directa sin registro (comandos de un byte)
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Interface + ?Sized> Interface for &mut T {
    type Error = T::Error;

    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_reg(addr, reg, data)
    }

    fn read_reg(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_reg(addr, reg, data)
    }

    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(addr, data)
    }
}

/// Implementación de Interface sobre cualquier bus `embedded_hal::i2c::I2c`
pub struct UnifiedI2c<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> UnifiedI2c<I2C> {
    /// Crea una nueva interfaz sobre el bus dado
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Consume la interfaz y devuelve el bus I2C subyacente
    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[cfg(feature = "linux")]
impl UnifiedI2c<linux_embedded_hal::I2cdev> {
    /// Abre un bus I2C de Linux, p.ej. `/dev/i2c-1` en una Raspberry Pi
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PiicoDevError> {
        let path = path.as_ref();
        linux_embedded_hal::I2cdev::new(path)
            .map(Self::new)
            .map_err(|e| {
                log::error!("No se pudo abrir {}: {}", path.display(), e);
                PiicoDevError::DeviceNotFound
            })
    }
}

impl<I2C: I2c> Interface for UnifiedI2c<I2C> {
    type Error = InterfaceError<I2C::Error>;

    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        if data.len() > MAX_WRITE_LEN {
            return Err(InterfaceError::InvalidParameter);
        }

        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        buffer[0] = reg;
        buffer[1..data.len() + 1].copy_from_slice(data);

        self.i2c
            .write(addr, &buffer[..data.len() + 1])
            .map_err(InterfaceError::I2cError)
    }

    fn read_reg(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        if data.is_empty() {
            return Err(InterfaceError::InvalidParameter);
        }
        self.i2c
            .write_read(addr, &[reg], data)
            .map_err(InterfaceError::I2cError)
    }

    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        if data.len() > MAX_WRITE_LEN + 1 {
            return Err(InterfaceError::InvalidParameter);
        }
        self.i2c.write(addr, data).map_err(InterfaceError::I2cError)
    }
}

// Conversión de errores de la interfaz a PiicoDevError
impl<E: i2c::Error> From<InterfaceError<E>> for PiicoDevError {
    fn from(error: InterfaceError<E>) -> Self {
        match error {
            InterfaceError::I2cError(e) => {
                let kind = e.kind();
                log::debug!("Error de bus I2C: {:?}", kind);
                PiicoDevError::Interface(kind)
            }
            InterfaceError::InvalidParameter => {
                PiicoDevError::InvalidParameter("transferencia I2C fuera de rango")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn test_write_reg_prefixes_register() {
        let expectations = [I2cTransaction::write(0x1C, vec![0x0A, 0x01, 0x02])];
        let mut i2c = I2cMock::new(&expectations);
        let mut bus = UnifiedI2c::new(i2c.clone());
        bus.write_reg(0x1C, 0x0A, &[0x01, 0x02]).unwrap();
        i2c.done();
    }

    #[test]
    fn test_read_reg_uses_write_read() {
        let expectations = [I2cTransaction::write_read(0x30, vec![0x39], vec![0x10])];
        let mut i2c = I2cMock::new(&expectations);
        let mut bus = UnifiedI2c::new(i2c.clone());
        let mut buf = [0u8; 1];
        bus.read_reg(0x30, 0x39, &mut buf).unwrap();
        assert_eq!(buf, [0x10]);
        i2c.done();
    }

    #[test]
    fn test_write_too_long_is_rejected() {
        let mut i2c = I2cMock::new(&[]);
        let mut bus = UnifiedI2c::new(i2c.clone());
        let data = [0u8; MAX_WRITE_LEN + 1];
        let err = bus.write_reg(0x1A, 0x22, &data).unwrap_err();
        assert_eq!(err, InterfaceError::InvalidParameter);
        i2c.done();
    }

    #[test]
    fn test_bus_error_maps_to_kind() {
        let expectations =
            [I2cTransaction::write_read(0x76, vec![0x00], vec![0, 0, 0]).with_error(ErrorKind::Other)];
        let mut i2c = I2cMock::new(&expectations);
        let mut bus = UnifiedI2c::new(i2c.clone());
        let mut buf = [0u8; 3];
        let err: PiicoDevError = bus.read_reg(0x76, 0x00, &mut buf).unwrap_err().into();
        assert_eq!(err, PiicoDevError::Interface(ErrorKind::Other));
        i2c.done();
    }

    fn send_command<I: Interface>(mut iface: I, addr: u8, cmd: u8) -> Result<(), I::Error> {
        iface.write(addr, &[cmd])
    }

    #[test]
    fn test_borrowed_interface() {
        let expectations = [
            I2cTransaction::write(0x44, vec![0xFE]),
            I2cTransaction::write(0x76, vec![0x1E]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut bus = UnifiedI2c::new(i2c.clone());
        send_command(&mut bus, 0x44, 0xFE).unwrap();
        send_command(&mut bus, 0x76, 0x1E).unwrap();
        i2c.done();
    }
}
