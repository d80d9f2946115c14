//! Definiciones de tipos y constantes comunes para los módulos PiicoDev

use crate::device::PiicoDevError;

/// Rango válido de direcciones I2C de 7 bits para los módulos
pub const I2C_ADDRESS_MIN: u8 = 0x08;
pub const I2C_ADDRESS_MAX: u8 = 0x77;

/// Gravedad estándar (m/s²)
pub const STANDARD_GRAVITY: f32 = 9.80665;

/// Dirección de un módulo: literal o derivada de los interruptores ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    /// Dirección de 7 bits explícita
    Literal(u8),
    /// Posición de los cuatro interruptores ID `[id0, id1, id2, id3]`
    Selector([bool; 4]),
}

impl Address {
    /// Resuelve la dirección final.
    ///
    /// Un selector con todos los interruptores apagados devuelve `default`,
    /// en otro caso `0x08 + id0 + 2*id1 + 4*id2 + 8*id3`.
    pub fn resolve(self, default: u8) -> u8 {
        match self {
            Address::Literal(addr) => addr,
            Address::Selector(ids) if ids.iter().all(|b| !b) => default,
            Address::Selector(ids) => selector_address(I2C_ADDRESS_MIN, ids),
        }
    }
}

impl From<u8> for Address {
    fn from(value: u8) -> Self {
        Address::Literal(value)
    }
}

impl From<[bool; 4]> for Address {
    fn from(value: [bool; 4]) -> Self {
        Address::Selector(value)
    }
}

/// `base + id0 + 2*id1 + 4*id2 + 8*id3`
pub fn selector_address(base: u8, ids: [bool; 4]) -> u8 {
    ids.iter()
        .enumerate()
        .fold(base, |acc, (i, &on)| acc + ((on as u8) << i))
}

/// Comprueba que la dirección está en `0x08..=0x77`
pub fn validate_i2c_address(address: u8) -> Result<u8, PiicoDevError> {
    if (I2C_ADDRESS_MIN..=I2C_ADDRESS_MAX).contains(&address) {
        Ok(address)
    } else {
        Err(PiicoDevError::InvalidParameter("dirección I2C fuera de 0x08..=0x77"))
    }
}

/// Muestra de tres ejes en unidades físicas
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Módulo euclídeo
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Lectura polar de un magnetómetro
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Polar {
    /// Rumbo en grados [0, 360)
    pub heading: f32,
    /// Módulo del campo en µT
    pub micro_tesla: f32,
    /// Módulo del campo en gauss (1 G = 100 µT)
    pub gauss: f32,
}

impl Polar {
    pub fn new(heading: f32, micro_tesla: f32) -> Self {
        Self {
            heading,
            micro_tesla,
            gauss: micro_tesla / 100.0,
        }
    }
}
