//! Funcionalidades y traits base compartidos por todos los drivers
//!
//! Los drivers devuelven `Result<T, PiicoDevError>`. Para el código que prefiere
//! no tratar los errores de bus, `ReadingExt::or_sentinel` convierte cualquier
//! error en el valor centinela documentado (NaN) después de registrarlo.

use crate::device::PiicoDevError;
use crate::types::{Polar, Vector3};

/// Valor centinela que representa una lectura fallida
pub trait Sentinel {
    fn sentinel() -> Self;
}

impl Sentinel for f32 {
    fn sentinel() -> Self {
        f32::NAN
    }
}

impl Sentinel for f64 {
    fn sentinel() -> Self {
        f64::NAN
    }
}

impl Sentinel for Vector3 {
    fn sentinel() -> Self {
        Vector3::new(f32::NAN, f32::NAN, f32::NAN)
    }
}

impl Sentinel for Polar {
    fn sentinel() -> Self {
        Polar {
            heading: f32::NAN,
            micro_tesla: f32::NAN,
            gauss: f32::NAN,
        }
    }
}

impl<T: Sentinel, U: Sentinel> Sentinel for (T, U) {
    fn sentinel() -> Self {
        (T::sentinel(), U::sentinel())
    }
}

/// Extensión sobre los resultados de lectura
pub trait ReadingExt<T> {
    /// Devuelve el valor o, si hubo error, lo registra y devuelve el centinela
    fn or_sentinel(self) -> T;
}

impl<T: Sentinel> ReadingExt<T> for Result<T, PiicoDevError> {
    fn or_sentinel(self) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Lectura fallida: {}", e);
                T::sentinel()
            }
        }
    }
}
