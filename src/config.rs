//! Configuración compartida por los drivers

use std::path::PathBuf;

/// Nombre por defecto del fichero de calibración de los magnetómetros
pub const DEFAULT_CALIBRATION_FILE: &str = "calibration.cal";
/// Nombre por defecto del registro de muestras en bruto
pub const DEFAULT_CALIBRATION_LOG: &str = "calibration.log";

/// Qué hacer si el registro de identidad no coincide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityCheck {
    /// No leer el registro de identidad
    Skip,
    /// Registrar un aviso y continuar (admite módulos compatibles)
    #[default]
    Warn,
    /// Fallar la construcción con `WrongDevice`
    Strict,
}

/// Rutas de persistencia de la calibración
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationPaths {
    /// Fichero de offsets. `None` mantiene la calibración solo en memoria.
    pub file: Option<PathBuf>,
    /// Fichero opcional para volcar las muestras en bruto ("x,y,z" por línea)
    pub log: Option<PathBuf>,
}

impl Default for CalibrationPaths {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from(DEFAULT_CALIBRATION_FILE)),
            log: None,
        }
    }
}

impl CalibrationPaths {
    /// Calibración sin persistencia
    pub fn in_memory() -> Self {
        Self { file: None, log: None }
    }

    /// Activa el registro de muestras en el fichero por defecto
    pub fn with_log(mut self) -> Self {
        self.log = Some(PathBuf::from(DEFAULT_CALIBRATION_LOG));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let paths = CalibrationPaths::default();
        assert_eq!(paths.file, Some(PathBuf::from("calibration.cal")));
        assert!(paths.log.is_none());
        assert_eq!(IdentityCheck::default(), IdentityCheck::Warn);
        assert_eq!(
            CalibrationPaths::default().with_log().log,
            Some(PathBuf::from("calibration.log"))
        );
    }
}
