//! Calibración de hierro duro para los magnetómetros
//!
//! El procedimiento sigue la señal filtrada con una media móvil exponencial y
//! registra los extremos de cada eje. Termina cuando pasan `budget` muestras
//! seguidas sin que cambie ningún extremo; el offset de cada eje es el punto
//! medio entre su mínimo y su máximo.
//!
//! Formato del fichero: una etiqueta y un valor por línea, en el orden
//! `x_min, x_max, y_min, y_max, z_min, z_max, x_offset, y_offset, z_offset`.
//! Al cargar se saltan las 13 primeras líneas y se leen los tres offsets.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CalibrationPaths;
use crate::device::PiicoDevError;

/// Muestras consecutivas sin cambios que dan por terminada la calibración
pub const CALIBRATION_SAMPLES: u32 = 1000;
/// Peso de la media móvil exponencial
pub const EMA_ALPHA: f32 = 0.5;
/// Líneas que preceden al primer offset en el fichero
pub const HEADER_LINES: usize = 13;

const INITIAL_MIN: f32 = 65535.0;
const INITIAL_MAX: f32 = -65535.0;

const LABELS: [&str; 9] = [
    "x_min:", "x_max:", "y_min:", "y_max:", "z_min:", "z_max:", "x_offset:", "y_offset:",
    "z_offset:",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    Sampling,
    Done,
}

/// Máquina de estados del procedimiento de calibración
#[derive(Debug, Clone)]
pub struct Calibrator {
    min: [f32; 3],
    max: [f32; 3],
    ema: [f32; 3],
    idle: u32,
    budget: u32,
    alpha: f32,
    track_z: bool,
    samples: Option<Vec<[f32; 3]>>,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calibrator {
    pub fn new() -> Self {
        Self {
            min: [INITIAL_MIN; 3],
            max: [INITIAL_MAX; 3],
            ema: [0.0; 3],
            idle: 0,
            budget: CALIBRATION_SAMPLES,
            alpha: EMA_ALPHA,
            track_z: true,
            samples: None,
        }
    }

    /// Cambia el número de muestras sin cambios necesario para terminar
    pub fn with_budget(mut self, budget: u32) -> Self {
        self.budget = budget.max(1);
        self
    }

    /// Si es `false` el eje z no se sigue y su offset queda en 0
    pub fn track_z(mut self, track: bool) -> Self {
        self.track_z = track;
        self
    }

    /// Guarda las muestras en bruto para volcarlas después
    pub fn record_samples(mut self, record: bool) -> Self {
        self.samples = if record { Some(Vec::new()) } else { None };
        self
    }

    pub fn state(&self) -> CalibrationState {
        if self.idle >= self.budget {
            CalibrationState::Done
        } else {
            CalibrationState::Sampling
        }
    }

    /// Fracción del presupuesto consumida sin cambios (0.0 - 1.0)
    pub fn progress(&self) -> f32 {
        self.idle.min(self.budget) as f32 / self.budget as f32
    }

    /// Procesa una muestra en bruto
    pub fn observe(&mut self, sample: [f32; 3]) -> CalibrationState {
        if self.state() == CalibrationState::Done {
            return CalibrationState::Done;
        }
        self.idle += 1;
        if let Some(samples) = self.samples.as_mut() {
            samples.push(sample);
        }

        let axes = if self.track_z { 3 } else { 2 };
        for axis in 0..axes {
            let filtered = self.alpha * sample[axis] + (1.0 - self.alpha) * self.ema[axis];
            self.ema[axis] = filtered;
            if filtered < self.min[axis] {
                self.min[axis] = filtered;
                self.idle = 0;
            }
            if filtered > self.max[axis] {
                self.max[axis] = filtered;
                self.idle = 0;
            }
        }
        self.state()
    }

    /// Tick sin muestra (sensor no listo)
    pub fn skip(&mut self) -> CalibrationState {
        if self.state() == CalibrationState::Sampling {
            self.idle += 1;
        }
        self.state()
    }

    pub fn samples(&self) -> &[[f32; 3]] {
        self.samples.as_deref().unwrap_or(&[])
    }

    /// Extremos y offsets resultantes
    pub fn finish(&self) -> CalibrationRecord {
        let mut offset = [0.0f32; 3];
        let axes = if self.track_z { 3 } else { 2 };
        for axis in 0..axes {
            offset[axis] = (self.max[axis] + self.min[axis]) / 2.0;
        }
        CalibrationRecord {
            min: self.min,
            max: self.max,
            offset,
        }
    }
}

/// Resultado de una calibración
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRecord {
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub offset: [f32; 3],
}

impl CalibrationRecord {
    /// Texto del fichero de calibración (18 líneas)
    pub fn to_file_contents(&self) -> String {
        let values = [
            self.min[0],
            self.max[0],
            self.min[1],
            self.max[1],
            self.min[2],
            self.max[2],
            self.offset[0],
            self.offset[1],
            self.offset[2],
        ];
        let mut out = String::new();
        for (i, (label, value)) in LABELS.iter().zip(values.iter()).enumerate() {
            if i > 0 {
                out.push('\n');
            }
            // write! sobre String no falla
            let _ = write!(out, "{}\n{}", label, value);
        }
        out
    }
}

/// Extrae los offsets `[x, y, z]` del contenido de un fichero de calibración
pub fn parse_offsets(contents: &str) -> Result<[f32; 3], PiicoDevError> {
    let mut lines = contents.lines().skip(HEADER_LINES);
    let mut offsets = [0.0f32; 3];
    for (i, offset) in offsets.iter_mut().enumerate() {
        if i > 0 {
            lines.next();
        }
        *offset = lines
            .next()
            .and_then(|l| l.trim().parse::<f32>().ok())
            .ok_or(PiicoDevError::CalibrationFormat)?;
    }
    Ok(offsets)
}

/// Carga los offsets desde un fichero
pub fn load_offsets(path: &Path) -> Result<[f32; 3], PiicoDevError> {
    let contents = fs::read_to_string(path)?;
    parse_offsets(&contents)
}

/// Guarda el registro en `path` escribiendo primero un fichero temporal
/// hermano y renombrándolo, de forma que el fichero anterior no quede a medias.
pub fn save_record(path: &Path, record: &CalibrationRecord) -> Result<(), PiicoDevError> {
    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, record.to_file_contents()) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        PiicoDevError::from(e)
    })
}

/// Vuelca las muestras en bruto, una línea "x,y,z" por muestra
pub fn write_sample_log(path: &Path, samples: &[[f32; 3]]) -> Result<(), PiicoDevError> {
    let mut out = String::with_capacity(samples.len() * 16);
    for s in samples {
        let _ = writeln!(out, "{},{},{}", s[0], s[1], s[2]);
    }
    fs::write(path, out)?;
    Ok(())
}

/// Persiste el resultado de `calibrator` según `paths` y lo devuelve.
///
/// Si falla la escritura del fichero de offsets se devuelve el error y el
/// llamador no debe aplicar los nuevos offsets. Un fallo al escribir el
/// registro de muestras solo se avisa.
pub fn commit(
    calibrator: &Calibrator,
    paths: &CalibrationPaths,
) -> Result<CalibrationRecord, PiicoDevError> {
    let record = calibrator.finish();
    if let Some(file) = &paths.file {
        save_record(file, &record)?;
        log::info!("Calibración guardada en {}", file.display());
    }
    if let Some(log_file) = &paths.log {
        if let Err(e) = write_sample_log(log_file, calibrator.samples()) {
            log::warn!("No se pudo escribir {}: {}", log_file.display(), e);
        }
    }
    Ok(record)
}

/// Alimenta `calibrator` con las muestras de `read` hasta que termina.
///
/// `DataNotReady` y `Overflow` cuentan como tick sin muestra; cualquier otro
/// error interrumpe la calibración.
pub fn sample_until_done<F>(calibrator: &mut Calibrator, mut read: F) -> Result<(), PiicoDevError>
where
    F: FnMut() -> Result<[f32; 3], PiicoDevError>,
{
    log::info!("Calibrando: gira el sensor lentamente hasta completar la barra");
    let mut last_step = 0;
    while calibrator.state() == CalibrationState::Sampling {
        match read() {
            Ok(sample) => calibrator.observe(sample),
            Err(PiicoDevError::DataNotReady) | Err(PiicoDevError::Overflow) => calibrator.skip(),
            Err(e) => return Err(e),
        };
        let step = (calibrator.progress() * 10.0) as u32;
        if step != last_step {
            log::debug!("[{:<10}]", "*".repeat(step as usize));
            last_step = step;
        }
    }
    log::info!("Calibración completada");
    Ok(())
}

/// Carga los offsets si hay fichero configurado. Sin fichero devuelve `None`;
/// si el fichero no existe o está mal formado avisa y devuelve `None`.
pub fn load_configured(paths: &CalibrationPaths) -> Option<[f32; 3]> {
    let file = paths.file.as_ref()?;
    match load_offsets(file) {
        Ok(offsets) => Some(offsets),
        Err(e) => {
            log::warn!(
                "Sin calibración en {} ({}). Ejecuta calibrate() para mejores resultados",
                file.display(),
                e
            );
            None
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
