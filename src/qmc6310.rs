//! Magnetómetro de 3 ejes QMC6310
//!
//! El registro CONTROL1 agrupa modo, ODR y los dos sobremuestreos en campos
//! de 2 bits; CONTROL2 lleva el rango. Ambos se mantienen en caché para poder
//! cambiar un campo sin leer el registro.

use embedded_hal::delay::DelayNs;

use crate::calibration::{self, Calibrator};
use crate::config::CalibrationPaths;
use crate::conversion::{heading_degrees, i16_from_le, read_bit, write_crumb};
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::qmc6310 as regs;
use crate::types::{Address, Polar, Vector3};

/// Espera entre muestras durante la calibración (ms)
const CALIBRATION_TICK_MS: u32 = 5;
/// ODR usado durante la calibración (el más rápido)
const CALIBRATION_ODR: u8 = 3;

/// Rango de medida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Range {
    /// ±3000 µT
    #[default]
    Ut3000,
    /// ±1200 µT
    Ut1200,
    /// ±800 µT
    Ut800,
    /// ±200 µT
    Ut200,
}

impl Range {
    pub fn from_microtesla(range: u16) -> Result<Self, PiicoDevError> {
        match range {
            3000 => Ok(Range::Ut3000),
            1200 => Ok(Range::Ut1200),
            800 => Ok(Range::Ut800),
            200 => Ok(Range::Ut200),
            _ => Err(PiicoDevError::InvalidParameter(
                "el rango debe ser 200, 800, 1200 o 3000 µT",
            )),
        }
    }

    pub fn microtesla(self) -> u16 {
        match self {
            Range::Ut3000 => 3000,
            Range::Ut1200 => 1200,
            Range::Ut800 => 800,
            Range::Ut200 => 200,
        }
    }

    fn code(self) -> u8 {
        match self {
            Range::Ut3000 => 0,
            Range::Ut1200 => 1,
            Range::Ut800 => 2,
            Range::Ut200 => 3,
        }
    }

    /// µT por LSB
    pub fn sensitivity(self) -> f32 {
        match self {
            Range::Ut3000 => 0.1,
            Range::Ut1200 => 0.04,
            Range::Ut800 => 0.026_666_667,
            Range::Ut200 => 0.006_666_666_7,
        }
    }
}

/// Configuración inicial del QMC6310
#[derive(Debug, Clone)]
pub struct Qmc6310Config {
    pub address: Address,
    /// Código de ODR (0..=3)
    pub odr: u8,
    /// Sobremuestreo 1 (0..=3)
    pub osr1: u8,
    /// Sobremuestreo 2 (0..=3)
    pub osr2: u8,
    pub range: Range,
    pub calibration: CalibrationPaths,
}

impl Default for Qmc6310Config {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::I2C_ADDRESS),
            odr: 3,
            osr1: 0,
            osr2: 3,
            range: Range::Ut3000,
            calibration: CalibrationPaths::default(),
        }
    }
}

pub struct Qmc6310<I, D> {
    dev: DeviceHandle<I, D>,
    cr1: u8,
    cr2: u8,
    /// ODR elegido por el usuario, se restaura tras calibrar
    odr: u8,
    range: Range,
    offset: [f32; 3],
    declination: f32,
    calibration: CalibrationPaths,
}

impl<I, D, E> Qmc6310<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    /// Configura modo normal, ODR, sobremuestreo y rango, y carga la
    /// calibración si existe el fichero
    pub fn new(interface: I, delay: D, config: Qmc6310Config) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::I2C_ADDRESS);
        let mut mag = Self {
            dev: DeviceHandle::new(interface, delay, address),
            cr1: 0,
            cr2: 0,
            odr: config.odr,
            range: config.range,
            offset: [0.0; 3],
            declination: 0.0,
            calibration: config.calibration,
        };

        mag.set_mode(1)?;
        mag.set_output_data_rate(config.odr)?;
        mag.set_over_sampling_ratio(config.osr1)?;
        mag.set_over_sampling_rate(config.osr2)?;
        mag.set_range(config.range)?;

        if let Some(offset) = calibration::load_configured(&mag.calibration) {
            mag.offset = offset;
        }
        Ok(mag)
    }

    fn write_cr1_field(&mut self, bit: u8, value: u8, what: &'static str) -> Result<(), PiicoDevError> {
        if value > 3 {
            return Err(PiicoDevError::InvalidParameter(what));
        }
        let cr1 = write_crumb(self.cr1, bit, value);
        self.dev.write_reg(regs::CONTROL1, cr1)?;
        self.cr1 = cr1;
        Ok(())
    }

    fn set_mode(&mut self, mode: u8) -> Result<(), PiicoDevError> {
        self.write_cr1_field(regs::BIT_MODE, mode, "el modo debe estar en 0..=3")
    }

    /// Código de ODR (0..=3)
    pub fn set_output_data_rate(&mut self, odr: u8) -> Result<(), PiicoDevError> {
        self.write_cr1_field(regs::BIT_ODR, odr, "el ODR debe estar en 0..=3")?;
        self.odr = odr;
        Ok(())
    }

    pub fn set_over_sampling_ratio(&mut self, osr1: u8) -> Result<(), PiicoDevError> {
        self.write_cr1_field(regs::BIT_OSR1, osr1, "OSR1 debe estar en 0..=3")
    }

    pub fn set_over_sampling_rate(&mut self, osr2: u8) -> Result<(), PiicoDevError> {
        self.write_cr1_field(regs::BIT_OSR2, osr2, "OSR2 debe estar en 0..=3")
    }

    /// Cambia el rango; la sensibilidad activa solo cambia si la escritura se completó
    pub fn set_range(&mut self, range: Range) -> Result<(), PiicoDevError> {
        let cr2 = write_crumb(self.cr2, regs::BIT_RANGE, range.code());
        self.dev.write_reg(regs::CONTROL2, cr2)?;
        self.cr2 = cr2;
        self.range = range;
        Ok(())
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Copia de los registros de control `(CONTROL1, CONTROL2)`
    pub fn control_registers(&mut self) -> Result<(u8, u8), PiicoDevError> {
        let mut buf = [0u8; 2];
        self.dev.read_regs(regs::CONTROL1, &mut buf)?;
        Ok((buf[0], buf[1]))
    }

    /// Cuentas del ADC sin offsets. `DataNotReady` si no hay muestra nueva y
    /// `Overflow` si el sensor satura.
    pub fn read_counts(&mut self) -> Result<[f32; 3], PiicoDevError> {
        let status = self.dev.read_reg(regs::STATUS)?;
        if !read_bit(status, regs::STATUS_READY) {
            return Err(PiicoDevError::DataNotReady);
        }
        let mut buf = [0u8; 6];
        self.dev.read_regs(regs::XOUT, &mut buf)?;
        if read_bit(status, regs::STATUS_OVERFLOW) {
            return Err(PiicoDevError::Overflow);
        }
        Ok([
            i16_from_le([buf[0], buf[1]]) as f32,
            i16_from_le([buf[2], buf[3]]) as f32,
            i16_from_le([buf[4], buf[5]]) as f32,
        ])
    }

    /// Cuentas con los offsets de calibración restados
    pub fn read_raw(&mut self) -> Result<Vector3, PiicoDevError> {
        let c = self.read_counts()?;
        Ok(Vector3::new(
            c[0] - self.offset[0],
            c[1] - self.offset[1],
            c[2] - self.offset[2],
        ))
    }

    /// Campo magnético en µT
    pub fn read(&mut self) -> Result<Vector3, PiicoDevError> {
        let raw = self.read_raw()?;
        let s = self.range.sensitivity();
        Ok(Vector3::new(raw.x * s, raw.y * s, raw.z * s))
    }

    pub fn read_polar(&mut self) -> Result<Polar, PiicoDevError> {
        let v = self.read()?;
        Ok(Polar::new(
            heading_degrees(v.x, v.y, self.declination),
            v.magnitude(),
        ))
    }

    pub fn read_magnitude(&mut self) -> Result<f32, PiicoDevError> {
        Ok(self.read_polar()?.micro_tesla)
    }

    pub fn read_heading(&mut self) -> Result<f32, PiicoDevError> {
        Ok(self.read_polar()?.heading)
    }

    /// Declinación magnética local en grados
    pub fn set_declination(&mut self, declination: f32) {
        self.declination = declination;
    }

    pub fn declination(&self) -> f32 {
        self.declination
    }

    pub fn offsets(&self) -> [f32; 3] {
        self.offset
    }

    pub fn set_offsets(&mut self, offset: [f32; 3]) {
        self.offset = offset;
    }

    /// Calibración de hierro duro con los parámetros por defecto
    pub fn calibrate(&mut self) -> Result<(), PiicoDevError> {
        let record = self.calibration.log.is_some();
        self.calibrate_with(Calibrator::new().record_samples(record))
    }

    /// Calibra con un `Calibrator` a medida. Los offsets solo se aplican si
    /// el resultado se pudo guardar.
    pub fn calibrate_with(&mut self, mut calibrator: Calibrator) -> Result<(), PiicoDevError> {
        self.write_cr1_field(regs::BIT_ODR, CALIBRATION_ODR, "el ODR debe estar en 0..=3")?;

        let sampled = calibration::sample_until_done(&mut calibrator, || {
            self.dev.delay_ms(CALIBRATION_TICK_MS);
            self.read_counts()
        });

        let odr = self.odr;
        let restored = self.write_cr1_field(regs::BIT_ODR, odr, "el ODR debe estar en 0..=3");
        if restored.is_err() {
            log::warn!("No se pudo restaurar el ODR {} tras calibrar", odr);
        }
        sampled?;
        restored?;

        let record = calibration::commit(&calibrator, &self.calibration)?;
        self.offset = record.offset;
        Ok(())
    }

    /// Recarga los offsets del fichero configurado
    pub fn load_calibration(&mut self) -> Result<(), PiicoDevError> {
        if let Some(file) = &self.calibration.file {
            self.offset = calibration::load_offsets(file)?;
        }
        Ok(())
    }

    pub fn address(&self) -> u8 {
        self.dev.address()
    }

    pub fn release(self) -> (I, D) {
        self.dev.release()
    }
}
