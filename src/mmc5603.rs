//! Magnetómetro de 3 ejes MMC5603
//!
//! Funciona en modo continuo; cada lectura toma los 9 bytes de salida y usa
//! los 16 bits altos de cada eje, centrados en 32768.

use embedded_hal::delay::DelayNs;

use crate::calibration::{self, Calibrator};
use crate::config::{CalibrationPaths, IdentityCheck};
use crate::conversion::heading_degrees;
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::mmc5603 as regs;
use crate::types::{Address, Polar, Vector3};

/// µT por LSB en modo de 16 bits
pub const SENSITIVITY: f32 = 0.1;

const RESET_TIME_MS: u32 = 20;
const SET_RESET_TIME_MS: u32 = 1;
const CALIBRATION_TICK_MS: u32 = 5;
const STARTUP_MS: u32 = 5;

/// Configuración inicial del MMC5603
#[derive(Debug, Clone)]
pub struct Mmc5603Config {
    pub address: Address,
    /// Frecuencia de muestreo en modo continuo (1..=255)
    pub odr: u8,
    /// Signo aplicado a cada eje `[x, y, z]` al escalar (`true` invierte)
    pub invert: [bool; 3],
    pub identity: IdentityCheck,
    pub calibration: CalibrationPaths,
}

impl Default for Mmc5603Config {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::I2C_ADDRESS),
            odr: 255,
            invert: [true, true, false],
            identity: IdentityCheck::default(),
            calibration: CalibrationPaths::default(),
        }
    }
}

pub struct Mmc5603<I, D> {
    dev: DeviceHandle<I, D>,
    sign: [f32; 3],
    odr: u8,
    offset: [f32; 3],
    declination: f32,
    calibration: CalibrationPaths,
}

impl<I, D, E> Mmc5603<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    pub fn new(interface: I, delay: D, config: Mmc5603Config) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::I2C_ADDRESS);
        let sign = config.invert.map(|inv| if inv { -1.0 } else { 1.0 });
        let mut mag = Self {
            dev: DeviceHandle::new(interface, delay, address),
            sign,
            odr: config.odr,
            offset: [0.0; 3],
            declination: 0.0,
            calibration: config.calibration,
        };

        mag.dev
            .check_identity(config.identity, &[regs::PRODUCT_ID_VALUE as u16], |dev| {
                dev.read_reg(regs::PRODUCT_ID).map(u16::from)
            })?;
        mag.reset()?;
        mag.set_output_data_rate(config.odr)?;
        mag.enable_continuous_mode()?;

        if let Some(offset) = calibration::load_configured(&mag.calibration) {
            mag.offset = offset;
        }
        mag.dev.delay_ms(STARTUP_MS);
        Ok(mag)
    }

    /// Reinicio software seguido de un ciclo SET/RESET
    pub fn reset(&mut self) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::CTRL1, regs::SW_RESET)?;
        self.dev.delay_ms(RESET_TIME_MS);
        self.set_reset()
    }

    /// Pulsos SET y RESET para eliminar la magnetización residual
    pub fn set_reset(&mut self) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::CTRL0, regs::DO_SET)?;
        self.dev.delay_ms(SET_RESET_TIME_MS);
        self.dev.write_reg(regs::CTRL0, regs::DO_RESET)?;
        self.dev.delay_ms(SET_RESET_TIME_MS);
        Ok(())
    }

    pub fn set_output_data_rate(&mut self, odr: u8) -> Result<(), PiicoDevError> {
        if odr == 0 {
            return Err(PiicoDevError::InvalidParameter("el ODR debe estar en 1..=255"));
        }
        self.dev.write_reg(regs::ODR, odr)?;
        self.odr = odr;
        Ok(())
    }

    pub fn output_data_rate(&self) -> u8 {
        self.odr
    }

    pub fn enable_continuous_mode(&mut self) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::CTRL0, regs::CMM_FREQ_EN)?;
        self.dev.write_reg(regs::CTRL2, regs::CMM_EN)
    }

    /// Ancho de banda del filtro (0..=3)
    pub fn set_bandwidth(&mut self, bandwidth: u8) -> Result<(), PiicoDevError> {
        if bandwidth > 3 {
            return Err(PiicoDevError::InvalidParameter("el ancho de banda debe estar en 0..=3"));
        }
        self.dev.write_reg(regs::CTRL1, bandwidth)
    }

    pub fn status(&mut self) -> Result<u8, PiicoDevError> {
        self.dev.read_reg(regs::STATUS)
    }

    /// Hay una medida magnética nueva
    pub fn measurement_done(&mut self) -> Result<bool, PiicoDevError> {
        Ok(self.status()? & regs::MEAS_M_DONE != 0)
    }

    /// Cuentas sin offsets ni signo, en -32768..=32767
    pub fn read_counts(&mut self) -> Result<[f32; 3], PiicoDevError> {
        let mut buf = [0u8; 9];
        self.dev.read_regs(regs::XOUT0, &mut buf)?;
        let axis = |hi: u8, lo: u8| (u16::from_be_bytes([hi, lo]) as i32 - 32768) as f32;
        Ok([
            axis(buf[0], buf[1]),
            axis(buf[2], buf[3]),
            axis(buf[4], buf[5]),
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

    /// Campo magnético en µT con el signo de cada eje aplicado
    pub fn read(&mut self) -> Result<Vector3, PiicoDevError> {
        let raw = self.read_raw()?;
        Ok(Vector3::new(
            raw.x * SENSITIVITY * self.sign[0],
            raw.y * SENSITIVITY * self.sign[1],
            raw.z * SENSITIVITY * self.sign[2],
        ))
    }

    pub fn read_polar(&mut self) -> Result<Polar, PiicoDevError> {
        let v = self.read()?;
        Ok(Polar::new(
            heading_degrees(v.x, -v.y, self.declination),
            v.magnitude(),
        ))
    }

    pub fn read_magnitude(&mut self) -> Result<f32, PiicoDevError> {
        Ok(self.read_polar()?.micro_tesla)
    }

    pub fn read_heading(&mut self) -> Result<f32, PiicoDevError> {
        Ok(self.read_polar()?.heading)
    }

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

    /// Calibración de hierro duro. Con `track_z = false` el offset de z queda a 0,
    /// útil cuando el sensor solo gira en el plano horizontal.
    pub fn calibrate(&mut self, track_z: bool) -> Result<(), PiicoDevError> {
        let record = self.calibration.log.is_some();
        self.calibrate_with(Calibrator::new().track_z(track_z).record_samples(record))
    }

    /// Calibra con un `Calibrator` a medida. Los nuevos offsets solo se
    /// aplican si el resultado se pudo guardar.
    pub fn calibrate_with(&mut self, mut calibrator: Calibrator) -> Result<(), PiicoDevError> {
        calibration::sample_until_done(&mut calibrator, || {
            self.dev.delay_ms(CALIBRATION_TICK_MS);
            self.read_counts()
        })?;
        let record = calibration::commit(&calibrator, &self.calibration)?;
        self.offset = record.offset;
        Ok(())
    }

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
