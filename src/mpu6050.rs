//! IMU de 6 ejes MPU-6050 (acelerómetro y giróscopo)

use embedded_hal::delay::DelayNs;

use crate::conversion::i16_from_be;
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::mpu6050 as regs;
use crate::types::{Address, Vector3, STANDARD_GRAVITY};

/// Rango del acelerómetro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccelRange {
    #[default]
    G2,
    G4,
    G8,
    G16,
}

impl AccelRange {
    /// Valor de ACCEL_CONFIG
    pub fn register_value(self) -> u8 {
        match self {
            AccelRange::G2 => 0x00,
            AccelRange::G4 => 0x08,
            AccelRange::G8 => 0x10,
            AccelRange::G16 => 0x18,
        }
    }

    pub fn from_register(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(AccelRange::G2),
            0x08 => Some(AccelRange::G4),
            0x10 => Some(AccelRange::G8),
            0x18 => Some(AccelRange::G16),
            _ => None,
        }
    }

    /// LSB por g
    pub fn scaler(self) -> f32 {
        match self {
            AccelRange::G2 => 16384.0,
            AccelRange::G4 => 8192.0,
            AccelRange::G8 => 4096.0,
            AccelRange::G16 => 2048.0,
        }
    }

    pub fn g(self) -> u8 {
        match self {
            AccelRange::G2 => 2,
            AccelRange::G4 => 4,
            AccelRange::G8 => 8,
            AccelRange::G16 => 16,
        }
    }
}

/// Rango del giróscopo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GyroRange {
    #[default]
    Dps250,
    Dps500,
    Dps1000,
    Dps2000,
}

impl GyroRange {
    /// Valor de GYRO_CONFIG
    pub fn register_value(self) -> u8 {
        match self {
            GyroRange::Dps250 => 0x00,
            GyroRange::Dps500 => 0x08,
            GyroRange::Dps1000 => 0x10,
            GyroRange::Dps2000 => 0x18,
        }
    }

    pub fn from_register(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(GyroRange::Dps250),
            0x08 => Some(GyroRange::Dps500),
            0x10 => Some(GyroRange::Dps1000),
            0x18 => Some(GyroRange::Dps2000),
            _ => None,
        }
    }

    /// LSB por °/s
    pub fn scaler(self) -> f32 {
        match self {
            GyroRange::Dps250 => 131.0,
            GyroRange::Dps500 => 65.5,
            GyroRange::Dps1000 => 32.8,
            GyroRange::Dps2000 => 16.4,
        }
    }

    pub fn degrees_per_second(self) -> u16 {
        match self {
            GyroRange::Dps250 => 250,
            GyroRange::Dps500 => 500,
            GyroRange::Dps1000 => 1000,
            GyroRange::Dps2000 => 2000,
        }
    }
}

/// Unidad de la aceleración
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccelUnit {
    #[default]
    MetersPerSecondSquared,
    G,
}

#[derive(Debug, Clone, Copy)]
pub struct Mpu6050Config {
    pub address: Address,
    pub accel_range: AccelRange,
    pub gyro_range: GyroRange,
}

impl Default for Mpu6050Config {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::I2C_ADDRESS),
            accel_range: AccelRange::G2,
            gyro_range: GyroRange::Dps250,
        }
    }
}

impl Mpu6050Config {
    /// Dirección según el interruptor ASW: 0x68 apagado, 0x69 encendido
    pub fn with_asw(mut self, asw: bool) -> Self {
        self.address = Address::Literal(regs::I2C_ADDRESS + asw as u8);
        self
    }
}

pub struct Mpu6050<I, D> {
    dev: DeviceHandle<I, D>,
    accel_range: AccelRange,
    gyro_range: GyroRange,
}

impl<I, D, E> Mpu6050<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    /// Despierta el chip (arranca en reposo) y fija los rangos
    pub fn new(interface: I, delay: D, config: Mpu6050Config) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::I2C_ADDRESS);
        let mut imu = Self {
            dev: DeviceHandle::new(interface, delay, address),
            accel_range: config.accel_range,
            gyro_range: config.gyro_range,
        };
        imu.dev.write_reg(regs::PWR_MGMT_1, 0x00).map_err(|e| {
            log::warn!("MPU-6050 no encontrado en {:#04x}", address);
            e
        })?;
        log::debug!("MPU-6050 encontrado en {:#04x}", address);
        imu.set_accel_range(config.accel_range)?;
        imu.set_gyro_range(config.gyro_range)?;
        Ok(imu)
    }

    fn read_vector(&mut self, reg: u8) -> Result<[f32; 3], PiicoDevError> {
        let mut buf = [0u8; 6];
        self.dev.read_regs(reg, &mut buf)?;
        Ok([
            i16_from_be([buf[0], buf[1]]) as f32,
            i16_from_be([buf[2], buf[3]]) as f32,
            i16_from_be([buf[4], buf[5]]) as f32,
        ])
    }

    /// Temperatura del chip en °C
    pub fn read_temperature(&mut self) -> Result<f32, PiicoDevError> {
        let raw = self.dev.read_i16_be(regs::TEMP_OUT_H)?;
        Ok(raw as f32 / 340.0 + 36.53)
    }

    pub fn set_accel_range(&mut self, range: AccelRange) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::ACCEL_CONFIG, 0x00)?;
        self.dev.write_reg(regs::ACCEL_CONFIG, range.register_value())?;
        self.accel_range = range;
        Ok(())
    }

    pub fn accel_range(&self) -> AccelRange {
        self.accel_range
    }

    /// Rango leído del registro; `None` si el valor no es uno de los conocidos
    pub fn read_accel_range(&mut self) -> Result<Option<AccelRange>, PiicoDevError> {
        Ok(AccelRange::from_register(self.dev.read_reg(regs::ACCEL_CONFIG)?))
    }

    pub fn set_gyro_range(&mut self, range: GyroRange) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::GYRO_CONFIG, 0x00)?;
        self.dev.write_reg(regs::GYRO_CONFIG, range.register_value())?;
        self.gyro_range = range;
        Ok(())
    }

    pub fn gyro_range(&self) -> GyroRange {
        self.gyro_range
    }

    pub fn read_gyro_range(&mut self) -> Result<Option<GyroRange>, PiicoDevError> {
        Ok(GyroRange::from_register(self.dev.read_reg(regs::GYRO_CONFIG)?))
    }

    pub fn read_accel_data(&mut self, unit: AccelUnit) -> Result<Vector3, PiicoDevError> {
        let raw = self.read_vector(regs::ACCEL_XOUT_H)?;
        let scale = match unit {
            AccelUnit::G => 1.0 / self.accel_range.scaler(),
            AccelUnit::MetersPerSecondSquared => STANDARD_GRAVITY / self.accel_range.scaler(),
        };
        Ok(Vector3::new(raw[0] * scale, raw[1] * scale, raw[2] * scale))
    }

    /// Módulo de la aceleración
    pub fn read_accel_abs(&mut self, unit: AccelUnit) -> Result<f32, PiicoDevError> {
        Ok(self.read_accel_data(unit)?.magnitude())
    }

    /// Velocidad angular en °/s
    pub fn read_gyro_data(&mut self) -> Result<Vector3, PiicoDevError> {
        let raw = self.read_vector(regs::GYRO_XOUT_H)?;
        let s = self.gyro_range.scaler();
        Ok(Vector3::new(raw[0] / s, raw[1] / s, raw[2] / s))
    }

    pub fn address(&self) -> u8 {
        self.dev.address()
    }

    pub fn release(self) -> (I, D) {
        self.dev.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ReadingExt;
    use crate::interface::UnifiedI2c;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x68;

    fn init_expectations() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(ADDR, vec![0x6B, 0x00]),
            I2cTransaction::write(ADDR, vec![0x1C, 0x00]),
            I2cTransaction::write(ADDR, vec![0x1C, 0x00]),
            I2cTransaction::write(ADDR, vec![0x1B, 0x00]),
            I2cTransaction::write(ADDR, vec![0x1B, 0x00]),
        ]
    }

    fn imu(expectations: &[I2cTransaction]) -> (I2cMock, Mpu6050<UnifiedI2c<I2cMock>, NoopDelay>) {
        let i2c = I2cMock::new(expectations);
        let imu = Mpu6050::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default())
            .unwrap();
        (i2c, imu)
    }

    #[test]
    fn test_accel_in_g_and_ms2() {
        let mut expectations = init_expectations();
        let sample = vec![0x40, 0x00, 0x00, 0x00, 0xC0, 0x00];
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0x3B], sample.clone()),
            I2cTransaction::write_read(ADDR, vec![0x3B], sample),
        ]);
        let (mut i2c, mut imu) = imu(&expectations);
        let g = imu.read_accel_data(AccelUnit::G).unwrap();
        assert_eq!(g, Vector3::new(1.0, 0.0, -1.0));
        let abs = imu.read_accel_abs(AccelUnit::MetersPerSecondSquared).unwrap();
        assert!((abs - STANDARD_GRAVITY * 2f32.sqrt()).abs() < 1e-4);
        i2c.done();
    }

    #[test]
    fn test_range_change_rescales() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write(ADDR, vec![0x1C, 0x00]),
            I2cTransaction::write(ADDR, vec![0x1C, 0x18]),
            I2cTransaction::write_read(ADDR, vec![0x1C], vec![0x18]),
            I2cTransaction::write_read(ADDR, vec![0x3B], vec![0x08, 0x00, 0, 0, 0, 0]),
            I2cTransaction::write(ADDR, vec![0x1B, 0x00]),
            I2cTransaction::write(ADDR, vec![0x1B, 0x08]),
            I2cTransaction::write_read(ADDR, vec![0x43], vec![0x00, 0x83, 0, 0, 0xFF, 0x7D]),
        ]);
        let (mut i2c, mut imu) = imu(&expectations);
        imu.set_accel_range(AccelRange::G16).unwrap();
        assert_eq!(imu.read_accel_range().unwrap(), Some(AccelRange::G16));
        assert_eq!(imu.read_accel_data(AccelUnit::G).unwrap().x, 1.0);
        imu.set_gyro_range(GyroRange::Dps500).unwrap();
        let gyro = imu.read_gyro_data().unwrap();
        assert!((gyro.x - 2.0).abs() < 1e-5);
        assert!((gyro.z + 2.0).abs() < 1e-5);
        i2c.done();
    }

    #[test]
    fn test_temperature() {
        let mut expectations = init_expectations();
        // -340 -> 35.53 °C
        expectations.push(I2cTransaction::write_read(ADDR, vec![0x41], vec![0xFE, 0xAC]));
        let (mut i2c, mut imu) = imu(&expectations);
        assert!((imu.read_temperature().unwrap() - 35.53).abs() < 1e-4);
        i2c.done();
    }

    #[test]
    fn test_read_failure_gives_nan() {
        let mut expectations = init_expectations();
        expectations.push(
            I2cTransaction::write_read(ADDR, vec![0x41], vec![0, 0]).with_error(ErrorKind::Other),
        );
        let (mut i2c, mut imu) = imu(&expectations);
        assert!(imu.read_temperature().or_sentinel().is_nan());
        i2c.done();
    }

    #[test]
    fn test_unknown_range_register() {
        assert_eq!(AccelRange::from_register(0x04), None);
        assert_eq!(GyroRange::from_register(0x10), Some(GyroRange::Dps1000));
        assert_eq!(Mpu6050Config::default().with_asw(true).address, Address::Literal(0x69));
    }
}
