//! Acelerómetro de 3 ejes LIS3DH
//!
//! Todas las lecturas ponen a 1 el bit 7 del registro para activar el
//! autoincremento de dirección del chip.

use embedded_hal::delay::DelayNs;

use crate::config::IdentityCheck;
use crate::conversion::{clear_bit, i16_from_le, read_bit, set_bit, write_crumb};
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::lis3dh as regs;
use crate::types::{Address, Vector3};

const STARTUP_MS: u32 = 5;

/// Rango de medida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccelRange {
    #[default]
    G2,
    G4,
    G8,
    G16,
}

impl AccelRange {
    pub fn from_g(g: u8) -> Result<Self, PiicoDevError> {
        match g {
            2 => Ok(AccelRange::G2),
            4 => Ok(AccelRange::G4),
            8 => Ok(AccelRange::G8),
            16 => Ok(AccelRange::G16),
            _ => Err(PiicoDevError::InvalidParameter("el rango debe ser 2, 4, 8 o 16 g")),
        }
    }

    fn code(self) -> u8 {
        self as u8
    }

    /// LSB por m/s²
    fn divisor(self) -> f32 {
        match self {
            AccelRange::G2 => 1670.295,
            AccelRange::G4 => 835.1476,
            AccelRange::G8 => 417.6757,
            AccelRange::G16 => 139.1912,
        }
    }
}

/// Código de CTRL_REG1 para una frecuencia de muestreo en Hz
fn rate_code(hz: u16) -> Result<u8, PiicoDevError> {
    match hz {
        0 => Ok(0),
        1 => Ok(1),
        10 => Ok(2),
        25 => Ok(3),
        50 => Ok(4),
        100 => Ok(5),
        200 => Ok(6),
        400 => Ok(7),
        _ => Err(PiicoDevError::InvalidParameter(
            "la frecuencia debe ser 0, 1, 10, 25, 50, 100, 200 o 400 Hz",
        )),
    }
}

/// Modo de detección de toques
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tap {
    Disabled,
    Single,
    Double,
    /// Valor directo de CLICK_CFG
    Custom(u8),
}

/// Parámetros de tiempo y umbral de la detección de toques
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapConfig {
    /// 0..=127
    pub threshold: u8,
    pub time_limit: u8,
    pub latency: u8,
    pub window: u8,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            threshold: 40,
            time_limit: 10,
            latency: 80,
            window: 255,
        }
    }
}

/// Parámetros de la detección de sacudidas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeConfig {
    /// Umbral en m/s² sobre la aceleración media; en reposo la media es ~9.8
    pub threshold: f32,
    pub avg_count: u32,
    /// Tiempo total de muestreo (ms)
    pub total_delay_ms: u32,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            threshold: 15.0,
            avg_count: 40,
            total_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Lis3dhConfig {
    pub address: Address,
    pub range: AccelRange,
    /// Hz
    pub rate: u16,
    pub identity: IdentityCheck,
}

impl Default for Lis3dhConfig {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::I2C_ADDRESS),
            range: AccelRange::G2,
            rate: 400,
            identity: IdentityCheck::default(),
        }
    }
}

impl Lis3dhConfig {
    /// Dirección según el interruptor ASW: 0x19 apagado, 0x18 encendido
    pub fn with_asw(mut self, asw: bool) -> Self {
        let address = if asw { regs::I2C_ADDRESS - 1 } else { regs::I2C_ADDRESS };
        self.address = Address::Literal(address);
        self
    }
}

pub struct Lis3dh<I, D> {
    dev: DeviceHandle<I, D>,
    range: AccelRange,
    rate: u16,
}

impl<I, D, E> Lis3dh<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    pub fn new(interface: I, delay: D, config: Lis3dhConfig) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::I2C_ADDRESS);
        let mut accel = Self {
            dev: DeviceHandle::new(interface, delay, address),
            range: config.range,
            rate: config.rate,
        };
        accel
            .dev
            .check_identity(config.identity, &[regs::WHO_AM_I_VALUE as u16], |dev| {
                dev.read_reg(regs::WHO_AM_I).map(u16::from)
            })?;
        accel.dev.delay_ms(STARTUP_MS);

        accel.dev.write_reg(regs::CTRL_REG1, regs::CTRL1_XYZ_EN)?;
        accel.dev.write_reg(regs::CTRL_REG4, regs::CTRL4_BDU_HR)?;
        accel.set_range(config.range)?;
        accel.set_rate(config.rate)?;
        Ok(accel)
    }

    fn read(&mut self, reg: u8) -> Result<u8, PiicoDevError> {
        self.dev.read_reg(reg | regs::AUTO_INCREMENT)
    }

    fn update<F>(&mut self, reg: u8, f: F) -> Result<(), PiicoDevError>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = f(self.read(reg)?);
        self.dev.write_reg(reg, value)
    }

    /// Contenido de WHO_AM_I (0x33)
    pub fn device_id(&mut self) -> Result<u8, PiicoDevError> {
        self.dev.read_reg(regs::WHO_AM_I)
    }

    pub fn data_ready(&mut self) -> Result<bool, PiicoDevError> {
        Ok(read_bit(self.read(regs::STATUS_REG)?, regs::STATUS_ZYXDA))
    }

    pub fn range(&self) -> AccelRange {
        self.range
    }

    pub fn set_range(&mut self, range: AccelRange) -> Result<(), PiicoDevError> {
        self.update(regs::CTRL_REG4, |v| write_crumb(v, regs::BIT_RANGE, range.code()))?;
        self.range = range;
        Ok(())
    }

    /// Frecuencia de muestreo en Hz
    pub fn rate(&self) -> u16 {
        self.rate
    }

    pub fn set_rate(&mut self, hz: u16) -> Result<(), PiicoDevError> {
        let code = rate_code(hz)?;
        self.update(regs::CTRL_REG1, |v| (v & 0x0F) | (code << 4))?;
        self.rate = hz;
        Ok(())
    }

    /// Aceleración en m/s²
    pub fn acceleration(&mut self) -> Result<Vector3, PiicoDevError> {
        let mut buf = [0u8; 6];
        self.dev
            .read_regs(regs::OUT_X_L | regs::AUTO_INCREMENT, &mut buf)?;
        let den = self.range.divisor();
        Ok(Vector3::new(
            i16_from_le([buf[0], buf[1]]) as f32 / den,
            i16_from_le([buf[2], buf[3]]) as f32 / den,
            i16_from_le([buf[4], buf[5]]) as f32 / den,
        ))
    }

    /// Inclinación en grados alrededor de cada eje
    pub fn angle(&mut self) -> Result<Vector3, PiicoDevError> {
        let a = self.acceleration()?;
        Ok(Vector3::new(
            a.y.atan2(a.z).to_degrees(),
            a.z.atan2(a.x).to_degrees(),
            a.x.atan2(a.y).to_degrees(),
        ))
    }

    /// Configura la detección de toques en INT1
    pub fn set_tap(&mut self, tap: Tap, config: TapConfig) -> Result<(), PiicoDevError> {
        if config.threshold > 127 {
            return Err(PiicoDevError::InvalidParameter("el umbral debe estar en 0..=127"));
        }
        let click_cfg = match tap {
            Tap::Disabled => {
                self.update(regs::CTRL_REG3, |v| clear_bit(v, regs::CTRL3_I1_CLICK))?;
                return self.dev.write_reg(regs::CLICK_CFG, 0x00);
            }
            Tap::Single => regs::CLICK_SINGLE_XYZ,
            Tap::Double => regs::CLICK_DOUBLE_XYZ,
            Tap::Custom(raw) => raw,
        };

        self.update(regs::CTRL_REG3, |v| set_bit(v, regs::CTRL3_I1_CLICK))?;
        self.dev.write_reg(regs::CTRL_REG5, regs::CTRL5_LIR_INT1)?;
        self.dev.write_reg(regs::CLICK_CFG, click_cfg)?;
        // la interrupción queda enclavada hasta leer CLICK_SRC
        self.dev.write_regs(
            regs::CLICK_THS | regs::AUTO_INCREMENT,
            &[
                config.threshold | regs::CLICK_THS_LIR,
                config.time_limit,
                config.latency,
                config.window,
            ],
        )
    }

    /// Se ha detectado un toque; la lectura de INT1_SRC libera el pin
    pub fn tapped(&mut self) -> Result<bool, PiicoDevError> {
        let raw = self.read(regs::CLICK_SRC)?;
        if raw & regs::CLICK_SRC_IA != 0 {
            self.read(regs::INT1_SRC)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Promedia `avg_count` lecturas y compara el módulo con el umbral
    pub fn shake(&mut self, config: ShakeConfig) -> Result<bool, PiicoDevError> {
        let count = config.avg_count.max(1);
        let pause = (config.total_delay_ms as f32 / count as f32).round() as u32;
        let mut sum = [0.0f32; 3];
        for _ in 0..count {
            let a = self.acceleration()?;
            sum[0] += a.x;
            sum[1] += a.y;
            sum[2] += a.z;
            self.dev.delay_ms(pause);
        }
        let avg = Vector3::new(
            sum[0] / count as f32,
            sum[1] / count as f32,
            sum[2] / count as f32,
        );
        Ok(avg.magnitude() > config.threshold)
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

    const ADDR: u8 = 0x19;

    fn init_expectations(addr: u8) -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write_read(addr, vec![0x0F], vec![0x33]),
            I2cTransaction::write(addr, vec![0x20, 0x07]),
            I2cTransaction::write(addr, vec![0x23, 0x88]),
            I2cTransaction::write_read(addr, vec![0xA3], vec![0x88]),
            I2cTransaction::write(addr, vec![0x23, 0x88]),
            I2cTransaction::write_read(addr, vec![0xA0], vec![0x07]),
            I2cTransaction::write(addr, vec![0x20, 0x77]),
        ]
    }

    fn flat_sample() -> I2cTransaction {
        // z = 16703 cuentas ~ 10 m/s² en ±2 g
        I2cTransaction::write_read(ADDR, vec![0xA8], vec![0, 0, 0, 0, 0x3F, 0x41])
    }

    #[test]
    fn test_init_and_asw_address() {
        let mut i2c = I2cMock::new(&init_expectations(0x18));
        let config = Lis3dhConfig::default().with_asw(true);
        let accel = Lis3dh::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), config).unwrap();
        assert_eq!(accel.address(), 0x18);
        assert_eq!(accel.rate(), 400);
        i2c.done();
    }

    #[test]
    fn test_acceleration_and_angle() {
        let mut expectations = init_expectations(ADDR);
        expectations.extend([flat_sample(), flat_sample()]);
        let mut i2c = I2cMock::new(&expectations);
        let mut accel =
            Lis3dh::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default()).unwrap();
        let a = accel.acceleration().unwrap();
        assert_eq!(a.x, 0.0);
        assert!((a.z - 10.0).abs() < 1e-3);
        let angle = accel.angle().unwrap();
        assert_eq!(angle.x, 0.0);
        assert!((angle.y - 90.0).abs() < 1e-4);
        i2c.done();
    }

    #[test]
    fn test_range_change() {
        let mut expectations = init_expectations(ADDR);
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0xA3], vec![0x88]),
            I2cTransaction::write(ADDR, vec![0x23, 0xB8]),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut accel =
            Lis3dh::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default()).unwrap();
        accel.set_range(AccelRange::from_g(16).unwrap()).unwrap();
        assert_eq!(accel.range(), AccelRange::G16);
        assert!(AccelRange::from_g(3).is_err());
        assert!(accel.set_rate(300).is_err());
        i2c.done();
    }

    #[test]
    fn test_single_tap_setup_and_detection() {
        let mut expectations = init_expectations(ADDR);
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0xA2], vec![0x00]),
            I2cTransaction::write(ADDR, vec![0x22, 0x80]),
            I2cTransaction::write(ADDR, vec![0x24, 0x08]),
            I2cTransaction::write(ADDR, vec![0x38, 0x15]),
            I2cTransaction::write(ADDR, vec![0xBA, 0xA8, 10, 80, 255]),
            I2cTransaction::write_read(ADDR, vec![0xB9], vec![0x40]),
            I2cTransaction::write_read(ADDR, vec![0xB1], vec![0x00]),
            I2cTransaction::write_read(ADDR, vec![0xB9], vec![0x00]),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut accel =
            Lis3dh::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default()).unwrap();
        accel.set_tap(Tap::Single, TapConfig::default()).unwrap();
        assert!(accel.tapped().unwrap());
        assert!(!accel.tapped().unwrap());
        let bad = TapConfig {
            threshold: 200,
            ..Default::default()
        };
        assert!(accel.set_tap(Tap::Double, bad).is_err());
        i2c.done();
    }

    #[test]
    fn test_disable_tap() {
        let mut expectations = init_expectations(ADDR);
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0xA2], vec![0x80]),
            I2cTransaction::write(ADDR, vec![0x22, 0x00]),
            I2cTransaction::write(ADDR, vec![0x38, 0x00]),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut accel =
            Lis3dh::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default()).unwrap();
        accel.set_tap(Tap::Disabled, TapConfig::default()).unwrap();
        i2c.done();
    }

    #[test]
    fn test_shake() {
        let mut expectations = init_expectations(ADDR);
        expectations.extend([flat_sample(), flat_sample(), flat_sample(), flat_sample()]);
        let mut i2c = I2cMock::new(&expectations);
        let mut accel =
            Lis3dh::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default()).unwrap();
        let calm = ShakeConfig {
            avg_count: 2,
            ..Default::default()
        };
        assert!(!accel.shake(calm).unwrap());
        let sensitive = ShakeConfig {
            threshold: 5.0,
            avg_count: 2,
            total_delay_ms: 10,
        };
        assert!(accel.shake(sensitive).unwrap());
        i2c.done();
    }

    #[test]
    fn test_read_failure_gives_nan() {
        let mut expectations = init_expectations(ADDR);
        expectations
            .push(I2cTransaction::write_read(ADDR, vec![0xA8], vec![0; 6]).with_error(ErrorKind::Other));
        let mut i2c = I2cMock::new(&expectations);
        let mut accel =
            Lis3dh::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default()).unwrap();
        assert!(accel.acceleration().or_sentinel().is_nan());
        i2c.done();
    }
}
