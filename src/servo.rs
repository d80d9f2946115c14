//! Controlador de servos PCA9685 y servos individuales
//!
//! `ServoDriver` habla con el PCA9685 (frecuencia y ciclo de trabajo por
//! canal). `Servo` guarda los límites de pulso de un servo concreto y recibe
//! el controlador en cada llamada, de modo que varios servos comparten el mismo
//! controlador sin referencias cruzadas.

use embedded_hal::delay::DelayNs;

use crate::conversion::remap;
use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::pca9685 as regs;
use crate::types::Address;

/// Ciclo de trabajo máximo (12 bits)
pub const DUTY_MAX: u16 = 4095;
const CHANNELS: u8 = 16;
const OSCILLATOR_RESTART_MS: u32 = 1;

/// Prescaler del oscilador para una frecuencia de PWM
pub fn prescale_for(frequency_hz: f32) -> Result<u8, PiicoDevError> {
    if !(frequency_hz > 0.0) {
        return Err(PiicoDevError::InvalidParameter("la frecuencia debe ser positiva"));
    }
    let prescale = (regs::OSCILLATOR_HZ / 4096.0 / frequency_hz + 0.5) as u32;
    if prescale < regs::PRESCALE_MIN as u32 || prescale > u8::MAX as u32 {
        return Err(PiicoDevError::InvalidParameter("frecuencia fuera de 24..=1526 Hz"));
    }
    Ok(prescale as u8)
}

#[derive(Debug, Clone, Copy)]
pub struct ServoDriverConfig {
    pub address: Address,
    /// Frecuencia de PWM en Hz
    pub frequency: f32,
}

impl Default for ServoDriverConfig {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::I2C_ADDRESS),
            frequency: 50.0,
        }
    }
}

impl ServoDriverConfig {
    /// Dirección según los interruptores ASW `[asw0, asw1]`
    pub fn with_asw(mut self, asw: [bool; 2]) -> Self {
        self.address = Address::Literal(regs::I2C_ADDRESS + asw[0] as u8 + 2 * asw[1] as u8);
        self
    }
}

/// Controlador PWM PCA9685
pub struct ServoDriver<I, D> {
    dev: DeviceHandle<I, D>,
    frequency: f32,
}

impl<I, D, E> ServoDriver<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    pub fn new(interface: I, delay: D, config: ServoDriverConfig) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::I2C_ADDRESS);
        let mut driver = Self {
            dev: DeviceHandle::new(interface, delay, address),
            frequency: 0.0,
        };
        driver.reset()?;
        driver.set_frequency(config.frequency)?;
        Ok(driver)
    }

    pub fn reset(&mut self) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::MODE1, 0x00)
    }

    /// Frecuencia real resultante del prescaler
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Para el oscilador, aplica el prescaler y lo rearranca con autoincremento
    pub fn set_frequency(&mut self, frequency_hz: f32) -> Result<(), PiicoDevError> {
        let prescale = prescale_for(frequency_hz)?;
        let old_mode = self.dev.read_reg(regs::MODE1)?;
        self.dev
            .write_reg(regs::MODE1, (old_mode & 0x7F) | regs::MODE1_SLEEP)?;
        self.dev.write_reg(regs::PRESCALE, prescale)?;
        self.dev.write_reg(regs::MODE1, old_mode)?;
        self.dev.delay_ms(OSCILLATOR_RESTART_MS);
        self.dev
            .write_reg(regs::MODE1, old_mode | regs::MODE1_RESTART_AI)?;
        self.frequency = 1.0 / ((prescale as f32 - 0.5) * 4096.0 / regs::OSCILLATOR_HZ);
        Ok(())
    }

    fn channel_reg(index: u8) -> Result<u8, PiicoDevError> {
        if index >= CHANNELS {
            return Err(PiicoDevError::InvalidParameter("el canal debe estar en 0..=15"));
        }
        Ok(regs::LED0_ON_L + 4 * index)
    }

    /// Instantes de encendido y apagado `(on, off)` del canal
    pub fn pwm(&mut self, index: u8) -> Result<(u16, u16), PiicoDevError> {
        let reg = Self::channel_reg(index)?;
        let mut buf = [0u8; 4];
        self.dev.read_regs(reg, &mut buf)?;
        Ok((
            u16::from_le_bytes([buf[0], buf[1]]),
            u16::from_le_bytes([buf[2], buf[3]]),
        ))
    }

    pub fn set_pwm(&mut self, index: u8, on: u16, off: u16) -> Result<(), PiicoDevError> {
        let reg = Self::channel_reg(index)?;
        let on = on.to_le_bytes();
        let off = off.to_le_bytes();
        self.dev.write_regs(reg, &[on[0], on[1], off[0], off[1]])
    }

    /// Ciclo de trabajo del canal (0..=4095)
    pub fn duty(&mut self, index: u8, invert: bool) -> Result<u16, PiicoDevError> {
        let value = match self.pwm(index)? {
            (0, regs::FULL) => 0,
            (regs::FULL, 0) => DUTY_MAX,
            (_, off) => off.min(DUTY_MAX),
        };
        Ok(if invert { DUTY_MAX - value } else { value })
    }

    /// Fija el ciclo de trabajo; 0 y 4095 usan los bits de apagado y encendido completos
    pub fn set_duty(&mut self, index: u8, value: u16, invert: bool) -> Result<(), PiicoDevError> {
        if value > DUTY_MAX {
            return Err(PiicoDevError::InvalidParameter("el ciclo de trabajo debe estar en 0..=4095"));
        }
        let value = if invert { DUTY_MAX - value } else { value };
        match value {
            0 => self.set_pwm(index, 0, regs::FULL),
            DUTY_MAX => self.set_pwm(index, regs::FULL, 0),
            v => self.set_pwm(index, 0, v),
        }
    }

    pub fn address(&self) -> u8 {
        self.dev.address()
    }

    pub fn release(self) -> (I, D) {
        self.dev.release()
    }
}

/// Temporización de un servo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoConfig {
    /// Frecuencia del controlador en Hz
    pub frequency: f32,
    pub min_us: f32,
    pub max_us: f32,
    /// Recorrido total en grados
    pub degrees: f32,
    /// Alternativa a `min_us`/`max_us`: punto medio y ancho del pulso
    pub midpoint_us: Option<f32>,
    pub range_us: Option<f32>,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            frequency: 50.0,
            min_us: 600.0,
            max_us: 2400.0,
            degrees: 180.0,
            midpoint_us: None,
            range_us: None,
        }
    }
}

/// Servo conectado a un canal del controlador
#[derive(Debug, Clone, PartialEq)]
pub struct Servo {
    channel: u8,
    min_duty: u16,
    max_duty: u16,
    degrees: f32,
    angle: Option<f32>,
    speed: Option<f32>,
}

impl Servo {
    /// `label` es el número serigrafiado en la placa (1..=4)
    pub fn new(label: u8, config: ServoConfig) -> Result<Self, PiicoDevError> {
        let channel = match label {
            4 => 0,
            3 => 1,
            2 => 2,
            1 => 3,
            _ => return Err(PiicoDevError::InvalidParameter("el canal debe ser 1, 2, 3 o 4")),
        };
        if !(config.frequency > 0.0) || !(config.degrees > 0.0) {
            return Err(PiicoDevError::InvalidParameter("frecuencia y recorrido deben ser positivos"));
        }
        let (min_us, max_us) = match (config.midpoint_us, config.range_us) {
            (Some(mid), Some(range)) => (mid - range / 2.0, mid + range / 2.0),
            _ => (config.min_us, config.max_us),
        };
        let period_us = 1_000_000.0 / config.frequency;
        let to_duty = |us: f32| (DUTY_MAX as f32 * us / period_us + 0.5) as u16;
        Ok(Self {
            channel,
            min_duty: to_duty(min_us),
            max_duty: to_duty(max_us),
            degrees: config.degrees,
            angle: None,
            speed: None,
        })
    }

    /// Canal del PCA9685
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Límites de ciclo de trabajo `(min, max)`
    pub fn duty_limits(&self) -> (u16, u16) {
        (self.min_duty, self.max_duty)
    }

    /// Último ángulo fijado, saturado al recorrido del servo
    pub fn angle(&self) -> Option<f32> {
        self.angle
    }

    pub fn set_angle<I, D, E>(
        &mut self,
        driver: &mut ServoDriver<I, D>,
        degrees: f32,
    ) -> Result<(), PiicoDevError>
    where
        I: Interface<Error = E>,
        D: DelayNs,
        PiicoDevError: From<E>,
    {
        let span = self.max_duty as f32 - self.min_duty as f32;
        let duty = (self.min_duty as f32 + span * degrees / self.degrees) as i32;
        let duty = duty.clamp(self.min_duty as i32, self.max_duty as i32) as u16;
        driver.set_duty(self.channel, duty, false)?;
        self.angle = Some(degrees.clamp(0.0, self.degrees));
        Ok(())
    }

    pub fn speed(&self) -> Option<f32> {
        self.speed
    }

    /// Velocidad de un servo de rotación continua (-1.0..=1.0)
    pub fn set_speed<I, D, E>(
        &mut self,
        driver: &mut ServoDriver<I, D>,
        speed: f32,
    ) -> Result<(), PiicoDevError>
    where
        I: Interface<Error = E>,
        D: DelayNs,
        PiicoDevError: From<E>,
    {
        let duty = remap(speed, -1.0, 1.0, self.min_duty as f32, self.max_duty as f32) + 0.5;
        driver.set_duty(self.channel, duty as u16, false)?;
        self.speed = Some(speed);
        Ok(())
    }

    /// Deja el servo sin pulso
    pub fn release<I, D, E>(&mut self, driver: &mut ServoDriver<I, D>) -> Result<(), PiicoDevError>
    where
        I: Interface<Error = E>,
        D: DelayNs,
        PiicoDevError: From<E>,
    {
        driver.set_duty(self.channel, 0, false)
    }
}
