//! Sensor de presión barométrica y temperatura MS5637
//!
//! La compensación de segundo orden se hace en aritmética entera con los
//! desplazamientos exactos del datasheet; cualquier paso en coma flotante
//! cambiaría las últimas cifras respecto a los valores de referencia.

use embedded_hal::delay::DelayNs;

use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::ms5637 as regs;
use crate::types::Address;

/// Presión estándar a nivel del mar (hPa)
pub const SEA_LEVEL_HPA: f32 = 1013.25;

// Índices de los coeficientes en la PROM
const PRESSURE_SENSITIVITY: usize = 1;
const PRESSURE_OFFSET: usize = 2;
const TEMP_COEFF_OF_PRESSURE_SENSITIVITY: usize = 3;
const TEMP_COEFF_OF_PRESSURE_OFFSET: usize = 4;
const REFERENCE_TEMPERATURE: usize = 5;
const TEMP_COEFF_OF_TEMPERATURE: usize = 6;

/// Sobremuestreo del ADC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Resolution {
    Osr256 = 0,
    Osr512 = 1,
    Osr1024 = 2,
    Osr2048 = 3,
    Osr4096 = 4,
    #[default]
    Osr8192 = 5,
}

impl Resolution {
    pub fn temperature_command(self) -> u8 {
        regs::START_TEMPERATURE_CONVERSION | (self as u8 * 2)
    }

    pub fn pressure_command(self) -> u8 {
        regs::START_PRESSURE_CONVERSION | (self as u8 * 2)
    }

    /// Tiempo de conversión (ms)
    pub fn conversion_time_ms(self) -> u32 {
        regs::CONVERSION_TIME_MS[self as usize]
    }
}

/// Resultado de la compensación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compensated {
    /// Temperatura en centésimas de grado
    pub temperature: i64,
    /// Presión en centésimas de hPa (Pa)
    pub pressure: i64,
}

impl Compensated {
    pub fn temperature_c(&self) -> f32 {
        self.temperature as f32 / 100.0
    }

    pub fn pressure_hpa(&self) -> f32 {
        self.pressure as f32 / 100.0
    }
}

/// Compensación de segundo orden del datasheet
///
/// # Arguments
/// * `prom` - Coeficientes C0..C6 leídos de la PROM
/// * `d1` - Palabra ADC de presión
/// * `d2` - Palabra ADC de temperatura
pub fn compensate(prom: &[u16; 7], d1: u32, d2: u32) -> Compensated {
    let c = |i: usize| prom[i] as i64;
    let d1 = d1 as i64;
    let d2 = d2 as i64;

    // Diferencia entre la temperatura real y la de referencia
    let dt = d2 - c(REFERENCE_TEMPERATURE) * 0x100;
    let temp = 2000 + ((dt * c(TEMP_COEFF_OF_TEMPERATURE)) >> 23);

    let (t2, off2, sens2) = if temp < 2000 {
        let low = (temp - 2000) * (temp - 2000);
        let mut off2 = 61 * low / 16;
        let mut sens2 = 29 * low / 16;
        if temp < -1500 {
            let very_low = (temp + 1500) * (temp + 1500);
            off2 += 17 * very_low;
            sens2 += 9 * very_low;
        }
        ((3 * (dt * dt)) >> 33, off2, sens2)
    } else {
        ((5 * (dt * dt)) >> 38, 0, 0)
    };

    let off = (c(PRESSURE_OFFSET) << 17) + ((c(TEMP_COEFF_OF_PRESSURE_OFFSET) * dt) >> 6) - off2;
    let sens = c(PRESSURE_SENSITIVITY) * 0x10000
        + ((c(TEMP_COEFF_OF_PRESSURE_SENSITIVITY) * dt) >> 7)
        - sens2;
    let p = (((d1 * sens) >> 21) - off) >> 15;

    Compensated {
        temperature: temp - t2,
        pressure: p,
    }
}

/// Altitud barométrica (m) para una presión y una presión de referencia a nivel del mar
pub fn altitude(pressure_hpa: f32, sea_level_hpa: f32) -> f32 {
    44330.0 * (1.0 - (pressure_hpa / sea_level_hpa).powf(1.0 / 5.255))
}

/// Configuración del MS5637
#[derive(Debug, Clone, Copy)]
pub struct Ms5637Config {
    pub address: Address,
    pub resolution: Resolution,
}

impl Default for Ms5637Config {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::I2C_ADDRESS),
            resolution: Resolution::default(),
        }
    }
}

pub struct Ms5637<I, D> {
    dev: DeviceHandle<I, D>,
    prom: Option<[u16; 7]>,
    resolution: Resolution,
}

impl<I, D, E> Ms5637<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    /// Crea el driver y hace un reset software del sensor
    pub fn new(interface: I, delay: D, config: Ms5637Config) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::I2C_ADDRESS);
        let mut sensor = Self {
            dev: DeviceHandle::new(interface, delay, address),
            prom: None,
            resolution: config.resolution,
        };
        sensor.reset()?;
        Ok(sensor)
    }

    pub fn reset(&mut self) -> Result<(), PiicoDevError> {
        self.dev.write_command(regs::SOFT_RESET)?;
        self.dev.delay_ms(regs::RESET_TIME_MS);
        self.prom = None;
        Ok(())
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    /// Lee los siete coeficientes de la PROM
    pub fn read_prom(&mut self) -> Result<[u16; 7], PiicoDevError> {
        let mut prom = [0u16; regs::PROM_WORDS];
        for (i, coeff) in prom.iter_mut().enumerate() {
            *coeff = self.dev.read_u16_be(regs::PROM_ADDR_0 + 2 * i as u8)?;
        }
        self.prom = Some(prom);
        Ok(prom)
    }

    fn coefficients(&mut self) -> Result<[u16; 7], PiicoDevError> {
        match self.prom {
            Some(prom) => Ok(prom),
            None => self.read_prom(),
        }
    }

    /// Lanza una conversión y lee el resultado de 24 bits
    fn conversion_read_adc(&mut self, cmd: u8, time_ms: u32) -> Result<u32, PiicoDevError> {
        self.dev.write_command(cmd)?;
        self.dev.delay_ms(time_ms);
        let mut data = [0u8; 3];
        self.dev.read_regs(regs::ADC_READ, &mut data)?;
        Ok(u32::from_be_bytes([0, data[0], data[1], data[2]]))
    }

    /// Temperatura y presión compensadas
    pub fn read_compensated(&mut self) -> Result<Compensated, PiicoDevError> {
        let prom = self.coefficients()?;
        let res = self.resolution;
        let d2 = self.conversion_read_adc(res.temperature_command(), res.conversion_time_ms())?;
        let d1 = self.conversion_read_adc(res.pressure_command(), res.conversion_time_ms())?;
        Ok(compensate(&prom, d1, d2))
    }

    /// Devuelve `(temperatura °C, presión hPa)`
    pub fn read_temperature_and_pressure(&mut self) -> Result<(f32, f32), PiicoDevError> {
        let c = self.read_compensated()?;
        Ok((c.temperature_c(), c.pressure_hpa()))
    }

    /// Presión en hPa
    pub fn read_pressure(&mut self) -> Result<f32, PiicoDevError> {
        Ok(self.read_compensated()?.pressure_hpa())
    }

    /// Altitud en metros respecto a `sea_level_hpa`
    pub fn read_altitude(&mut self, sea_level_hpa: f32) -> Result<f32, PiicoDevError> {
        if sea_level_hpa <= 0.0 {
            return Err(PiicoDevError::InvalidParameter("presión a nivel del mar debe ser positiva"));
        }
        Ok(altitude(self.read_pressure()?, sea_level_hpa))
    }

    pub fn address(&self) -> u8 {
        self.dev.address()
    }

    pub fn release(self) -> (I, D) {
        self.dev.release()
    }
}
