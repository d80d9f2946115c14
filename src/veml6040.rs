//! Sensor de color VEML6040 (RGBW)
//!
//! Además de los cuatro canales calcula la iluminancia a partir del canal
//! verde, la temperatura de color correlacionada (fórmula de McCamy) y una
//! conversión a HSV para clasificar el tono.

use embedded_hal::delay::DelayNs;

use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::veml6040 as regs;
use crate::types::Address;

/// Sensibilidad del canal verde con integración de 40 ms (lx por LSB)
pub const GREEN_SENSITIVITY: f32 = 0.25168;

/// Tonos de referencia por defecto (grados)
pub const DEFAULT_HUES: [(&str, f32); 6] = [
    ("red", 0.0),
    ("yellow", 60.0),
    ("green", 120.0),
    ("cyan", 180.0),
    ("blue", 240.0),
    ("magenta", 300.0),
];

/// Lectura completa del sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColourReading {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub white: u16,
    /// Iluminancia en lux
    pub als: f32,
    /// Temperatura de color en K; NaN si no hay luz suficiente para calcularla
    pub cct: f32,
}

/// Color en HSV: tono en grados, saturación y valor en 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

/// Temperatura de color correlacionada a partir de los canales RGB
pub fn correlated_colour_temperature(red: u16, green: u16, blue: u16) -> f32 {
    let (r, g, b) = (red as f32, green as f32, blue as f32);
    let x = -0.023249 * r + 0.291014 * g - 0.364880 * b;
    let y = -0.042799 * r + 0.272148 * g - 0.279591 * b;
    let z = -0.155901 * r + 0.251534 * g - 0.076240 * b;
    let total = x + y + z;
    if total == 0.0 {
        return f32::NAN;
    }
    let cx = x / total;
    let cy = y / total;
    let n = (cx - 0.3320) / (0.1858 - cy);
    449.0 * n.powi(3) + 3525.0 * n.powi(2) + 6823.3 * n + 5520.33
}

/// Conversión de cuentas de 16 bits a HSV. Con varios canales empatados en
/// el máximo prevalece azul, después verde.
pub fn rgb_to_hsv(red: u16, green: u16, blue: u16) -> Hsv {
    let r = red as f32 / 65535.0;
    let g = green as f32 / 65535.0;
    let b = blue as f32 / 65535.0;
    let high = r.max(g).max(b);
    let low = r.min(g).min(b);
    let d = high - low;
    let saturation = if high == 0.0 { 0.0 } else { d / high };
    let hue = if d == 0.0 {
        0.0
    } else if b == high {
        (r - g) / d + 4.0
    } else if g == high {
        (b - r) / d + 2.0
    } else {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    };
    Hsv {
        hue: hue / 6.0 * 360.0,
        saturation,
        value: high,
    }
}

/// Nombre del tono de referencia más cercano, teniendo en cuenta que el tono
/// es circular. `None` si el brillo no supera `min_brightness`.
pub fn classify_hue<'a>(hsv: &Hsv, hues: &[(&'a str, f32)], min_brightness: f32) -> Option<&'a str> {
    if hsv.value <= min_brightness {
        return None;
    }
    let distance = |reference: f32| {
        let d = (hsv.hue - reference).abs();
        d.min(360.0 - d)
    };
    let mut best: Option<(&str, f32)> = None;
    for &(name, reference) in hues {
        let d = distance(reference);
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((name, d));
        }
    }
    best.map(|(name, _)| name)
}

#[derive(Debug, Clone, Copy)]
pub struct Veml6040Config {
    pub address: Address,
}

impl Default for Veml6040Config {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::I2C_ADDRESS),
        }
    }
}

pub struct Veml6040<I, D> {
    dev: DeviceHandle<I, D>,
}

impl<I, D, E> Veml6040<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    /// Apaga y vuelve a encender el sensor con la configuración por defecto
    pub fn new(interface: I, delay: D, config: Veml6040Config) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::I2C_ADDRESS);
        let mut sensor = Self {
            dev: DeviceHandle::new(interface, delay, address),
        };
        sensor.dev.write_reg(regs::CONF, regs::SHUTDOWN)?;
        sensor.dev.write_reg(regs::CONF, regs::DEFAULT_SETTINGS)?;
        sensor.dev.delay_ms(regs::STARTUP_MS);
        Ok(sensor)
    }

    pub fn read_rgb(&mut self) -> Result<ColourReading, PiicoDevError> {
        let red = self.dev.read_u16_le(regs::RED)?;
        let green = self.dev.read_u16_le(regs::GREEN)?;
        let blue = self.dev.read_u16_le(regs::BLUE)?;
        let white = self.dev.read_u16_le(regs::WHITE)?;
        Ok(ColourReading {
            red,
            green,
            blue,
            white,
            als: green as f32 * GREEN_SENSITIVITY,
            cct: correlated_colour_temperature(red, green, blue),
        })
    }

    pub fn read_hsv(&mut self) -> Result<Hsv, PiicoDevError> {
        let c = self.read_rgb()?;
        Ok(rgb_to_hsv(c.red, c.green, c.blue))
    }

    /// Clasifica el color leído con los tonos por defecto
    pub fn classify_hue(&mut self, min_brightness: f32) -> Result<Option<&'static str>, PiicoDevError> {
        self.classify_hue_with(&DEFAULT_HUES, min_brightness)
    }

    pub fn classify_hue_with<'a>(
        &mut self,
        hues: &[(&'a str, f32)],
        min_brightness: f32,
    ) -> Result<Option<&'a str>, PiicoDevError> {
        let hsv = self.read_hsv()?;
        Ok(classify_hue(&hsv, hues, min_brightness))
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
    use crate::interface::UnifiedI2c;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x10;

    fn channel_reads(r: u16, g: u16, b: u16, w: u16) -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write_read(ADDR, vec![0x08], r.to_le_bytes().to_vec()),
            I2cTransaction::write_read(ADDR, vec![0x09], g.to_le_bytes().to_vec()),
            I2cTransaction::write_read(ADDR, vec![0x0A], b.to_le_bytes().to_vec()),
            I2cTransaction::write_read(ADDR, vec![0x0B], w.to_le_bytes().to_vec()),
        ]
    }

    #[test]
    fn test_read_rgb() {
        let mut expectations = vec![
            I2cTransaction::write(ADDR, vec![0x00, 0x01]),
            I2cTransaction::write(ADDR, vec![0x00, 0x00]),
        ];
        expectations.extend(channel_reads(1000, 2000, 500, 3000));
        expectations.extend(channel_reads(1000, 2000, 500, 3000));
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor =
            Veml6040::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default())
                .unwrap();
        let c = sensor.read_rgb().unwrap();
        assert_eq!((c.red, c.green, c.blue, c.white), (1000, 2000, 500, 3000));
        assert!((c.als - 503.36).abs() < 1e-2);
        assert!((c.cct - 4450.22).abs() < 0.5);
        assert_eq!(sensor.classify_hue(0.0).unwrap(), Some("green"));
        i2c.done();
    }

    #[test]
    fn test_cct_dark_is_nan() {
        assert!(correlated_colour_temperature(0, 0, 0).is_nan());
    }

    #[test]
    fn test_hsv() {
        let hsv = rgb_to_hsv(1000, 2000, 500);
        assert!((hsv.hue - 100.0).abs() < 1e-3);
        assert!((hsv.saturation - 0.75).abs() < 1e-5);

        let red = rgb_to_hsv(65535, 0, 0);
        assert_eq!(red.hue, 0.0);
        assert_eq!(red.value, 1.0);

        // empate entre rojo y azul: prevalece azul
        let magenta = rgb_to_hsv(65535, 0, 65535);
        assert!((magenta.hue - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_classify_wraps_around() {
        let hsv = Hsv {
            hue: 350.0,
            saturation: 1.0,
            value: 0.5,
        };
        assert_eq!(classify_hue(&hsv, &DEFAULT_HUES, 0.0), Some("red"));
        assert_eq!(classify_hue(&hsv, &DEFAULT_HUES, 0.5), None);
        // equidistante de rojo y amarillo: gana el primero
        let orange = Hsv { hue: 30.0, ..hsv };
        assert_eq!(classify_hue(&orange, &DEFAULT_HUES, 0.0), Some("red"));
    }
}
