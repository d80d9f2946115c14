//! Módulo de tres LEDs RGB
//!
//! Los colores se acumulan en un búfer local y se envían juntos con `show`.

use embedded_hal::delay::DelayNs;

use crate::device::{DeviceHandle, PiicoDevError};
use crate::interface::Interface;
use crate::register::rgb as regs;
use crate::types::{validate_i2c_address, Address};

pub const PIXELS: usize = 3;
const UPDATE_MS: u32 = 1;

pub type Colour = [u8; 3];

/// Color RGB a partir de tono, saturación y valor (todos en 0..=1)
pub fn wheel(hue: f32, saturation: f32, value: f32) -> Colour {
    let v = value * 255.0;
    if saturation == 0.0 {
        let v = v.round() as u8;
        return [v, v, v];
    }
    let i = (hue * 6.0) as i32;
    let f = hue * 6.0 - i as f32;
    let p = (255.0 * (value * (1.0 - saturation))) as u8;
    let q = (255.0 * (value * (1.0 - saturation * f))) as u8;
    let t = (255.0 * (value * (1.0 - saturation * (1.0 - f)))) as u8;
    let v = v.round() as u8;
    match i.rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RgbConfig {
    pub address: Address,
    pub brightness: u8,
}

impl Default for RgbConfig {
    fn default() -> Self {
        Self {
            address: Address::Literal(regs::BASE_ADDRESS),
            brightness: 50,
        }
    }
}

pub struct Rgb<I, D> {
    dev: DeviceHandle<I, D>,
    pixels: [Colour; PIXELS],
    brightness: u8,
}

impl<I, D, E> Rgb<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
    PiicoDevError: From<E>,
{
    /// Aplica el brillo y apaga los tres LEDs
    pub fn new(interface: I, delay: D, config: RgbConfig) -> Result<Self, PiicoDevError> {
        let address = config.address.resolve(regs::BASE_ADDRESS);
        let mut rgb = Self {
            dev: DeviceHandle::new(interface, delay, address),
            pixels: [[0; 3]; PIXELS],
            brightness: config.brightness,
        };
        rgb.set_brightness(config.brightness)?;
        rgb.show()?;
        Ok(rgb)
    }

    /// Cambia un LED en el búfer local
    pub fn set_pixel(&mut self, index: usize, colour: Colour) -> Result<(), PiicoDevError> {
        let pixel = self
            .pixels
            .get_mut(index)
            .ok_or(PiicoDevError::InvalidParameter("el LED debe estar en 0..=2"))?;
        *pixel = colour;
        Ok(())
    }

    pub fn pixel(&self, index: usize) -> Option<Colour> {
        self.pixels.get(index).copied()
    }

    /// Envía el búfer al módulo
    pub fn show(&mut self) -> Result<(), PiicoDevError> {
        let mut buffer = [0u8; PIXELS * 3];
        for (chunk, pixel) in buffer.chunks_exact_mut(3).zip(self.pixels.iter()) {
            chunk.copy_from_slice(pixel);
        }
        self.dev.write_regs(regs::LED_VALUES, &buffer)
    }

    /// Pone todos los LEDs del mismo color y los muestra
    pub fn fill(&mut self, colour: Colour) -> Result<(), PiicoDevError> {
        self.pixels = [colour; PIXELS];
        self.show()
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::BRIGHTNESS, brightness)?;
        self.dev.delay_ms(UPDATE_MS);
        self.brightness = brightness;
        Ok(())
    }

    /// Apaga los LEDs en el módulo y vacía el búfer
    pub fn clear(&mut self) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::CLEAR, 0x01)?;
        self.pixels = [[0; 3]; PIXELS];
        self.dev.delay_ms(UPDATE_MS);
        Ok(())
    }

    pub fn set_led(&mut self, on: bool) -> Result<(), PiicoDevError> {
        self.dev.write_reg(regs::CTRL, on as u8)?;
        self.dev.delay_ms(UPDATE_MS);
        Ok(())
    }

    /// Versión de firmware `(mayor, menor)`
    pub fn firmware(&mut self) -> Result<(u8, u8), PiicoDevError> {
        let mut v = [0u8; 2];
        self.dev.read_regs(regs::FIRM_VER, &mut v)?;
        Ok((v[1], v[0]))
    }

    pub fn device_id(&mut self) -> Result<u8, PiicoDevError> {
        self.dev.read_reg(regs::DEV_ID)
    }

    pub fn set_i2c_address(&mut self, new_address: u8) -> Result<(), PiicoDevError> {
        validate_i2c_address(new_address)?;
        self.dev.write_reg(regs::I2C_ADDRESS, new_address)?;
        self.dev.set_address(new_address)
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

    const ADDR: u8 = 0x08;

    fn init_expectations() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(ADDR, vec![0x06, 50]),
            I2cTransaction::write(ADDR, vec![0x07, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        ]
    }

    #[test]
    fn test_pixels_show_and_clear() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write(ADDR, vec![0x07, 255, 0, 0, 0, 0, 0, 0, 0, 255]),
            I2cTransaction::write(ADDR, vec![0x04, 0x01]),
            I2cTransaction::write(ADDR, vec![0x07, 1, 2, 3, 1, 2, 3, 1, 2, 3]),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut rgb = Rgb::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default()).unwrap();
        rgb.set_pixel(0, [255, 0, 0]).unwrap();
        rgb.set_pixel(2, [0, 0, 255]).unwrap();
        assert!(rgb.set_pixel(3, [1, 1, 1]).is_err());
        rgb.show().unwrap();
        rgb.clear().unwrap();
        assert_eq!(rgb.pixel(0), Some([0, 0, 0]));
        rgb.fill([1, 2, 3]).unwrap();
        i2c.done();
    }

    #[test]
    fn test_firmware_led_and_brightness() {
        let mut expectations = init_expectations();
        expectations.extend([
            I2cTransaction::write_read(ADDR, vec![0x01], vec![0x02, 0x01]),
            I2cTransaction::write_read(ADDR, vec![0x00], vec![0x84]),
            I2cTransaction::write(ADDR, vec![0x03, 0x00]),
            I2cTransaction::write(ADDR, vec![0x06, 255]),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut rgb = Rgb::new(UnifiedI2c::new(i2c.clone()), NoopDelay::new(), Default::default()).unwrap();
        assert_eq!(rgb.firmware().unwrap(), (1, 2));
        assert_eq!(rgb.device_id().unwrap(), 0x84);
        rgb.set_led(false).unwrap();
        rgb.set_brightness(255).unwrap();
        assert_eq!(rgb.brightness(), 255);
        i2c.done();
    }

    #[test]
    fn test_wheel() {
        assert_eq!(wheel(0.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(wheel(1.0 / 3.0, 1.0, 1.0), [0, 255, 0]);
        assert_eq!(wheel(0.5, 0.0, 1.0), [255, 255, 255]);
        assert_eq!(wheel(0.5, 1.0, 0.0), [0, 0, 0]);
    }
}
