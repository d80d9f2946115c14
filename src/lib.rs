//! Biblioteca Rust para los módulos I2C PiicoDev
//!
//! Cada módulo tiene su propio driver sobre el trait [`Interface`]. El bus se
//! crea fuera de la biblioteca y se presta a cada driver junto con un
//! proveedor de retardos `embedded_hal::delay::DelayNs`:
//!
//! ```ignore
//! let i2c = UnifiedI2c::open("/dev/i2c-1")?;
//! let mut sensor = Ms5637::new(i2c, Delay, Ms5637Config::default())?;
//! let pressure = sensor.read_pressure()?;
//! ```
//!
//! Los drivers devuelven `Result<T, PiicoDevError>`. Quien prefiera lecturas
//! con valor centinela (NaN) puede usar [`ReadingExt::or_sentinel`].

// Infraestructura común
pub mod base;
pub mod calibration;
pub mod config;
pub mod conversion;
pub mod device;
pub mod interface;
pub mod module;
pub mod register;
pub mod types;

// Drivers
pub mod buzzer;
pub mod cap1203;
pub mod lis3dh;
pub mod mmc5603;
pub mod mpu6050;
pub mod ms5637;
pub mod potentiometer;
pub mod qmc6310;
pub mod rgb;
pub mod rv3028;
pub mod servo;
pub mod switch;
pub mod transceiver;
pub mod ultrasonic;
pub mod veml6030;
pub mod veml6040;

// Re-exports públicos
pub use base::{ReadingExt, Sentinel};
pub use config::{CalibrationPaths, IdentityCheck};
pub use device::{DeviceHandle, PiicoDevError};
pub use interface::{Interface, InterfaceError, UnifiedI2c};
pub use types::{Address, Polar, Vector3};

pub use buzzer::{Buzzer, BuzzerConfig};
pub use cap1203::{Cap1203, Cap1203Config};
pub use lis3dh::{Lis3dh, Lis3dhConfig};
pub use mmc5603::{Mmc5603, Mmc5603Config};
pub use mpu6050::{Mpu6050, Mpu6050Config};
pub use ms5637::{Ms5637, Ms5637Config};
pub use potentiometer::{Potentiometer, PotentiometerConfig};
pub use qmc6310::{Qmc6310, Qmc6310Config};
pub use rgb::{Rgb, RgbConfig};
pub use rv3028::{Rv3028, Rv3028Config};
pub use servo::{Servo, ServoConfig, ServoDriver, ServoDriverConfig};
pub use switch::{Switch, SwitchConfig};
pub use transceiver::{Message, Transceiver, TransceiverConfig};
pub use ultrasonic::{Ultrasonic, UltrasonicConfig};
pub use veml6030::{Veml6030, Veml6030Config};
pub use veml6040::{Veml6040, Veml6040Config};
