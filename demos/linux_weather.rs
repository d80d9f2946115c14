use linux_embedded_hal::Delay;
use piicodev_rs::ms5637::{Ms5637, Ms5637Config};
use piicodev_rs::veml6030::{Veml6030, Veml6030Config};
use piicodev_rs::{ReadingExt, UnifiedI2c};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

const BUS: &str = "/dev/i2c-1";
const SEA_LEVEL_HPA: f32 = 1013.25;

fn main() {
    println!("PiicoDev - Estación meteorológica (MS5637 + VEML6030)");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\nDeteniendo el programa...");
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error al configurar el manejador de Ctrl+C");

    // Cada driver abre su propio descriptor del mismo bus
    let (bus_a, bus_b) = match (UnifiedI2c::open(BUS), UnifiedI2c::open(BUS)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error al abrir el bus I2C: {:?}", e);
            return;
        }
    };

    let mut barometer = match Ms5637::new(bus_a, Delay {}, Ms5637Config::default()) {
        Ok(sensor) => sensor,
        Err(e) => {
            eprintln!("Error al inicializar el MS5637: {:?}", e);
            return;
        }
    };
    let mut light = match Veml6030::new(bus_b, Delay {}, Veml6030Config::default()) {
        Ok(sensor) => sensor,
        Err(e) => {
            eprintln!("Error al inicializar el VEML6030: {:?}", e);
            return;
        }
    };

    while running.load(Ordering::SeqCst) {
        let (temperature, pressure) = barometer.read_temperature_and_pressure().or_sentinel();
        let altitude = barometer.read_altitude(SEA_LEVEL_HPA).or_sentinel();
        let lux = light.read().or_sentinel();
        println!(
            "T: {:5.2} °C  P: {:7.2} hPa  Alt: {:6.1} m  Luz: {:8.2} lx",
            temperature, pressure, altitude, lux
        );
        thread::sleep(Duration::from_secs(1));
    }
}
