use linux_embedded_hal::Delay;
use piicodev_rs::qmc6310::{Qmc6310, Qmc6310Config};
use piicodev_rs::{ReadingExt, UnifiedI2c};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

fn main() {
    println!("PiicoDev QMC6310 - Brújula");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\nDeteniendo el programa...");
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error al configurar el manejador de Ctrl+C");

    let i2c = match UnifiedI2c::open("/dev/i2c-1") {
        Ok(i2c) => i2c,
        Err(e) => {
            eprintln!("Error al abrir el bus I2C: {:?}", e);
            return;
        }
    };

    let mut compass = match Qmc6310::new(i2c, Delay {}, Qmc6310Config::default()) {
        Ok(compass) => compass,
        Err(e) => {
            eprintln!("Error al inicializar el magnetómetro: {:?}", e);
            return;
        }
    };

    if std::env::args().any(|a| a == "--calibrate") {
        println!("Gira el sensor lentamente en horizontal hasta completar la calibración");
        if let Err(e) = compass.calibrate() {
            eprintln!("Error al calibrar: {:?}", e);
            return;
        }
        println!("Calibración guardada en calibration.cal");
    }

    // Declinación magnética local (grados); 0 para el norte magnético
    compass.set_declination(0.0);

    while running.load(Ordering::SeqCst) {
        let polar = compass.read_polar().or_sentinel();
        if polar.heading.is_nan() {
            println!("Sin lectura");
        } else {
            println!(
                "Rumbo: {:6.1}°  Campo: {:6.1} µT ({:.3} G)",
                polar.heading, polar.micro_tesla, polar.gauss
            );
        }
        thread::sleep(Duration::from_millis(100));
    }
}
