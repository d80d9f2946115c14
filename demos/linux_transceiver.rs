use linux_embedded_hal::Delay;
use piicodev_rs::transceiver::{Message, Transceiver, TransceiverConfig};
use piicodev_rs::UnifiedI2c;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};

fn main() {
    println!("PiicoDev Transceiver - Emisor y receptor");

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

    let config = TransceiverConfig {
        radio_address: 1,
        ..Default::default()
    };
    let mut radio = match Transceiver::new(i2c, Delay {}, config) {
        Ok(radio) => radio,
        Err(e) => {
            eprintln!("Error al inicializar el transceptor: {:?}", e);
            return;
        }
    };

    let mut counter = 0i32;
    let mut last_send = Instant::now();
    while running.load(Ordering::SeqCst) {
        if last_send.elapsed() >= Duration::from_secs(2) {
            let message = Message::Int {
                key: "contador".into(),
                value: counter,
            };
            match radio.send(&message, 0) {
                Ok(()) => println!("Enviado: contador = {}", counter),
                Err(e) => eprintln!("Error al enviar: {:?}", e),
            }
            counter = counter.wrapping_add(1);
            last_send = Instant::now();
        }

        match radio.receive() {
            Ok(Some(packet)) => println!(
                "Recibido de {} ({} dBm): {:?}",
                packet.source_radio_address, packet.rssi, packet.payload
            ),
            Ok(None) => {}
            Err(e) => eprintln!("Error al recibir: {:?}", e),
        }
        thread::sleep(Duration::from_millis(50));
    }
}
