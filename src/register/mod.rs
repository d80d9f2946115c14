//! Mapas de registros de los módulos PiicoDev
//!
//! Un submódulo por dispositivo con sus direcciones por defecto, registros y
//! bits de control, tal como aparecen en cada datasheet.

/// Bloque común de los módulos con firmware propio
pub mod module {
    /// Bit 7 del número de registro: el firmware acepta la escritura
    pub const WRITE_FLAG: u8 = 0x80;

    pub const WHOAMI: u8 = 0x01;
    pub const FIRM_MAJ: u8 = 0x02;
    pub const FIRM_MIN: u8 = 0x03;
    pub const I2C_ADDRESS: u8 = 0x04;
    pub const LED: u8 = 0x05;
}

/// Magnetómetro QMC6310
pub mod qmc6310 {
    pub const I2C_ADDRESS: u8 = 0x1C;

    pub const XOUT: u8 = 0x01;
    pub const YOUT: u8 = 0x03;
    pub const ZOUT: u8 = 0x05;
    pub const STATUS: u8 = 0x09;
    pub const CONTROL1: u8 = 0x0A;
    pub const CONTROL2: u8 = 0x0B;

    // Posición de los campos de 2 bits en CONTROL1
    pub const BIT_MODE: u8 = 0;
    pub const BIT_ODR: u8 = 2;
    pub const BIT_OSR1: u8 = 4;
    pub const BIT_OSR2: u8 = 6;
    // Campo de rango en CONTROL2
    pub const BIT_RANGE: u8 = 2;

    // Bits de STATUS
    pub const STATUS_READY: u8 = 0;
    pub const STATUS_OVERFLOW: u8 = 1;
}

/// Magnetómetro MMC5603
pub mod mmc5603 {
    pub const I2C_ADDRESS: u8 = 0x30;
    pub const PRODUCT_ID_VALUE: u8 = 0x10;

    /// Xout[19:12]; se leen 9 bytes desde aquí
    pub const XOUT0: u8 = 0x00;
    pub const TEMP: u8 = 0x09;
    pub const STATUS: u8 = 0x18;
    pub const ODR: u8 = 0x1A;
    pub const CTRL0: u8 = 0x1B;
    pub const CTRL1: u8 = 0x1C;
    pub const CTRL2: u8 = 0x1D;
    pub const PRODUCT_ID: u8 = 0x39;

    // CTRL0
    pub const TAKE_MEAS_M: u8 = 0x01;
    pub const TAKE_MEAS_T: u8 = 0x02;
    pub const AUTO_SR: u8 = 0x04;
    pub const DO_SET: u8 = 0x08;
    pub const DO_RESET: u8 = 0x10;
    pub const CMM_FREQ_EN: u8 = 0x80;
    // CTRL1
    pub const SW_RESET: u8 = 0x80;
    // CTRL2
    pub const CMM_EN: u8 = 0x10;
    // STATUS
    pub const MEAS_M_DONE: u8 = 0x40;
}

/// Sensor de presión MS5637 (interfaz por comandos)
pub mod ms5637 {
    pub const I2C_ADDRESS: u8 = 0x76;

    pub const SOFT_RESET: u8 = 0x1E;
    pub const START_PRESSURE_CONVERSION: u8 = 0x40;
    pub const START_TEMPERATURE_CONVERSION: u8 = 0x50;
    pub const CONVERSION_OSR_MASK: u8 = 0x0F;
    pub const ADC_READ: u8 = 0x00;
    /// Primera dirección de la PROM; los coeficientes están cada 2
    pub const PROM_ADDR_0: u8 = 0xA0;
    pub const PROM_WORDS: usize = 7;

    /// Tiempo de conversión (ms) por resolución OSR 256..8192
    pub const CONVERSION_TIME_MS: [u32; 6] = [1, 2, 3, 5, 9, 17];
    pub const RESET_TIME_MS: u32 = 15;
}

/// Reloj de tiempo real RV3028
pub mod rv3028 {
    pub const I2C_ADDRESS: u8 = 0x52;

    pub const SEC: u8 = 0x00;
    pub const MIN: u8 = 0x01;
    pub const HOUR: u8 = 0x02;
    pub const WEEKDAY: u8 = 0x03;
    pub const DAY: u8 = 0x04;
    pub const MONTH: u8 = 0x05;
    pub const YEAR: u8 = 0x06;
    pub const ALMIN: u8 = 0x07;
    pub const STATUS: u8 = 0x0E;
    pub const CTRL1: u8 = 0x0F;
    pub const CTRL2: u8 = 0x10;
    pub const ECTRL: u8 = 0x13;
    pub const SECTS: u8 = 0x15;
    pub const UNIX: u8 = 0x1B;
    pub const ID: u8 = 0x28;
    pub const EE_CLKOUT: u8 = 0x35;
    pub const EE_BACKUP: u8 = 0x37;

    // STATUS
    pub const STATUS_EVF: u8 = 1;
    pub const STATUS_AF: u8 = 2;
    // CTRL1
    pub const CTRL1_WADA: u8 = 5;
    // CTRL2
    pub const CTRL2_12_24: u8 = 1;
    pub const CTRL2_EIE: u8 = 2;
    pub const CTRL2_AIE: u8 = 3;
    pub const CTRL2_TSE: u8 = 7;
    // ECTRL
    pub const ECTRL_TSS: u8 = 0;
    pub const ECTRL_TSOW: u8 = 1;
    pub const ECTRL_TSR: u8 = 2;
    pub const ECTRL_EHL: u8 = 6;
    // EE_BACKUP
    pub const BACKUP_TCR: u8 = 0;
    pub const BACKUP_BSM: u8 = 2;
    pub const BACKUP_TCE: u8 = 5;
    pub const BACKUP_EEOFFSET: u8 = 7;
    // Bit PM en el registro de horas (modo 12 h)
    pub const HOUR_PM: u8 = 5;
    /// Bit "alarma deshabilitada" en los registros de alarma
    pub const ALARM_DISABLE: u8 = 7;
}

/// Acelerómetro LIS3DH
pub mod lis3dh {
    pub const I2C_ADDRESS: u8 = 0x19;
    pub const WHO_AM_I_VALUE: u8 = 0x33;

    /// Bit 7: autoincremento de dirección en lecturas/escrituras múltiples
    pub const AUTO_INCREMENT: u8 = 0x80;

    pub const WHO_AM_I: u8 = 0x0F;
    pub const CTRL_REG1: u8 = 0x20;
    pub const CTRL_REG2: u8 = 0x21;
    pub const CTRL_REG3: u8 = 0x22;
    pub const CTRL_REG4: u8 = 0x23;
    pub const CTRL_REG5: u8 = 0x24;
    pub const STATUS_REG: u8 = 0x27;
    pub const OUT_X_L: u8 = 0x28;
    pub const INT1_SRC: u8 = 0x31;
    pub const CLICK_CFG: u8 = 0x38;
    pub const CLICK_SRC: u8 = 0x39;
    pub const CLICK_THS: u8 = 0x3A;
    pub const TIME_LIMIT: u8 = 0x3B;
    pub const TIME_LATENCY: u8 = 0x3C;
    pub const TIME_WINDOW: u8 = 0x3D;

    /// Ejes X, Y, Z habilitados
    pub const CTRL1_XYZ_EN: u8 = 0x07;
    /// Block Data Update + alta resolución
    pub const CTRL4_BDU_HR: u8 = 0x88;
    pub const CTRL3_I1_CLICK: u8 = 7;
    pub const CTRL5_LIR_INT1: u8 = 0x08;
    pub const CLICK_SINGLE_XYZ: u8 = 0x15;
    pub const CLICK_DOUBLE_XYZ: u8 = 0x2A;
    pub const CLICK_SRC_IA: u8 = 0x40;
    pub const CLICK_THS_LIR: u8 = 0x80;
    pub const STATUS_ZYXDA: u8 = 3;
    pub const BIT_RANGE: u8 = 4;
}

/// IMU MPU-6050
pub mod mpu6050 {
    pub const I2C_ADDRESS: u8 = 0x68;

    pub const GYRO_CONFIG: u8 = 0x1B;
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const TEMP_OUT_H: u8 = 0x41;
    pub const GYRO_XOUT_H: u8 = 0x43;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const PWR_MGMT_2: u8 = 0x6C;
}

/// Sensor de luz ambiente VEML6030
pub mod veml6030 {
    pub const I2C_ADDRESS: u8 = 0x10;

    pub const ALS_CONF: u8 = 0x00;
    pub const ALS: u8 = 0x04;
    /// Ganancia 1x, integración 100 ms, persistencia 1, sin interrupción
    pub const DEFAULT_SETTINGS: u16 = 0x0000;
}

/// Sensor de color VEML6040
pub mod veml6040 {
    pub const I2C_ADDRESS: u8 = 0x10;

    pub const CONF: u8 = 0x00;
    pub const RED: u8 = 0x08;
    pub const GREEN: u8 = 0x09;
    pub const BLUE: u8 = 0x0A;
    pub const WHITE: u8 = 0x0B;

    /// Integración 40 ms, modo automático, habilitado
    pub const DEFAULT_SETTINGS: u8 = 0x00;
    pub const SHUTDOWN: u8 = 0x01;
    pub const STARTUP_MS: u32 = 50;
}

/// Sensor táctil capacitivo CAP1203
pub mod cap1203 {
    pub const I2C_ADDRESS: u8 = 0x28;
    pub const PRODUCT_ID_VALUE: u8 = 0x6D;

    pub const MAIN_CONTROL: u8 = 0x00;
    pub const GENERAL_STATUS: u8 = 0x02;
    pub const SENSOR_INPUT_STATUS: u8 = 0x03;
    pub const SENSOR_INPUT_1_DELTA_COUNT: u8 = 0x10;
    pub const SENSITIVITY_CONTROL: u8 = 0x1F;
    pub const CONFIG: u8 = 0x20;
    pub const INTERRUPT_ENABLE: u8 = 0x27;
    pub const REPEAT_RATE_ENABLE: u8 = 0x28;
    pub const MULTIPLE_TOUCH_CONFIG: u8 = 0x2A;
    pub const PRODUCT_ID: u8 = 0xFD;

    pub const SENSITIVITY_MASK: u8 = 0x70;
    pub const MULTI_TOUCH_BLOCK: u8 = 0x80;
}

/// Controlador PWM PCA9685 (módulo Servo Driver)
pub mod pca9685 {
    pub const I2C_ADDRESS: u8 = 0x44;

    pub const MODE1: u8 = 0x00;
    pub const LED0_ON_L: u8 = 0x06;
    pub const PRESCALE: u8 = 0xFE;

    pub const MODE1_SLEEP: u8 = 0x10;
    /// RESTART + AI + ALLCALL
    pub const MODE1_RESTART_AI: u8 = 0xA1;
    /// Bit "full on"/"full off" en los registros ON/OFF
    pub const FULL: u16 = 4096;
    pub const OSCILLATOR_HZ: f32 = 25_000_000.0;
    pub const PRESCALE_MIN: u8 = 3;
}

/// Zumbador (firmware antiguo, sin bit de escritura)
pub mod buzzer {
    pub const BASE_ADDRESS: u8 = 0x08;
    pub const DEVICE_ID: u8 = 0x51;

    pub const DEV_ID: u8 = 0x00;
    pub const FIRM_VER: u8 = 0x02;
    pub const I2C_ADDRESS: u8 = 0x04;
    pub const TONE: u8 = 0x05;
    pub const VOLUME: u8 = 0x06;
    pub const LED: u8 = 0x07;
}

/// Módulo de tres LEDs RGB (firmware antiguo)
pub mod rgb {
    pub const BASE_ADDRESS: u8 = 0x08;
    pub const DEVICE_ID: u8 = 0x84;

    pub const DEV_ID: u8 = 0x00;
    pub const FIRM_VER: u8 = 0x01;
    pub const CTRL: u8 = 0x03;
    pub const CLEAR: u8 = 0x04;
    pub const I2C_ADDRESS: u8 = 0x05;
    pub const BRIGHTNESS: u8 = 0x06;
    pub const LED_VALUES: u8 = 0x07;
}

/// Botón
pub mod switch {
    pub const BASE_ADDRESS: u8 = 0x42;
    pub const DEVICE_ID: u16 = 409;

    pub const IS_PRESSED: u8 = 0x11;
    pub const WAS_PRESSED: u8 = 0x12;
    pub const DOUBLE_PRESS_DETECTED: u8 = 0x13;
    pub const PRESS_COUNT: u8 = 0x14;
    pub const DOUBLE_PRESS_DURATION: u8 = 0x21;
    pub const EMA_PARAMETER: u8 = 0x22;
    pub const EMA_PERIOD: u8 = 0x23;
}

/// Potenciómetro rotativo y deslizante
pub mod potentiometer {
    pub const BASE_ADDRESS: u8 = 0x35;
    pub const DEVICE_ID_POT: u16 = 379;
    pub const DEVICE_ID_SLIDE: u16 = 411;

    pub const POT: u8 = 0x05;
    pub const LED: u8 = 0x07;
}

/// Telémetro ultrasónico
pub mod ultrasonic {
    pub const BASE_ADDRESS: u8 = 0x35;
    pub const DEVICE_ID: u16 = 578;

    pub const RAW: u8 = 0x05;
    pub const PERIOD: u8 = 0x06;
    pub const LED: u8 = 0x07;
    pub const STATUS: u8 = 0x08;
    pub const SELF_TEST: u8 = 0x09;
}

/// Transceptor de radio (puente I2C a RFM69)
pub mod transceiver {
    pub const BASE_ADDRESS: u8 = 0x1A;
    pub const DEVICE_ID: u16 = 495;

    pub const TX_POWER: u8 = 0x13;
    pub const RFM69_RADIO_STATE: u8 = 0x14;
    pub const RFM69_NODE_ID: u8 = 0x15;
    pub const RFM69_NETWORK_ID: u8 = 0x16;
    pub const RFM69_TO_NODE_ID: u8 = 0x17;
    pub const RFM69_REG: u8 = 0x18;
    pub const RFM69_VALUE: u8 = 0x19;
    pub const RFM69_RESET: u8 = 0x20;
    pub const PAYLOAD_LENGTH: u8 = 0x21;
    pub const PAYLOAD: u8 = 0x22;
    pub const PAYLOAD_NEW: u8 = 0x23;
    pub const PAYLOAD_GO: u8 = 0x24;
    pub const TRANSCEIVER_READY: u8 = 0x25;

    // Registros internos del RFM69
    pub const RFM69_BITRATE_MSB: u8 = 0x03;
    pub const RFM69_BITRATE_LSB: u8 = 0x04;
    pub const RFM69_FRF_MSB: u8 = 0x07;
    pub const RFM69_FRF_MID: u8 = 0x08;
    pub const RFM69_FRF_LSB: u8 = 0x09;

    /// Carga útil máxima por paquete de radio
    pub const MAXIMUM_PAYLOAD_LENGTH: usize = 61;
    /// Búfer I2C del microcontrolador del módulo
    pub const MAXIMUM_I2C_SIZE: usize = 32;
}
