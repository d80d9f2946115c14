//! Funciones de conversión entre bytes de registro y valores tipados
//!
//! Decodificación en complemento a dos, manipulación de campos de bits dentro
//! de un registro de control, BCD y reescalado lineal.

/// Interpreta los `bits` bajos de `value` como entero con signo en complemento a dos
///
/// # Arguments
/// * `value` - Valor sin signo leído del registro
/// * `bits` - Ancho del campo (8, 16, 24...)
///
/// # Returns
/// El valor con signo
#[inline]
pub fn twos_complement(value: u32, bits: u8) -> i32 {
    let value = value as i64 & ((1i64 << bits) - 1);
    if value > (1i64 << (bits - 1)) - 1 {
        (value - (1i64 << bits)) as i32
    } else {
        value as i32
    }
}

/// Decodifica un i16 big-endian
#[inline]
pub fn i16_from_be(bytes: [u8; 2]) -> i16 {
    twos_complement(u16::from_be_bytes(bytes) as u32, 16) as i16
}

/// Decodifica un i16 little-endian
#[inline]
pub fn i16_from_le(bytes: [u8; 2]) -> i16 {
    twos_complement(u16::from_le_bytes(bytes) as u32, 16) as i16
}

#[inline]
pub fn read_bit(x: u8, n: u8) -> bool {
    x & (1 << n) != 0
}

#[inline]
pub fn set_bit(x: u8, n: u8) -> u8 {
    x | (1 << n)
}

#[inline]
pub fn clear_bit(x: u8, n: u8) -> u8 {
    x & !(1 << n)
}

#[inline]
pub fn write_bit(x: u8, n: u8, b: bool) -> u8 {
    if b {
        set_bit(x, n)
    } else {
        clear_bit(x, n)
    }
}

/// Escribe un campo de `width` bits en la posición `offset` de `x`.
/// Los bits fuera de `[offset, offset + width)` no se modifican.
#[inline]
pub fn write_field(x: u8, offset: u8, width: u8, value: u8) -> u8 {
    let mask = (((1u16 << width) - 1) << offset) as u8;
    (x & !mask) | ((value << offset) & mask)
}

/// Campo de 2 bits
#[inline]
pub fn write_crumb(x: u8, offset: u8, value: u8) -> u8 {
    write_field(x, offset, 2, value)
}

/// Campo de 3 bits
#[inline]
pub fn write_tribit(x: u8, offset: u8, value: u8) -> u8 {
    write_field(x, offset, 3, value)
}

/// Sustituye los bits de `mask` por los de `value`
#[inline]
pub fn write_masked(x: u8, value: u8, mask: u8) -> u8 {
    (x & !mask) | (value & mask)
}

/// Decimal a BCD (0..=99)
#[inline]
pub fn bcd_encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// BCD a decimal
#[inline]
pub fn bcd_decode(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Reescala `value` de `[old_min, old_max]` a `[new_min, new_max]`, saturando en los extremos
pub fn remap(value: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    let lo = new_min.min(new_max);
    let hi = new_min.max(new_max);
    let mapped = (value - old_min) * (new_max - new_min) / (old_max - old_min) + new_min;
    mapped.clamp(lo, hi)
}

/// Normaliza un ángulo en grados al intervalo [0, 360)
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Rumbo en grados [0, 360) a partir de `atan2(y, x)` más la declinación magnética
pub fn heading_degrees(y: f32, x: f32, declination: f32) -> f32 {
    wrap_degrees(y.atan2(x).to_degrees() + declination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twos_complement_16() {
        assert_eq!(twos_complement(0x7FFF, 16), 32767);
        assert_eq!(twos_complement(0x8000, 16), -32768);
        assert_eq!(twos_complement(0xFFFF, 16), -1);
        assert_eq!(twos_complement(0x0000, 16), 0);
    }

    #[test]
    fn test_twos_complement_8() {
        assert_eq!(twos_complement(0x7F, 8), 127);
        assert_eq!(twos_complement(0x80, 8), -128);
        assert_eq!(twos_complement(0xFE, 8), -2);
    }

    #[test]
    fn test_endianness() {
        assert_eq!(i16_from_be([0x80, 0x00]), -32768);
        assert_eq!(i16_from_le([0x00, 0x80]), -32768);
        assert_eq!(i16_from_le([0xFF, 0x7F]), 32767);
    }

    #[test]
    fn test_write_field_preserves_unrelated_bits() {
        assert_eq!(write_crumb(0b1100_0011, 4, 0b10), 0b1010_0011);
        assert_eq!(write_field(0b1100_0011, 4, 2, 0b10), 0b1010_0011);
        // el valor se recorta al ancho del campo
        assert_eq!(write_crumb(0x00, 2, 0b111), 0b0000_1100);
        assert_eq!(write_tribit(0xFF, 1, 0b000), 0b1111_0001);
    }

    #[test]
    fn test_bits() {
        assert!(read_bit(0b0000_1000, 3));
        assert_eq!(write_bit(0, 7, true), 0x80);
        assert_eq!(write_bit(0xFF, 0, false), 0xFE);
        assert_eq!(write_masked(0b1010_1010, 0b0101_0000, 0x70), 0b1101_1010);
    }

    #[test]
    fn test_bcd() {
        assert_eq!(bcd_encode(59), 0x59);
        assert_eq!(bcd_decode(0x23), 23);
        for v in 0..100u8 {
            assert_eq!(bcd_decode(bcd_encode(v)), v);
        }
    }

    #[test]
    fn test_remap_saturates() {
        assert_eq!(remap(0.0, -1.0, 1.0, 1000.0, 2000.0), 1500.0);
        assert_eq!(remap(5.0, -1.0, 1.0, 1000.0, 2000.0), 2000.0);
        assert_eq!(remap(-5.0, -1.0, 1.0, 1000.0, 2000.0), 1000.0);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(45.0), 45.0);
    }

    #[test]
    fn test_heading() {
        assert!((heading_degrees(1.0, 0.0, 0.0) - 90.0).abs() < 1e-4);
        assert!((heading_degrees(-1.0, 0.0, 0.0) - 270.0).abs() < 1e-4);
        assert!((heading_degrees(0.0, 1.0, 10.0) - 10.0).abs() < 1e-4);
        assert!((heading_degrees(0.0, 1.0, -10.0) - 350.0).abs() < 1e-4);
    }
}
