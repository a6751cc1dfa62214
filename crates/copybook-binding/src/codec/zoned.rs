//! Zoned Decimal (DISPLAY) encoding and decoding.
//!
//! One digit per byte with the zone nibble in the high position. The
//! sign is overpunched in the zone of the rightmost byte: 0xC positive,
//! 0xD negative, 0xF unsigned.
//!
//! Example: +12345 in PIC S9(5)
//! - Binary: 0xF1 0xF2 0xF3 0xF4 0xC5 (5 bytes)

use rust_decimal::Decimal;

use super::{checked_units, Sign};
use crate::error::BindingError;
use crate::meta::FieldMeta;
use crate::Result;

/// Storage size in bytes for a zoned field of the given digit count.
pub fn zoned_len(total_digits: u16) -> usize {
    total_digits as usize
}

/// Encode a value into a zoned decimal field slice.
///
/// # Errors
/// Fails when the value needs more digits than the field declares, is
/// negative in an unsigned field, or the slice length is wrong.
pub fn encode_zoned(value: &Decimal, meta: &FieldMeta, target: &mut [u8]) -> Result<()> {
    let expected = zoned_len(meta.total_digits);
    if target.len() != expected {
        return Err(BindingError::Conversion {
            message: format!(
                "Zoned field {} needs {} bytes, got a {} byte slice",
                meta.cobol_name,
                expected,
                target.len()
            ),
        });
    }

    let units = checked_units(value, meta)?;
    let sign_zone = match Sign::for_value(units < 0, meta.signed) {
        Sign::Positive => 0xC0,
        Sign::Negative => 0xD0,
        Sign::Unsigned => 0xF0,
    };

    let mut magnitude = units.unsigned_abs();
    let last = target.len() - 1;
    for i in (0..target.len()).rev() {
        let digit = (magnitude % 10) as u8;
        magnitude /= 10;
        let zone = if i == last { sign_zone } else { 0xF0 };
        target[i] = zone | digit;
    }
    Ok(())
}

/// Decode a zoned decimal field slice.
///
/// The sign comes from the zone of the last byte; unrecognized zones
/// are treated as unsigned, which is how host programs leave unpunched
/// DISPLAY data.
///
/// # Errors
/// Fails on an empty slice or a non-digit low nibble.
pub fn decode_zoned(bytes: &[u8], meta: &FieldMeta) -> Result<Decimal> {
    if bytes.is_empty() {
        return Err(BindingError::Conversion {
            message: format!("Empty zoned field {}", meta.cobol_name),
        });
    }

    let mut magnitude: u128 = 0;
    for &byte in bytes {
        let digit = byte & 0x0F;
        if digit > 9 {
            return Err(BindingError::Conversion {
                message: format!(
                    "Invalid digit 0x{:X} in zoned field {}",
                    digit, meta.cobol_name
                ),
            });
        }
        magnitude = magnitude * 10 + digit as u128;
    }

    let zone = (bytes[bytes.len() - 1] >> 4) & 0x0F;
    let negative = matches!(zone, 0x0D | 0x0B);
    let mut units = magnitude as i128;
    if negative {
        units = -units;
    }
    Ok(Decimal::from_i128_with_scale(
        units,
        meta.fraction_digits as u32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::numeric_meta;
    use crate::meta::CobolType;
    use std::str::FromStr;

    fn meta(digits: u16, fraction: u16, signed: bool) -> FieldMeta {
        numeric_meta(CobolType::ZonedDecimalItem, digits, fraction, signed)
    }

    #[test]
    fn test_encode_positive() {
        let mut buf = [0u8; 5];
        encode_zoned(&Decimal::from(12345), &meta(5, 0, true), &mut buf).unwrap();
        assert_eq!(buf, [0xF1, 0xF2, 0xF3, 0xF4, 0xC5]);
    }

    #[test]
    fn test_encode_negative() {
        let mut buf = [0u8; 5];
        encode_zoned(&Decimal::from(-12345), &meta(5, 0, true), &mut buf).unwrap();
        assert_eq!(buf, [0xF1, 0xF2, 0xF3, 0xF4, 0xD5]);
    }

    #[test]
    fn test_encode_unsigned() {
        let mut buf = [0u8; 5];
        encode_zoned(&Decimal::from(12345), &meta(5, 0, false), &mut buf).unwrap();
        assert_eq!(buf, [0xF1, 0xF2, 0xF3, 0xF4, 0xF5]);
    }

    #[test]
    fn test_encode_pads_leading_zeros() {
        let mut buf = [0u8; 5];
        encode_zoned(&Decimal::from(42), &meta(5, 0, false), &mut buf).unwrap();
        assert_eq!(buf, [0xF0, 0xF0, 0xF0, 0xF4, 0xF2]);
    }

    #[test]
    fn test_encode_overflow() {
        let mut buf = [0u8; 3];
        let err = encode_zoned(&Decimal::from(1000), &meta(3, 0, true), &mut buf).unwrap_err();
        assert!(matches!(err, BindingError::FieldOverflow { .. }));
    }

    #[test]
    fn test_decode_positive() {
        let value = decode_zoned(&[0xF1, 0xF2, 0xF3, 0xF4, 0xC5], &meta(5, 0, true)).unwrap();
        assert_eq!(value, Decimal::from(12345));
    }

    #[test]
    fn test_decode_negative() {
        let value = decode_zoned(&[0xF1, 0xF2, 0xF3, 0xF4, 0xD5], &meta(5, 0, true)).unwrap();
        assert_eq!(value, Decimal::from(-12345));
    }

    #[test]
    fn test_decode_with_decimals() {
        let value = decode_zoned(&[0xF1, 0xF2, 0xF3, 0xF4, 0xC5], &meta(5, 2, true)).unwrap();
        assert_eq!(value, Decimal::from_str("123.45").unwrap());
    }

    #[test]
    fn test_decode_invalid_digit() {
        assert!(decode_zoned(&[0xF1, 0xFA], &meta(2, 0, true)).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let value = Decimal::from_str("-9876.54").unwrap();
        let m = meta(6, 2, true);
        let mut buf = [0u8; 6];
        encode_zoned(&value, &m, &mut buf).unwrap();
        assert_eq!(decode_zoned(&buf, &m).unwrap(), value);
    }
}
