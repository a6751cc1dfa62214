//! Packed Decimal (COMP-3) encoding and decoding.
//!
//! Two decimal digits per byte with the sign in the rightmost nibble.
//! For a PIC S9(n) COMP-3 item the storage is ceil((n + 1) / 2) bytes;
//! even digit counts gain a leading zero nibble.
//!
//! Example: +12345 in PIC S9(5) COMP-3
//! - Layout: d1|d2 d3|d4 d5|sign
//! - Binary: 0x12 0x34 0x5C (3 bytes)

use rust_decimal::Decimal;

use super::{checked_units, Sign};
use crate::error::BindingError;
use crate::meta::FieldMeta;
use crate::Result;

/// Storage size in bytes for a packed field of the given digit count.
pub fn packed_len(total_digits: u16) -> usize {
    (total_digits as usize + 2) / 2
}

/// Encode a value into a packed decimal field slice.
///
/// The target slice must be exactly [`packed_len`] bytes; digits are
/// right-justified with leading zeros and the sign nibble is written
/// last (0xF for unsigned fields).
///
/// # Errors
/// Fails when the value needs more digits than the field declares, is
/// negative in an unsigned field, or the slice length is wrong.
pub fn encode_packed(value: &Decimal, meta: &FieldMeta, target: &mut [u8]) -> Result<()> {
    let expected = packed_len(meta.total_digits);
    if target.len() != expected {
        return Err(BindingError::Conversion {
            message: format!(
                "Packed field {} needs {} bytes, got a {} byte slice",
                meta.cobol_name,
                expected,
                target.len()
            ),
        });
    }

    let units = checked_units(value, meta)?;
    let sign = Sign::for_value(units < 0, meta.signed).packed_nibble();

    // Digit nibbles available ahead of the sign nibble.
    let capacity = target.len() * 2 - 1;
    let mut digits = [0u8; 19];
    let mut magnitude = units.unsigned_abs();
    for slot in digits[..capacity].iter_mut().rev() {
        *slot = (magnitude % 10) as u8;
        magnitude /= 10;
    }

    for (i, byte) in target.iter_mut().enumerate() {
        let high = digits[2 * i];
        let low = if 2 * i + 1 < capacity {
            digits[2 * i + 1]
        } else {
            sign
        };
        *byte = (high << 4) | low;
    }
    Ok(())
}

/// Decode a packed decimal field slice.
///
/// The sign is taken from the data, so a field declared unsigned still
/// decodes a 0xD nibble as negative.
///
/// # Errors
/// Fails on an empty slice, a non-digit nibble in a digit position, or
/// an unrecognized sign nibble.
pub fn decode_packed(bytes: &[u8], meta: &FieldMeta) -> Result<Decimal> {
    if bytes.is_empty() {
        return Err(BindingError::Conversion {
            message: format!("Empty packed field {}", meta.cobol_name),
        });
    }

    let mut magnitude: u128 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let high = (byte >> 4) & 0x0F;
        let low = byte & 0x0F;
        if high > 9 {
            return Err(BindingError::Conversion {
                message: format!(
                    "Invalid digit nibble in byte 0x{:02X} of field {}",
                    byte, meta.cobol_name
                ),
            });
        }
        magnitude = magnitude * 10 + high as u128;
        if i < bytes.len() - 1 {
            if low > 9 {
                return Err(BindingError::Conversion {
                    message: format!(
                        "Invalid digit nibble in byte 0x{:02X} of field {}",
                        byte, meta.cobol_name
                    ),
                });
            }
            magnitude = magnitude * 10 + low as u128;
        }
    }

    let sign = Sign::from_packed_nibble(bytes[bytes.len() - 1] & 0x0F)?;
    let mut units = magnitude as i128;
    if sign == Sign::Negative {
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
        numeric_meta(CobolType::PackedDecimalItem, digits, fraction, signed)
    }

    #[test]
    fn test_encode_positive() {
        let mut buf = [0u8; 3];
        encode_packed(&Decimal::from(12345), &meta(5, 0, true), &mut buf).unwrap();
        assert_eq!(buf, [0x12, 0x34, 0x5C]);
    }

    #[test]
    fn test_encode_negative() {
        let mut buf = [0u8; 3];
        encode_packed(&Decimal::from(-12345), &meta(5, 0, true), &mut buf).unwrap();
        assert_eq!(buf, [0x12, 0x34, 0x5D]);
    }

    #[test]
    fn test_encode_even_digits_pads_leading_zero() {
        // 6 digits + sign = 7 nibbles, padded to 4 bytes
        let mut buf = [0u8; 4];
        encode_packed(&Decimal::from(123456), &meta(6, 0, true), &mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x23, 0x45, 0x6C]);
    }

    #[test]
    fn test_encode_with_decimals() {
        let mut buf = [0u8; 3];
        let value = Decimal::from_str("123.45").unwrap();
        encode_packed(&value, &meta(5, 2, true), &mut buf).unwrap();
        assert_eq!(buf, [0x12, 0x34, 0x5C]);
    }

    #[test]
    fn test_encode_unsigned_nibble() {
        let mut buf = [0u8; 3];
        encode_packed(&Decimal::from(12345), &meta(5, 0, false), &mut buf).unwrap();
        assert_eq!(buf, [0x12, 0x34, 0x5F]);
    }

    #[test]
    fn test_encode_zero() {
        let mut buf = [0u8; 2];
        encode_packed(&Decimal::ZERO, &meta(3, 0, true), &mut buf).unwrap();
        assert_eq!(buf, [0x00, 0x0C]);
    }

    #[test]
    fn test_encode_overflow() {
        let mut buf = [0u8; 3];
        let err = encode_packed(&Decimal::from(123456), &meta(5, 0, true), &mut buf).unwrap_err();
        assert!(matches!(err, BindingError::FieldOverflow { .. }));
    }

    #[test]
    fn test_encode_wrong_slice_length() {
        let mut buf = [0u8; 2];
        assert!(encode_packed(&Decimal::from(1), &meta(5, 0, true), &mut buf).is_err());
    }

    #[test]
    fn test_decode_positive() {
        let value = decode_packed(&[0x12, 0x34, 0x5C], &meta(5, 0, true)).unwrap();
        assert_eq!(value, Decimal::from(12345));
    }

    #[test]
    fn test_decode_negative() {
        let value = decode_packed(&[0x12, 0x34, 0x5D], &meta(5, 0, true)).unwrap();
        assert_eq!(value, Decimal::from(-12345));
    }

    #[test]
    fn test_decode_with_decimals() {
        let value = decode_packed(&[0x12, 0x34, 0x5C], &meta(5, 2, true)).unwrap();
        assert_eq!(value, Decimal::from_str("123.45").unwrap());
    }

    #[test]
    fn test_decode_invalid_nibble() {
        assert!(decode_packed(&[0xAB, 0x0C], &meta(3, 0, true)).is_err());
    }

    #[test]
    fn test_decode_invalid_sign() {
        assert!(decode_packed(&[0x12, 0x31], &meta(3, 0, true)).is_err());
    }

    #[test]
    fn test_roundtrip_max_precision() {
        // 18 digits, the IBM limit
        let value = Decimal::from_str("123456789012345678").unwrap();
        let m = meta(18, 0, true);
        let mut buf = vec![0u8; packed_len(18)];
        encode_packed(&value, &m, &mut buf).unwrap();
        assert_eq!(decode_packed(&buf, &m).unwrap(), value);
    }

    #[test]
    fn test_roundtrip_fractional() {
        let value = Decimal::from_str("-9876543.21").unwrap();
        let m = meta(9, 2, true);
        let mut buf = vec![0u8; packed_len(9)];
        encode_packed(&value, &m, &mut buf).unwrap();
        assert_eq!(decode_packed(&buf, &m).unwrap(), value);
    }
}
