//! Binary (COMP/COMP-4) encoding and decoding.
//!
//! Big-endian two's complement integers. Storage is determined by the
//! PIC digit count (halfword, fullword or doubleword) and the value
//! range is limited by the digits, not the storage:
//!
//! | Digits | Storage | PIC S9(4) range  |
//! |--------|---------|------------------|
//! | 1-4    | 2 bytes | -9999 to +9999   |
//! | 5-9    | 4 bytes |                  |
//! | 10-18  | 8 bytes |                  |

use rust_decimal::Decimal;

use super::checked_units;
use crate::error::BindingError;
use crate::meta::FieldMeta;
use crate::Result;

/// Storage size in bytes for a binary field of the given digit count.
pub fn storage_size_for_digits(total_digits: u16) -> usize {
    match total_digits {
        0..=4 => 2,
        5..=9 => 4,
        _ => 8,
    }
}

/// Encode a value into a binary field slice.
///
/// # Errors
/// Fails when the value exceeds the PIC digit range, is negative in an
/// unsigned field, or the slice length is wrong.
pub fn encode_binary(value: &Decimal, meta: &FieldMeta, target: &mut [u8]) -> Result<()> {
    let expected = storage_size_for_digits(meta.total_digits);
    if target.len() != expected {
        return Err(BindingError::Conversion {
            message: format!(
                "Binary field {} needs {} bytes, got a {} byte slice",
                meta.cobol_name,
                expected,
                target.len()
            ),
        });
    }

    // 18 digits fit an i64; checked_units bounds the magnitude first.
    let units = checked_units(value, meta)? as i64;
    let bytes = units.to_be_bytes();
    target.copy_from_slice(&bytes[8 - expected..]);
    Ok(())
}

/// Decode a binary field slice.
///
/// Signed fields sign-extend from the top bit; unsigned fields read the
/// full magnitude.
///
/// # Errors
/// Fails on an empty or oversized slice.
pub fn decode_binary(bytes: &[u8], meta: &FieldMeta) -> Result<Decimal> {
    if bytes.is_empty() || bytes.len() > 8 {
        return Err(BindingError::Conversion {
            message: format!(
                "Binary field {} has unsupported length {}",
                meta.cobol_name,
                bytes.len()
            ),
        });
    }

    let units: i128 = if meta.signed && (bytes[0] & 0x80) != 0 {
        let mut acc: i64 = -1;
        for &b in bytes {
            acc = (acc << 8) | b as i64;
        }
        acc as i128
    } else {
        let mut acc: u64 = 0;
        for &b in bytes {
            acc = (acc << 8) | b as u64;
        }
        acc as i128
    };

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

    fn meta(digits: u16, fraction: u16, signed: bool) -> FieldMeta {
        numeric_meta(CobolType::BinaryItem, digits, fraction, signed)
    }

    #[test]
    fn test_storage_sizes() {
        assert_eq!(storage_size_for_digits(4), 2);
        assert_eq!(storage_size_for_digits(9), 4);
        assert_eq!(storage_size_for_digits(18), 8);
    }

    #[test]
    fn test_encode_halfword() {
        let mut buf = [0u8; 2];
        encode_binary(&Decimal::from(1234), &meta(4, 0, true), &mut buf).unwrap();
        assert_eq!(buf, [0x04, 0xD2]);
    }

    #[test]
    fn test_encode_negative_halfword() {
        let mut buf = [0u8; 2];
        encode_binary(&Decimal::from(-1), &meta(4, 0, true), &mut buf).unwrap();
        assert_eq!(buf, [0xFF, 0xFF]);
    }

    #[test]
    fn test_encode_fullword() {
        let mut buf = [0u8; 4];
        encode_binary(&Decimal::from(999_999_999), &meta(9, 0, true), &mut buf).unwrap();
        assert_eq!(buf, [0x3B, 0x9A, 0xC9, 0xFF]);
    }

    #[test]
    fn test_encode_pic_range_enforced() {
        // COMP range is the digit range, not the storage range
        let mut buf = [0u8; 2];
        let err = encode_binary(&Decimal::from(10000), &meta(4, 0, true), &mut buf).unwrap_err();
        assert!(matches!(err, BindingError::FieldOverflow { .. }));
    }

    #[test]
    fn test_encode_unsigned_rejects_negative() {
        let mut buf = [0u8; 2];
        assert!(encode_binary(&Decimal::from(-5), &meta(4, 0, false), &mut buf).is_err());
    }

    #[test]
    fn test_decode_signed_extends() {
        let value = decode_binary(&[0xFF, 0xFF], &meta(4, 0, true)).unwrap();
        assert_eq!(value, Decimal::from(-1));
    }

    #[test]
    fn test_decode_unsigned_full_magnitude() {
        let value = decode_binary(&[0xFF, 0xFF], &meta(4, 0, false)).unwrap();
        assert_eq!(value, Decimal::from(65535));
    }

    #[test]
    fn test_roundtrip_doubleword() {
        let value = Decimal::from(123_456_789_012_345_678_i64);
        let m = meta(18, 0, true);
        let mut buf = [0u8; 8];
        encode_binary(&value, &m, &mut buf).unwrap();
        assert_eq!(decode_binary(&buf, &m).unwrap(), value);
    }

    #[test]
    fn test_roundtrip_fractional() {
        use std::str::FromStr;
        let value = Decimal::from_str("-123.45").unwrap();
        let m = meta(5, 2, true);
        let mut buf = [0u8; 4];
        encode_binary(&value, &m, &mut buf).unwrap();
        assert_eq!(decode_binary(&buf, &m).unwrap(), value);
    }
}
