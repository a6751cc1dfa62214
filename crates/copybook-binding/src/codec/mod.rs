//! Numeric codecs for COBOL host storage formats.
//!
//! Three formats are supported, each driven by the [`FieldMeta`] of the
//! field being processed:
//!
//! - **Packed Decimal (COMP-3)**: two digits per byte, sign nibble last
//! - **Zoned Decimal (DISPLAY)**: one digit per byte, sign overpunched
//!   in the zone of the rightmost byte
//! - **Binary (COMP/COMP-4)**: big-endian two's complement, range
//!   limited by the PIC digit count

pub mod binary;
pub mod packed;
pub mod zoned;

use rust_decimal::Decimal;

use crate::error::BindingError;
use crate::meta::FieldMeta;
use crate::Result;

/// Sign representation in COBOL numeric formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive value (nibble 0xC, alternates 0xA and 0xE).
    Positive,
    /// Negative value (nibble 0xD, alternate 0xB).
    Negative,
    /// Unsigned value (nibble 0xF, treated as positive).
    Unsigned,
}

impl Sign {
    /// Preferred sign nibble on encode.
    pub fn packed_nibble(self) -> u8 {
        match self {
            Sign::Positive => 0x0C,
            Sign::Negative => 0x0D,
            Sign::Unsigned => 0x0F,
        }
    }

    /// Parse a packed decimal sign nibble, accepting the alternate forms.
    pub fn from_packed_nibble(nibble: u8) -> Result<Self> {
        match nibble & 0x0F {
            0x0C | 0x0A | 0x0E => Ok(Sign::Positive),
            0x0D | 0x0B => Ok(Sign::Negative),
            0x0F => Ok(Sign::Unsigned),
            other => Err(BindingError::Conversion {
                message: format!("Invalid sign nibble: 0x{:X}", other),
            }),
        }
    }

    /// Sign to encode for a value in a field of the given signedness.
    pub fn for_value(negative: bool, signed: bool) -> Self {
        if !signed {
            Sign::Unsigned
        } else if negative {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }
}

/// Shift the implied decimal point out of a value and truncate to whole
/// scaled units, e.g. 123.45 with 2 fraction digits becomes 12345.
pub(crate) fn scaled_units(value: &Decimal, meta: &FieldMeta) -> Result<i128> {
    let factor = Decimal::from_i128_with_scale(pow10(meta.fraction_digits) as i128, 0);
    let scaled = value
        .checked_mul(factor)
        .ok_or_else(|| BindingError::Conversion {
            message: format!("Scaling {} for field {} overflowed", value, meta.cobol_name),
        })?
        .trunc()
        .normalize();
    Ok(scaled.mantissa())
}

/// 10^digits. Digit counts are capped at 18 before this is reached.
pub(crate) fn pow10(digits: u16) -> u128 {
    10u128.pow(digits as u32)
}

/// Common encode-side checks: digit count in range, unsigned fields
/// reject negatives, magnitude fits the declared digits.
pub(crate) fn checked_units(value: &Decimal, meta: &FieldMeta) -> Result<i128> {
    if meta.total_digits == 0 || meta.total_digits > 18 {
        return Err(BindingError::Conversion {
            message: format!(
                "Field {} declares {} digits, supported range is 1-18",
                meta.cobol_name, meta.total_digits
            ),
        });
    }
    let units = scaled_units(value, meta)?;
    if !meta.signed && units < 0 {
        return Err(BindingError::Conversion {
            message: format!(
                "Negative value {} for unsigned field {}",
                value, meta.cobol_name
            ),
        });
    }
    if units.unsigned_abs() >= pow10(meta.total_digits) {
        return Err(BindingError::FieldOverflow {
            field: meta.cobol_name.to_string(),
            value: value.to_string(),
            capacity: format!("{} digits", meta.total_digits),
        });
    }
    Ok(units)
}

#[cfg(test)]
pub(crate) fn numeric_meta(
    cobol_type: crate::meta::CobolType,
    total_digits: u16,
    fraction_digits: u16,
    signed: bool,
) -> FieldMeta {
    FieldMeta {
        cobol_name: "WS-NUM",
        cobol_type,
        level: 5,
        signed,
        total_digits,
        fraction_digits,
        min_occurs: 1,
        max_occurs: 1,
        picture: "S9(5)",
        usage: "DISPLAY",
        srce_line: 1,
    }
}
