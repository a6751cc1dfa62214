//! Picture clause parsing.
//!
//! Handles the picture subset the binding generator emits: `X`, `A` and
//! `9` symbols with optional `(n)` repetition, a leading `S` sign and a
//! single `V` decimal point. Edited pictures (`Z`, `,`, `$`, ...) are
//! rejected; none appear in generated bindings.

use serde::Serialize;

use crate::error::BindingError;
use crate::Result;

/// Data category derived from a picture clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PictureCategory {
    /// All `A` symbols.
    Alphabetic,
    /// `X` symbols, or any mix of character and digit symbols.
    Alphanumeric,
    /// All `9` symbols.
    Numeric,
}

/// Parsed shape of a picture clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PictureInfo {
    /// Derived category.
    pub category: PictureCategory,
    /// Total digit count for numeric pictures; 0 otherwise.
    pub digits: u16,
    /// Digits after the `V` decimal point.
    pub fraction_digits: u16,
    /// Whether the picture starts with `S`.
    pub signed: bool,
    /// Storage size in bytes under DISPLAY usage.
    pub display_size: u16,
}

/// Parse a picture clause.
///
/// # Errors
/// Returns [`BindingError::UnsupportedPicture`] for empty input, edited
/// pictures, malformed repetition counts, or sign/decimal symbols on
/// non-numeric pictures.
pub fn parse_picture(picture: &str) -> Result<PictureInfo> {
    let unsupported = || BindingError::UnsupportedPicture {
        picture: picture.to_string(),
    };

    if picture.is_empty() {
        return Err(unsupported());
    }

    let mut chars = picture.chars().peekable();
    let mut signed = false;
    if let Some('S' | 's') = chars.peek() {
        signed = true;
        chars.next();
    }

    let mut x_count: u32 = 0;
    let mut a_count: u32 = 0;
    let mut int_digits: u32 = 0;
    let mut frac_digits: u32 = 0;
    let mut seen_v = false;

    while let Some(symbol) = chars.next() {
        let symbol = symbol.to_ascii_uppercase();
        if symbol == 'V' {
            if seen_v || matches!(chars.peek(), Some('(')) {
                return Err(unsupported());
            }
            seen_v = true;
            continue;
        }

        let mut count: u32 = 1;
        if chars.peek() == Some(&'(') {
            chars.next();
            let mut digits = String::new();
            loop {
                match chars.next() {
                    Some(')') => break,
                    Some(c) if c.is_ascii_digit() => digits.push(c),
                    _ => return Err(unsupported()),
                }
            }
            count = digits.parse::<u32>().map_err(|_| unsupported())?;
            if count == 0 {
                return Err(unsupported());
            }
        }

        match symbol {
            'X' => x_count += count,
            'A' => a_count += count,
            '9' => {
                if seen_v {
                    frac_digits += count;
                } else {
                    int_digits += count;
                }
            }
            _ => return Err(unsupported()),
        }
        if seen_v && symbol != '9' {
            return Err(unsupported());
        }
    }

    let digits = int_digits + frac_digits;
    let category = if digits > 0 && x_count == 0 && a_count == 0 {
        PictureCategory::Numeric
    } else if a_count > 0 && x_count == 0 && digits == 0 {
        PictureCategory::Alphabetic
    } else {
        PictureCategory::Alphanumeric
    };

    // S and V only make sense on purely numeric pictures.
    if category != PictureCategory::Numeric && (signed || seen_v) {
        return Err(unsupported());
    }
    if digits > u16::MAX as u32 || x_count + a_count + digits > u16::MAX as u32 {
        return Err(unsupported());
    }

    Ok(PictureInfo {
        category,
        digits: digits as u16,
        fraction_digits: frac_digits as u16,
        signed,
        display_size: (x_count + a_count + digits) as u16,
    })
}
