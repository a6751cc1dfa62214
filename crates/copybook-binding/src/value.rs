//! Dynamic value trees exchanged between generated records and the
//! transformation engine.
//!
//! Generated record types flatten themselves into a [`HostValue`] tree
//! (one `Group` node per copybook group, children in declaration order)
//! and rebuild themselves from the tree a decode produces. The typed
//! extractors surface shape mismatches as errors instead of panicking;
//! a mismatch means the value conversion and the binding descriptor
//! disagree about the record layout.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::BindingError;
use crate::Result;

/// One node of a record value tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HostValue {
    /// Alphanumeric field content.
    Text(String),
    /// Numeric field content.
    Number(Decimal),
    /// Elements of an OCCURS field, possibly fewer than the bound.
    Array(Vec<HostValue>),
    /// Children of a group item in declaration order.
    Group(Vec<HostValue>),
}

impl HostValue {
    /// Extract alphanumeric content.
    pub fn into_text(self, field: &str) -> Result<String> {
        match self {
            HostValue::Text(s) => Ok(s),
            other => Err(shape(field, "text", &other)),
        }
    }

    /// Extract numeric content.
    pub fn into_number(self, field: &str) -> Result<Decimal> {
        match self {
            HostValue::Number(n) => Ok(n),
            other => Err(shape(field, "number", &other)),
        }
    }

    /// Extract an integral number as `i64`.
    pub fn into_i64(self, field: &str) -> Result<i64> {
        let number = self.into_number(field)?;
        if number.trunc() != number {
            return Err(BindingError::Conversion {
                message: format!("Field {} holds fractional value {}", field, number),
            });
        }
        number.to_i64().ok_or_else(|| BindingError::Conversion {
            message: format!("Field {} value {} does not fit an i64", field, number),
        })
    }

    /// Extract an integral number as `i32`.
    pub fn into_i32(self, field: &str) -> Result<i32> {
        let wide = self.into_i64(field)?;
        i32::try_from(wide).map_err(|_| BindingError::Conversion {
            message: format!("Field {} value {} does not fit an i32", field, wide),
        })
    }

    /// Extract an integral number as `i16`.
    pub fn into_i16(self, field: &str) -> Result<i16> {
        let wide = self.into_i64(field)?;
        i16::try_from(wide).map_err(|_| BindingError::Conversion {
            message: format!("Field {} value {} does not fit an i16", field, wide),
        })
    }

    /// Extract the elements of an OCCURS field.
    pub fn into_array(self, field: &str) -> Result<Vec<HostValue>> {
        match self {
            HostValue::Array(elements) => Ok(elements),
            other => Err(shape(field, "array", &other)),
        }
    }

    /// Extract the children of a group item.
    pub fn into_group(self, field: &str) -> Result<Vec<HostValue>> {
        match self {
            HostValue::Group(children) => Ok(children),
            other => Err(shape(field, "group", &other)),
        }
    }
}

fn shape(field: &str, expected: &str, got: &HostValue) -> BindingError {
    let got = match got {
        HostValue::Text(_) => "text",
        HostValue::Number(_) => "number",
        HostValue::Array(_) => "array",
        HostValue::Group(_) => "group",
    };
    BindingError::ValueShape {
        field: field.to_string(),
        expected: format!("{}, got {}", expected, got),
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Text(s.to_string())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::Text(s)
    }
}

impl From<Decimal> for HostValue {
    fn from(n: Decimal) -> Self {
        HostValue::Number(n)
    }
}

impl From<i16> for HostValue {
    fn from(n: i16) -> Self {
        HostValue::Number(Decimal::from(n))
    }
}

impl From<i32> for HostValue {
    fn from(n: i32) -> Self {
        HostValue::Number(Decimal::from(n))
    }
}

impl From<i64> for HostValue {
    fn from(n: i64) -> Self {
        HostValue::Number(Decimal::from(n))
    }
}
