//! Record binding descriptors.
//!
//! A [`RecordBinding`] is the layout tree for one copybook record type:
//! an ordered list of [`FieldBinding`] nodes, each carrying the field's
//! copybook metadata and, for group items, its subordinate fields.
//! Transformers hold exactly one descriptor and drive every encode and
//! decode from it.
//!
//! Descriptors are produced by generated factory functions and validated
//! once when a transformer is built. Validation cross-checks the declared
//! metadata against the picture text; a mismatch means the generated
//! bindings are out of sync with the copybook and must be regenerated.

use serde::Serialize;

use crate::codec::binary::storage_size_for_digits;
use crate::codec::packed::packed_len;
use crate::error::BindingError;
use crate::meta::{CobolType, FieldMeta};
use crate::picture::{parse_picture, PictureCategory};
use crate::Result;

/// One node of a record layout tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldBinding {
    /// Copybook metadata for the field.
    pub meta: FieldMeta,
    /// Subordinate fields. Non-empty only for group items.
    pub children: Vec<FieldBinding>,
}

impl FieldBinding {
    /// Build an elementary field node.
    pub fn elementary(meta: FieldMeta) -> Self {
        Self {
            meta,
            children: Vec::new(),
        }
    }

    /// Build a group node from its subordinate fields.
    pub fn group(meta: FieldMeta, children: Vec<FieldBinding>) -> Self {
        Self { meta, children }
    }

    /// Host storage of a single occurrence of this field.
    ///
    /// Pictures are checked by [`RecordBinding::validate`]; an
    /// unparseable alphanumeric picture reports zero length here.
    pub fn item_byte_length(&self) -> usize {
        match self.meta.cobol_type {
            CobolType::GroupItem => self.children.iter().map(FieldBinding::byte_length).sum(),
            CobolType::AlphanumericItem => parse_picture(self.meta.picture)
                .map(|p| p.display_size as usize)
                .unwrap_or(0),
            CobolType::ZonedDecimalItem => self.meta.total_digits as usize,
            CobolType::PackedDecimalItem => packed_len(self.meta.total_digits),
            CobolType::BinaryItem => storage_size_for_digits(self.meta.total_digits),
        }
    }

    /// Host storage of the field including all occurrences.
    pub fn byte_length(&self) -> usize {
        self.item_byte_length() * self.meta.max_occurs as usize
    }

    fn validate(&self, record: &str) -> Result<()> {
        let meta = &self.meta;
        let fail = |message: String| BindingError::Construction {
            record: record.to_string(),
            message: format!("{}: {}", meta.cobol_name, message),
        };

        if meta.level == 0 || meta.level > 49 {
            return Err(fail(format!("level {} outside 01-49", meta.level)));
        }
        if meta.max_occurs == 0 || meta.min_occurs > meta.max_occurs {
            return Err(fail(format!(
                "occurs bounds {}..{} are invalid",
                meta.min_occurs, meta.max_occurs
            )));
        }

        if meta.cobol_type == CobolType::GroupItem {
            if self.children.is_empty() {
                return Err(fail("group item has no subordinate fields".into()));
            }
            if !meta.picture.is_empty() {
                return Err(fail("group item carries a picture clause".into()));
            }
            for child in &self.children {
                child.validate(record)?;
            }
            return Ok(());
        }

        if !self.children.is_empty() {
            return Err(fail("elementary item has subordinate fields".into()));
        }

        let pic = parse_picture(meta.picture)?;
        match meta.cobol_type {
            CobolType::AlphanumericItem => {
                if pic.category == PictureCategory::Numeric {
                    return Err(fail(format!(
                        "numeric picture {} on an alphanumeric item",
                        meta.picture
                    )));
                }
                if meta.total_digits != 0 || meta.fraction_digits != 0 || meta.signed {
                    return Err(fail("digit metadata on an alphanumeric item".into()));
                }
            }
            _ => {
                if pic.category != PictureCategory::Numeric {
                    return Err(fail(format!(
                        "picture {} is not numeric",
                        meta.picture
                    )));
                }
                if pic.digits != meta.total_digits {
                    return Err(fail(format!(
                        "picture {} declares {} digits, metadata says {}",
                        meta.picture, pic.digits, meta.total_digits
                    )));
                }
                if pic.fraction_digits != meta.fraction_digits {
                    return Err(fail(format!(
                        "picture {} declares {} fraction digits, metadata says {}",
                        meta.picture, pic.fraction_digits, meta.fraction_digits
                    )));
                }
                if pic.signed != meta.signed {
                    return Err(fail(format!(
                        "sign of picture {} disagrees with metadata",
                        meta.picture
                    )));
                }
                if meta.total_digits == 0 || meta.total_digits > 18 {
                    return Err(fail(format!(
                        "{} digits outside the supported 1-18 range",
                        meta.total_digits
                    )));
                }
            }
        }

        let usage_ok = match meta.cobol_type {
            CobolType::PackedDecimalItem => {
                matches!(meta.usage, "PACKED-DECIMAL" | "COMP-3")
            }
            CobolType::BinaryItem => matches!(meta.usage, "BINARY" | "COMP" | "COMP-4"),
            _ => matches!(meta.usage, "DISPLAY" | ""),
        };
        if !usage_ok {
            return Err(fail(format!(
                "usage {} disagrees with the item storage type",
                meta.usage
            )));
        }

        Ok(())
    }
}

/// Binding descriptor for a whole record type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordBinding {
    /// Generated record type name, e.g. `Kcp05V10Profile`.
    pub name: &'static str,
    /// Name of the 01-level item in the copybook.
    pub cobol_name: &'static str,
    /// Top-level fields in declaration order.
    pub fields: Vec<FieldBinding>,
}

impl RecordBinding {
    /// Total host record length in bytes.
    pub fn byte_length(&self) -> usize {
        self.fields.iter().map(FieldBinding::byte_length).sum()
    }

    /// Look up a field anywhere in the tree by its copybook name.
    pub fn field(&self, cobol_name: &str) -> Option<&FieldBinding> {
        fn search<'a>(fields: &'a [FieldBinding], name: &str) -> Option<&'a FieldBinding> {
            for field in fields {
                if field.meta.cobol_name == name {
                    return Some(field);
                }
                if let Some(found) = search(&field.children, name) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.fields, cobol_name)
    }

    /// Check the descriptor for internal consistency.
    ///
    /// # Errors
    /// Returns [`BindingError::Construction`] when metadata disagrees
    /// with picture text, occurs bounds are malformed, or the tree shape
    /// is wrong; [`BindingError::UnsupportedPicture`] when a picture
    /// cannot be parsed at all.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(BindingError::Construction {
                record: self.name.to_string(),
                message: "record has no fields".to_string(),
            });
        }
        for field in &self.fields {
            field.validate(self.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed_field(digits: u16, occurs: u32) -> FieldBinding {
        FieldBinding::elementary(FieldMeta {
            cobol_name: "WS-COUNTER",
            cobol_type: CobolType::PackedDecimalItem,
            level: 5,
            signed: true,
            total_digits: digits,
            fraction_digits: 0,
            min_occurs: occurs,
            max_occurs: occurs,
            picture: "S9(7)",
            usage: "PACKED-DECIMAL",
            srce_line: 12,
        })
    }

    fn text_field(name: &'static str, picture: &'static str) -> FieldBinding {
        FieldBinding::elementary(FieldMeta {
            cobol_name: name,
            cobol_type: CobolType::AlphanumericItem,
            level: 5,
            signed: false,
            total_digits: 0,
            fraction_digits: 0,
            min_occurs: 1,
            max_occurs: 1,
            picture,
            usage: "DISPLAY",
            srce_line: 8,
        })
    }

    fn group_meta(name: &'static str) -> FieldMeta {
        FieldMeta {
            cobol_name: name,
            cobol_type: CobolType::GroupItem,
            level: 5,
            signed: false,
            total_digits: 0,
            fraction_digits: 0,
            min_occurs: 1,
            max_occurs: 1,
            picture: "",
            usage: "",
            srce_line: 4,
        }
    }

    #[test]
    fn test_packed_item_length() {
        // S9(7) COMP-3: (7 + 1 sign nibble) rounded to whole bytes = 4
        assert_eq!(packed_field(7, 1).item_byte_length(), 4);
    }

    #[test]
    fn test_occurs_multiplies_length() {
        assert_eq!(packed_field(7, 50).byte_length(), 200);
    }

    #[test]
    fn test_group_sums_children() {
        let group = FieldBinding::group(
            group_meta("WS-NAMES"),
            vec![text_field("WS-FIRST", "X(10)"), text_field("WS-LAST", "X(20)")],
        );
        assert_eq!(group.byte_length(), 30);
    }

    #[test]
    fn test_record_byte_length_and_lookup() {
        let record = RecordBinding {
            name: "NameRecord",
            cobol_name: "WS-NAME-REC",
            fields: vec![text_field("WS-FIRST", "X(10)"), packed_field(7, 2)],
        };
        assert_eq!(record.byte_length(), 18);
        assert!(record.validate().is_ok());
        assert_eq!(
            record.field("WS-COUNTER").unwrap().meta.total_digits,
            7
        );
        assert!(record.field("WS-MISSING").is_none());
    }

    #[test]
    fn test_digit_mismatch_fails_validation() {
        // Picture says 7 digits, metadata claims 5.
        let mut field = packed_field(5, 1);
        field.meta.picture = "S9(7)";
        let record = RecordBinding {
            name: "BadRecord",
            cobol_name: "WS-BAD",
            fields: vec![field],
        };
        assert!(matches!(
            record.validate(),
            Err(BindingError::Construction { .. })
        ));
    }

    #[test]
    fn test_sign_mismatch_fails_validation() {
        let mut field = packed_field(7, 1);
        field.meta.signed = false;
        let record = RecordBinding {
            name: "BadRecord",
            cobol_name: "WS-BAD",
            fields: vec![field],
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_empty_group_fails_validation() {
        let record = RecordBinding {
            name: "BadRecord",
            cobol_name: "WS-BAD",
            fields: vec![FieldBinding::group(group_meta("WS-EMPTY"), Vec::new())],
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_zero_occurs_fails_validation() {
        let mut field = packed_field(7, 1);
        field.meta.max_occurs = 0;
        field.meta.min_occurs = 0;
        let record = RecordBinding {
            name: "BadRecord",
            cobol_name: "WS-BAD",
            fields: vec![field],
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_usage_mismatch_fails_validation() {
        let mut field = packed_field(7, 1);
        field.meta.usage = "DISPLAY";
        let record = RecordBinding {
            name: "BadRecord",
            cobol_name: "WS-BAD",
            fields: vec![field],
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_unsupported_picture_propagates() {
        let record = RecordBinding {
            name: "BadRecord",
            cobol_name: "WS-BAD",
            fields: vec![text_field("WS-EDITED", "Z(5)9")],
        };
        assert!(matches!(
            record.validate(),
            Err(BindingError::UnsupportedPicture { .. })
        ));
    }
}
