//! Field metadata descriptors.
//!
//! Every generated field carries a [`FieldMeta`] mirroring the copybook
//! item it was produced from. The values must stay byte-for-byte
//! consistent with the copybook text; host decoding silently misaligns
//! fields otherwise.

use serde::Serialize;

/// Storage type of a copybook item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CobolType {
    /// A group item containing subordinate items.
    GroupItem,
    /// PIC X/A alphanumeric data, stored one character per byte.
    AlphanumericItem,
    /// PIC 9 DISPLAY numeric data (zoned decimal).
    ZonedDecimalItem,
    /// COMP-3 / PACKED-DECIMAL numeric data.
    PackedDecimalItem,
    /// COMP / COMP-4 big-endian binary numeric data.
    BinaryItem,
}

/// Copybook metadata for one generated field.
///
/// All members are `'static` so generated code can declare descriptors
/// as plain literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldMeta {
    /// Item name as written in the copybook, e.g. `KCP05V10-PROF-50-99`.
    pub cobol_name: &'static str,
    /// Storage type of the item.
    pub cobol_type: CobolType,
    /// COBOL level number (01-49).
    pub level: u8,
    /// Whether the picture carries an `S` sign symbol.
    pub signed: bool,
    /// Total digit count for numeric items; 0 otherwise.
    pub total_digits: u16,
    /// Digits right of the implied decimal point.
    pub fraction_digits: u16,
    /// Minimum occurrence count. 1 for scalar items.
    pub min_occurs: u32,
    /// Maximum occurrence count. Fixed at generation time; a field
    /// declared 50/50 always holds exactly 50 elements once populated.
    pub max_occurs: u32,
    /// Original picture clause text, e.g. `S9(7)`. Empty for groups.
    pub picture: &'static str,
    /// Original usage clause text, e.g. `PACKED-DECIMAL`. Empty for groups.
    pub usage: &'static str,
    /// Line number of the item in the source copybook.
    pub srce_line: u32,
}

impl FieldMeta {
    /// Whether the field is an OCCURS table rather than a scalar.
    pub fn is_repeating(&self) -> bool {
        self.max_occurs > 1
    }
}
