//! Binding runtime for COBOL copybook record layouts.
//!
//! This crate converts between in-memory record objects and the
//! fixed-width host encoding used on IBM mainframes. Generated record
//! types declare their layout as a tree of field descriptors; the
//! transformers here walk that tree to encode and decode host buffers.
//!
//! # Features
//!
//! - **Binding descriptors**: per-record layout trees carrying the
//!   copybook metadata (picture, usage, level, OCCURS bounds)
//! - **Host transformers**: object-to-host and host-to-object engines
//!   parameterized by a binding descriptor and a COBOL context
//! - **Numeric codecs**: packed decimal (COMP-3), zoned decimal
//!   (DISPLAY) and big-endian binary (COMP)
//! - **EBCDIC conversion**: CP037, CP500, CP1047 and the Euro-enabled
//!   CP1140, with CCSID and name lookup
//!
//! # Example
//!
//! ```rust
//! use copybook_binding::codec::packed;
//! use copybook_binding::meta::{CobolType, FieldMeta};
//! use rust_decimal::Decimal;
//!
//! let meta = FieldMeta {
//!     cobol_name: "WS-AMOUNT",
//!     cobol_type: CobolType::PackedDecimalItem,
//!     level: 5,
//!     signed: true,
//!     total_digits: 7,
//!     fraction_digits: 0,
//!     min_occurs: 1,
//!     max_occurs: 1,
//!     picture: "S9(7)",
//!     usage: "PACKED-DECIMAL",
//!     srce_line: 10,
//! };
//!
//! let mut buf = [0u8; 4];
//! packed::encode_packed(&Decimal::from(1234567), &meta, &mut buf).unwrap();
//! assert_eq!(buf, [0x12, 0x34, 0x56, 0x7C]);
//! ```

pub mod binding;
pub mod codec;
pub mod context;
pub mod ebcdic;
pub mod error;
pub mod meta;
pub mod picture;
pub mod transform;
pub mod value;

pub use binding::{FieldBinding, RecordBinding};
pub use context::CobolContext;
pub use ebcdic::{CodePage, CodePageRegistry, CP037, CP1047, CP1140, CP500};
pub use error::BindingError;
pub use meta::{CobolType, FieldMeta};
pub use picture::{parse_picture, PictureCategory, PictureInfo};
pub use transform::{FromHostTransformer, HostRecord, ToHostTransformer};
pub use value::HostValue;

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, BindingError>;
