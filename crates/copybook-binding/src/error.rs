//! Error types for binding and transform operations.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while building bindings or transforming records.
#[derive(Debug, Error, Diagnostic)]
pub enum BindingError {
    /// The binding descriptor could not be built or failed validation.
    #[error("Binding construction failed for {record}: {message}")]
    #[diagnostic(
        code(binding::construction),
        help("Regenerate the record bindings; the descriptor metadata is out of sync with the copybook")
    )]
    Construction {
        /// Record type the descriptor belongs to.
        record: String,
        /// What was inconsistent.
        message: String,
    },

    /// A picture clause uses symbols the binding runtime does not handle.
    #[error("Unsupported picture clause: {picture}")]
    #[diagnostic(code(binding::unsupported_picture))]
    UnsupportedPicture {
        /// The offending picture text.
        picture: String,
    },

    /// A value could not be converted to or from its host representation.
    #[error("Conversion failed: {message}")]
    #[diagnostic(code(binding::conversion))]
    Conversion {
        /// Description of the conversion failure.
        message: String,
    },

    /// A value does not fit the declared capacity of its field.
    #[error("Value {value} does not fit field {field} ({capacity})")]
    #[diagnostic(code(binding::field_overflow))]
    FieldOverflow {
        /// COBOL name of the field.
        field: String,
        /// The rejected value.
        value: String,
        /// Declared capacity, e.g. "7 digits" or "10 bytes".
        capacity: String,
    },

    /// A repeating field holds more elements than its OCCURS bound.
    #[error("Field {field} holds {actual} elements but OCCURS allows {max}")]
    #[diagnostic(code(binding::cardinality_exceeded))]
    CardinalityExceeded {
        /// COBOL name of the field.
        field: String,
        /// Number of elements supplied.
        actual: usize,
        /// Maximum occurrence count.
        max: u32,
    },

    /// The host buffer is shorter than the record layout requires.
    #[error("Host buffer too short: need {expected} bytes, got {actual}")]
    #[diagnostic(code(binding::buffer_too_short))]
    BufferTooShort {
        /// Bytes required by the binding.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },

    /// The requested host character set is not registered.
    #[error("Unknown code page: {0}")]
    #[diagnostic(code(binding::invalid_code_page))]
    InvalidCodePage(String),

    /// A value tree node does not match the shape the binding expects.
    #[error("Unexpected value shape for {field}: expected {expected}")]
    #[diagnostic(code(binding::value_shape))]
    ValueShape {
        /// Field or record the mismatch occurred at.
        field: String,
        /// Expected node kind or arity.
        expected: String,
    },
}
