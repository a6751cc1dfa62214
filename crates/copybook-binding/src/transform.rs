//! Host transformation engine.
//!
//! [`ToHostTransformer`] and [`FromHostTransformer`] are the shared base
//! the generated per-record wrappers delegate to. A transformer is built
//! from a [`CobolContext`] and the record's binding descriptor, obtained
//! through the [`HostRecord`] factory and validated once up front; every
//! transform then walks the descriptor tree against a value tree,
//! encoding or decoding one field at a time at a running offset.
//!
//! Encoding pads fixed OCCURS tables with zero/space elements up to the
//! occurrence bound and space-fills alphanumeric fields; decoding always
//! materializes exactly `max_occurs` elements, so a repeating field is
//! never left partially populated.

use std::marker::PhantomData;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::binding::{FieldBinding, RecordBinding};
use crate::codec::{binary, packed, zoned};
use crate::context::CobolContext;
use crate::ebcdic::CodePage;
use crate::error::BindingError;
use crate::meta::CobolType;
use crate::value::HostValue;
use crate::Result;

/// EBCDIC space, identical across the supported code pages.
const HOST_SPACE: u8 = 0x40;

/// Implemented by generated record types.
pub trait HostRecord: Sized {
    /// Build the binding descriptor for this record type.
    ///
    /// # Errors
    /// Fails with [`BindingError::Construction`] when the generated
    /// metadata cannot produce a descriptor.
    fn binding() -> Result<RecordBinding>;

    /// Flatten the record into the value tree the engine walks.
    fn to_host_value(&self) -> HostValue;

    /// Rebuild the record from a decoded value tree.
    fn from_host_value(value: HostValue) -> Result<Self>;
}

fn build_binding<R: HostRecord>() -> Result<RecordBinding> {
    let binding = R::binding()?;
    binding.validate()?;
    debug!(
        record = binding.name,
        byte_length = binding.byte_length(),
        "record binding constructed"
    );
    Ok(binding)
}

/// Transforms record objects to host byte sequences.
#[derive(Debug)]
pub struct ToHostTransformer<R: HostRecord> {
    context: CobolContext,
    binding: RecordBinding,
    _record: PhantomData<R>,
}

impl<R: HostRecord> ToHostTransformer<R> {
    /// Create a transformer using default COBOL parameters.
    pub fn new() -> Result<Self> {
        Self::with_context(CobolContext::default())
    }

    /// Create a transformer using a specific COBOL parameter set.
    pub fn with_context(context: CobolContext) -> Result<Self> {
        Ok(Self {
            context,
            binding: build_binding::<R>()?,
            _record: PhantomData,
        })
    }

    /// Create a transformer using a specific host character set while
    /// other COBOL parameters keep their defaults.
    pub fn with_charset(host_charset: &str) -> Result<Self> {
        Self::with_context(CobolContext::with_charset(host_charset)?)
    }

    /// The binding descriptor driving this transformer.
    pub fn binding(&self) -> &RecordBinding {
        &self.binding
    }

    /// Host record length in bytes.
    pub fn byte_length(&self) -> usize {
        self.binding.byte_length()
    }

    /// Encode a record into its host byte representation.
    ///
    /// # Errors
    /// Fails on digit or text overflow, OCCURS bounds exceeded, or
    /// characters the host character set cannot represent.
    pub fn transform(&self, record: &R) -> Result<Vec<u8>> {
        let children = record.to_host_value().into_group(self.binding.name)?;
        let mut buf = vec![0u8; self.binding.byte_length()];
        let mut offset = 0;
        encode_fields(
            self.binding.name,
            &self.binding.fields,
            children,
            self.context.code_page(),
            &mut buf,
            &mut offset,
        )?;
        trace!(
            record = self.binding.name,
            bytes = buf.len(),
            "transformed record to host"
        );
        Ok(buf)
    }
}

/// Transforms host byte sequences to record objects.
#[derive(Debug)]
pub struct FromHostTransformer<R: HostRecord> {
    context: CobolContext,
    binding: RecordBinding,
    _record: PhantomData<R>,
}

impl<R: HostRecord> FromHostTransformer<R> {
    /// Create a transformer using default COBOL parameters.
    pub fn new() -> Result<Self> {
        Self::with_context(CobolContext::default())
    }

    /// Create a transformer using a specific COBOL parameter set.
    pub fn with_context(context: CobolContext) -> Result<Self> {
        Ok(Self {
            context,
            binding: build_binding::<R>()?,
            _record: PhantomData,
        })
    }

    /// Create a transformer using a specific host character set while
    /// other COBOL parameters keep their defaults.
    pub fn with_charset(host_charset: &str) -> Result<Self> {
        Self::with_context(CobolContext::with_charset(host_charset)?)
    }

    /// The binding descriptor driving this transformer.
    pub fn binding(&self) -> &RecordBinding {
        &self.binding
    }

    /// Host record length in bytes.
    pub fn byte_length(&self) -> usize {
        self.binding.byte_length()
    }

    /// Decode a host buffer into a record object.
    ///
    /// Trailing bytes past the record length are ignored; host buffers
    /// are often block-padded.
    ///
    /// # Errors
    /// Fails when the buffer is shorter than the record or a field holds
    /// malformed host data.
    pub fn transform(&self, host: &[u8]) -> Result<R> {
        let needed = self.binding.byte_length();
        if host.len() < needed {
            return Err(BindingError::BufferTooShort {
                expected: needed,
                actual: host.len(),
            });
        }
        let mut offset = 0;
        let children = decode_fields(
            &self.binding.fields,
            self.context.code_page(),
            host,
            &mut offset,
        )?;
        trace!(
            record = self.binding.name,
            bytes = needed,
            "transformed host data to record"
        );
        R::from_host_value(HostValue::Group(children))
    }
}

fn encode_fields(
    owner: &str,
    fields: &[FieldBinding],
    values: Vec<HostValue>,
    code_page: &CodePage,
    buf: &mut [u8],
    offset: &mut usize,
) -> Result<()> {
    if values.len() != fields.len() {
        return Err(BindingError::ValueShape {
            field: owner.to_string(),
            expected: format!("{} child values, got {}", fields.len(), values.len()),
        });
    }
    for (field, value) in fields.iter().zip(values) {
        encode_field(field, value, code_page, buf, offset)?;
    }
    Ok(())
}

fn encode_field(
    field: &FieldBinding,
    value: HostValue,
    code_page: &CodePage,
    buf: &mut [u8],
    offset: &mut usize,
) -> Result<()> {
    if !field.meta.is_repeating() {
        return encode_item(field, value, code_page, buf, offset);
    }

    let elements = value.into_array(field.meta.cobol_name)?;
    if elements.len() > field.meta.max_occurs as usize {
        return Err(BindingError::CardinalityExceeded {
            field: field.meta.cobol_name.to_string(),
            actual: elements.len(),
            max: field.meta.max_occurs,
        });
    }
    let missing = field.meta.max_occurs as usize - elements.len();
    for element in elements {
        encode_item(field, element, code_page, buf, offset)?;
    }
    for _ in 0..missing {
        encode_item(field, default_item_value(field), code_page, buf, offset)?;
    }
    Ok(())
}

fn encode_item(
    field: &FieldBinding,
    value: HostValue,
    code_page: &CodePage,
    buf: &mut [u8],
    offset: &mut usize,
) -> Result<()> {
    let meta = &field.meta;
    match meta.cobol_type {
        CobolType::GroupItem => {
            let children = value.into_group(meta.cobol_name)?;
            encode_fields(meta.cobol_name, &field.children, children, code_page, buf, offset)
        }
        CobolType::AlphanumericItem => {
            let text = value.into_text(meta.cobol_name)?;
            let len = field.item_byte_length();
            let encoded = code_page.encode(&text)?;
            if encoded.len() > len {
                return Err(BindingError::FieldOverflow {
                    field: meta.cobol_name.to_string(),
                    value: text,
                    capacity: format!("{} bytes", len),
                });
            }
            let slice = &mut buf[*offset..*offset + len];
            slice[..encoded.len()].copy_from_slice(&encoded);
            for byte in &mut slice[encoded.len()..] {
                *byte = HOST_SPACE;
            }
            *offset += len;
            Ok(())
        }
        CobolType::ZonedDecimalItem => {
            let number = value.into_number(meta.cobol_name)?;
            let len = field.item_byte_length();
            zoned::encode_zoned(&number, meta, &mut buf[*offset..*offset + len])?;
            *offset += len;
            Ok(())
        }
        CobolType::PackedDecimalItem => {
            let number = value.into_number(meta.cobol_name)?;
            let len = field.item_byte_length();
            packed::encode_packed(&number, meta, &mut buf[*offset..*offset + len])?;
            *offset += len;
            Ok(())
        }
        CobolType::BinaryItem => {
            let number = value.into_number(meta.cobol_name)?;
            let len = field.item_byte_length();
            binary::encode_binary(&number, meta, &mut buf[*offset..*offset + len])?;
            *offset += len;
            Ok(())
        }
    }
}

/// Filler for OCCURS slots the caller left unpopulated: zero for
/// numerics, blanks for text, recursively for groups.
fn default_item_value(field: &FieldBinding) -> HostValue {
    match field.meta.cobol_type {
        CobolType::GroupItem => HostValue::Group(
            field
                .children
                .iter()
                .map(|child| {
                    if child.meta.is_repeating() {
                        HostValue::Array(Vec::new())
                    } else {
                        default_item_value(child)
                    }
                })
                .collect(),
        ),
        CobolType::AlphanumericItem => HostValue::Text(String::new()),
        _ => HostValue::Number(Decimal::ZERO),
    }
}

fn decode_fields(
    fields: &[FieldBinding],
    code_page: &CodePage,
    host: &[u8],
    offset: &mut usize,
) -> Result<Vec<HostValue>> {
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        values.push(decode_field(field, code_page, host, offset)?);
    }
    Ok(values)
}

fn decode_field(
    field: &FieldBinding,
    code_page: &CodePage,
    host: &[u8],
    offset: &mut usize,
) -> Result<HostValue> {
    if !field.meta.is_repeating() {
        return decode_item(field, code_page, host, offset);
    }
    let mut elements = Vec::with_capacity(field.meta.max_occurs as usize);
    for _ in 0..field.meta.max_occurs {
        elements.push(decode_item(field, code_page, host, offset)?);
    }
    Ok(HostValue::Array(elements))
}

fn decode_item(
    field: &FieldBinding,
    code_page: &CodePage,
    host: &[u8],
    offset: &mut usize,
) -> Result<HostValue> {
    let meta = &field.meta;
    match meta.cobol_type {
        CobolType::GroupItem => Ok(HostValue::Group(decode_fields(
            &field.children,
            code_page,
            host,
            offset,
        )?)),
        CobolType::AlphanumericItem => {
            let len = field.item_byte_length();
            let text = code_page.decode(&host[*offset..*offset + len])?;
            *offset += len;
            Ok(HostValue::Text(text.trim_end_matches(' ').to_string()))
        }
        CobolType::ZonedDecimalItem => {
            let len = field.item_byte_length();
            let number = zoned::decode_zoned(&host[*offset..*offset + len], meta)?;
            *offset += len;
            Ok(HostValue::Number(number))
        }
        CobolType::PackedDecimalItem => {
            let len = field.item_byte_length();
            let number = packed::decode_packed(&host[*offset..*offset + len], meta)?;
            *offset += len;
            Ok(HostValue::Number(number))
        }
        CobolType::BinaryItem => {
            let len = field.item_byte_length();
            let number = binary::decode_binary(&host[*offset..*offset + len], meta)?;
            *offset += len;
            Ok(HostValue::Number(number))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::FieldMeta;
    use std::str::FromStr;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct OrderSummary {
        order_no: i32,
        status: String,
        amounts: Vec<Decimal>,
    }

    impl HostRecord for OrderSummary {
        fn binding() -> Result<RecordBinding> {
            Ok(RecordBinding {
                name: "OrderSummary",
                cobol_name: "WS-ORDER-SUMMARY",
                fields: vec![
                    FieldBinding::elementary(FieldMeta {
                        cobol_name: "WS-ORDER-NO",
                        cobol_type: CobolType::ZonedDecimalItem,
                        level: 5,
                        signed: false,
                        total_digits: 5,
                        fraction_digits: 0,
                        min_occurs: 1,
                        max_occurs: 1,
                        picture: "9(5)",
                        usage: "DISPLAY",
                        srce_line: 3,
                    }),
                    FieldBinding::elementary(FieldMeta {
                        cobol_name: "WS-STATUS",
                        cobol_type: CobolType::AlphanumericItem,
                        level: 5,
                        signed: false,
                        total_digits: 0,
                        fraction_digits: 0,
                        min_occurs: 1,
                        max_occurs: 1,
                        picture: "X(2)",
                        usage: "DISPLAY",
                        srce_line: 4,
                    }),
                    FieldBinding::elementary(FieldMeta {
                        cobol_name: "WS-AMOUNT",
                        cobol_type: CobolType::PackedDecimalItem,
                        level: 5,
                        signed: true,
                        total_digits: 5,
                        fraction_digits: 2,
                        min_occurs: 3,
                        max_occurs: 3,
                        picture: "S9(3)V99",
                        usage: "PACKED-DECIMAL",
                        srce_line: 5,
                    }),
                ],
            })
        }

        fn to_host_value(&self) -> HostValue {
            HostValue::Group(vec![
                HostValue::from(self.order_no),
                HostValue::from(self.status.as_str()),
                HostValue::Array(self.amounts.iter().copied().map(HostValue::from).collect()),
            ])
        }

        fn from_host_value(value: HostValue) -> Result<Self> {
            let mut children = value.into_group("OrderSummary")?.into_iter();
            let missing = || BindingError::ValueShape {
                field: "OrderSummary".to_string(),
                expected: "3 child values".to_string(),
            };
            Ok(Self {
                order_no: children.next().ok_or_else(missing)?.into_i32("WS-ORDER-NO")?,
                status: children.next().ok_or_else(missing)?.into_text("WS-STATUS")?,
                amounts: children
                    .next()
                    .ok_or_else(missing)?
                    .into_array("WS-AMOUNT")?
                    .into_iter()
                    .map(|v| v.into_number("WS-AMOUNT"))
                    .collect::<Result<Vec<_>>>()?,
            })
        }
    }

    /// Same layout but the digit metadata disagrees with the picture.
    #[derive(Debug, Default)]
    struct BrokenRecord;

    impl HostRecord for BrokenRecord {
        fn binding() -> Result<RecordBinding> {
            Ok(RecordBinding {
                name: "BrokenRecord",
                cobol_name: "WS-BROKEN",
                fields: vec![FieldBinding::elementary(FieldMeta {
                    cobol_name: "WS-COUNT",
                    cobol_type: CobolType::PackedDecimalItem,
                    level: 5,
                    signed: true,
                    total_digits: 5,
                    fraction_digits: 0,
                    min_occurs: 1,
                    max_occurs: 1,
                    picture: "S9(3)",
                    usage: "PACKED-DECIMAL",
                    srce_line: 2,
                })],
            })
        }

        fn to_host_value(&self) -> HostValue {
            HostValue::Group(Vec::new())
        }

        fn from_host_value(_value: HostValue) -> Result<Self> {
            Ok(Self)
        }
    }

    fn sample() -> OrderSummary {
        OrderSummary {
            order_no: 123,
            status: "OK".to_string(),
            amounts: vec![Decimal::from_str("1.25").unwrap()],
        }
    }

    #[test]
    fn test_construction_paths() {
        assert!(ToHostTransformer::<OrderSummary>::new().is_ok());
        assert!(
            ToHostTransformer::<OrderSummary>::with_context(CobolContext::default()).is_ok()
        );
        assert!(ToHostTransformer::<OrderSummary>::with_charset("IBM-1047").is_ok());
        assert!(FromHostTransformer::<OrderSummary>::new().is_ok());
        assert!(FromHostTransformer::<OrderSummary>::with_charset("CP500").is_ok());
    }

    #[test]
    fn test_unknown_charset_rejected() {
        assert!(matches!(
            ToHostTransformer::<OrderSummary>::with_charset("ISO-8859-1"),
            Err(BindingError::InvalidCodePage(_))
        ));
    }

    #[test]
    fn test_binding_accessor() {
        let transformer = ToHostTransformer::<OrderSummary>::new().unwrap();
        assert_eq!(transformer.binding().name, "OrderSummary");
        // 5 zoned + 2 text + 3 * 3 packed
        assert_eq!(transformer.byte_length(), 16);
    }

    #[test]
    fn test_encode_known_bytes() {
        let transformer = ToHostTransformer::<OrderSummary>::new().unwrap();
        let host = transformer.transform(&sample()).unwrap();
        assert_eq!(
            host,
            vec![
                0xF0, 0xF0, 0xF1, 0xF2, 0xF3, // 00123 zoned unsigned
                0xD6, 0xD2, // "OK" in CP037
                0x00, 0x12, 0x5C, // +1.25 packed
                0x00, 0x00, 0x0C, // unpopulated occurrences pad to zero
                0x00, 0x00, 0x0C,
            ]
        );
    }

    #[test]
    fn test_roundtrip_populates_occurs_fully() {
        let to_host = ToHostTransformer::<OrderSummary>::new().unwrap();
        let from_host = FromHostTransformer::<OrderSummary>::new().unwrap();
        let decoded = from_host.transform(&to_host.transform(&sample()).unwrap()).unwrap();
        assert_eq!(decoded.order_no, 123);
        assert_eq!(decoded.status, "OK");
        // The OCCURS 3 field always comes back with exactly 3 elements.
        assert_eq!(decoded.amounts.len(), 3);
        assert_eq!(decoded.amounts[0], Decimal::from_str("1.25").unwrap());
        assert_eq!(decoded.amounts[1], Decimal::ZERO);
    }

    #[test]
    fn test_cardinality_enforced_at_encode() {
        let transformer = ToHostTransformer::<OrderSummary>::new().unwrap();
        let mut record = sample();
        record.amounts = vec![Decimal::ZERO; 4];
        assert!(matches!(
            transformer.transform(&record),
            Err(BindingError::CardinalityExceeded { .. })
        ));
    }

    #[test]
    fn test_text_overflow_rejected() {
        let transformer = ToHostTransformer::<OrderSummary>::new().unwrap();
        let mut record = sample();
        record.status = "TOO LONG".to_string();
        assert!(matches!(
            transformer.transform(&record),
            Err(BindingError::FieldOverflow { .. })
        ));
    }

    #[test]
    fn test_short_buffer_rejected() {
        let from_host = FromHostTransformer::<OrderSummary>::new().unwrap();
        assert!(matches!(
            from_host.transform(&[0u8; 4]),
            Err(BindingError::BufferTooShort {
                expected: 16,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let to_host = ToHostTransformer::<OrderSummary>::new().unwrap();
        let from_host = FromHostTransformer::<OrderSummary>::new().unwrap();
        let mut host = to_host.transform(&sample()).unwrap();
        host.extend_from_slice(&[0x40; 8]);
        assert_eq!(from_host.transform(&host).unwrap().order_no, 123);
    }

    #[test]
    fn test_out_of_sync_metadata_fails_construction() {
        assert!(matches!(
            ToHostTransformer::<BrokenRecord>::new(),
            Err(BindingError::Construction { .. })
        ));
    }

    #[test]
    fn test_empty_record_encodes_defaults() {
        let transformer = ToHostTransformer::<OrderSummary>::new().unwrap();
        let host = transformer.transform(&OrderSummary::default()).unwrap();
        assert_eq!(host.len(), 16);
        // Text pads to host spaces, numerics to zero.
        assert_eq!(&host[5..7], &[0x40, 0x40]);
        assert_eq!(&host[0..5], &[0xF0; 5]);
    }
}
