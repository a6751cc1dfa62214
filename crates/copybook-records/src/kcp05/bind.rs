//! Binding descriptors and host transformers for the KCP05 profile
//! record.
//!
//! The metadata below mirrors the copybook text item by item and must
//! not drift from it; host decoding silently misaligns fields when it
//! does.

use copybook_binding::{
    BindingError, CobolContext, CobolType, FieldBinding, FieldMeta, FromHostTransformer,
    HostRecord, HostValue, RecordBinding, Result, ToHostTransformer,
};

use super::{Kcp05V10Profile, Kcp05V10Profile1St7Dgts, Kcp05V10Profile2Nd7Dgts};

fn missing(field: &str) -> BindingError {
    BindingError::ValueShape {
        field: field.to_string(),
        expected: "more child values".to_string(),
    }
}

impl HostRecord for Kcp05V10Profile {
    fn binding() -> Result<RecordBinding> {
        Ok(RecordBinding {
            name: "Kcp05V10Profile",
            cobol_name: "KCP05V10-PROFILE",
            fields: vec![
                FieldBinding::elementary(FieldMeta {
                    cobol_name: "KCP05V10-CUST-ID",
                    cobol_type: CobolType::ZonedDecimalItem,
                    level: 5,
                    signed: false,
                    total_digits: 9,
                    fraction_digits: 0,
                    min_occurs: 1,
                    max_occurs: 1,
                    picture: "9(9)",
                    usage: "DISPLAY",
                    srce_line: 5,
                }),
                FieldBinding::elementary(FieldMeta {
                    cobol_name: "KCP05V10-CUST-NAME",
                    cobol_type: CobolType::AlphanumericItem,
                    level: 5,
                    signed: false,
                    total_digits: 0,
                    fraction_digits: 0,
                    min_occurs: 1,
                    max_occurs: 1,
                    picture: "X(30)",
                    usage: "DISPLAY",
                    srce_line: 6,
                }),
                FieldBinding::group(
                    FieldMeta {
                        cobol_name: "KCP05V10-PROFILE-1ST-7-DGTS",
                        cobol_type: CobolType::GroupItem,
                        level: 5,
                        signed: false,
                        total_digits: 0,
                        fraction_digits: 0,
                        min_occurs: 1,
                        max_occurs: 1,
                        picture: "",
                        usage: "",
                        srce_line: 33,
                    },
                    vec![FieldBinding::elementary(FieldMeta {
                        cobol_name: "KCP05V10-PROF-00-49",
                        cobol_type: CobolType::PackedDecimalItem,
                        level: 9,
                        signed: true,
                        total_digits: 7,
                        fraction_digits: 0,
                        min_occurs: 50,
                        max_occurs: 50,
                        picture: "S9(7)",
                        usage: "PACKED-DECIMAL",
                        srce_line: 34,
                    })],
                ),
                FieldBinding::group(
                    FieldMeta {
                        cobol_name: "KCP05V10-PROFILE-2ND-7-DGTS",
                        cobol_type: CobolType::GroupItem,
                        level: 5,
                        signed: false,
                        total_digits: 0,
                        fraction_digits: 0,
                        min_occurs: 1,
                        max_occurs: 1,
                        picture: "",
                        usage: "",
                        srce_line: 35,
                    },
                    vec![FieldBinding::elementary(FieldMeta {
                        cobol_name: "KCP05V10-PROF-50-99",
                        cobol_type: CobolType::PackedDecimalItem,
                        level: 9,
                        signed: true,
                        total_digits: 7,
                        fraction_digits: 0,
                        min_occurs: 50,
                        max_occurs: 50,
                        picture: "S9(7)",
                        usage: "PACKED-DECIMAL",
                        srce_line: 36,
                    })],
                ),
            ],
        })
    }

    fn to_host_value(&self) -> HostValue {
        HostValue::Group(vec![
            HostValue::from(self.kcp05_v10_cust_id),
            HostValue::from(self.kcp05_v10_cust_name.as_str()),
            self.kcp05_v10_profile_1st_7_dgts.to_host_value(),
            self.kcp05_v10_profile_2nd_7_dgts.to_host_value(),
        ])
    }

    fn from_host_value(value: HostValue) -> Result<Self> {
        let mut children = value.into_group("KCP05V10-PROFILE")?.into_iter();
        Ok(Self {
            kcp05_v10_cust_id: children
                .next()
                .ok_or_else(|| missing("KCP05V10-CUST-ID"))?
                .into_i32("KCP05V10-CUST-ID")?,
            kcp05_v10_cust_name: children
                .next()
                .ok_or_else(|| missing("KCP05V10-CUST-NAME"))?
                .into_text("KCP05V10-CUST-NAME")?,
            kcp05_v10_profile_1st_7_dgts: Kcp05V10Profile1St7Dgts::from_host_value(
                children
                    .next()
                    .ok_or_else(|| missing("KCP05V10-PROFILE-1ST-7-DGTS"))?,
            )?,
            kcp05_v10_profile_2nd_7_dgts: Kcp05V10Profile2Nd7Dgts::from_host_value(
                children
                    .next()
                    .ok_or_else(|| missing("KCP05V10-PROFILE-2ND-7-DGTS"))?,
            )?,
        })
    }
}

impl Kcp05V10Profile1St7Dgts {
    pub(crate) fn to_host_value(&self) -> HostValue {
        HostValue::Group(vec![HostValue::Array(
            self.kcp05_v10_prof_00_49
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .copied()
                .map(HostValue::from)
                .collect(),
        )])
    }

    pub(crate) fn from_host_value(value: HostValue) -> Result<Self> {
        let mut children = value.into_group("KCP05V10-PROFILE-1ST-7-DGTS")?.into_iter();
        let elements = children
            .next()
            .ok_or_else(|| missing("KCP05V10-PROF-00-49"))?
            .into_array("KCP05V10-PROF-00-49")?;
        let mut list = Vec::with_capacity(elements.len());
        for element in elements {
            list.push(element.into_i32("KCP05V10-PROF-00-49")?);
        }
        Ok(Self {
            kcp05_v10_prof_00_49: Some(list),
        })
    }
}

impl Kcp05V10Profile2Nd7Dgts {
    pub(crate) fn to_host_value(&self) -> HostValue {
        HostValue::Group(vec![HostValue::Array(
            self.kcp05_v10_prof_50_99
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .copied()
                .map(HostValue::from)
                .collect(),
        )])
    }

    pub(crate) fn from_host_value(value: HostValue) -> Result<Self> {
        let mut children = value.into_group("KCP05V10-PROFILE-2ND-7-DGTS")?.into_iter();
        let elements = children
            .next()
            .ok_or_else(|| missing("KCP05V10-PROF-50-99"))?
            .into_array("KCP05V10-PROF-50-99")?;
        let mut list = Vec::with_capacity(elements.len());
        for element in elements {
            list.push(element.into_i32("KCP05V10-PROF-50-99")?);
        }
        Ok(Self {
            kcp05_v10_prof_50_99: Some(list),
        })
    }
}

/// Transforms a [`Kcp05V10Profile`] data object to mainframe host data.
///
/// Typical use:
///
/// ```
/// use copybook_records::kcp05::bind::Kcp05V10ProfileToHostTransformer;
/// use copybook_records::kcp05::Kcp05V10Profile;
///
/// let transformer = Kcp05V10ProfileToHostTransformer::new().unwrap();
/// let host = transformer.transform(&Kcp05V10Profile::default()).unwrap();
/// assert_eq!(host.len(), 439);
/// ```
#[derive(Debug)]
pub struct Kcp05V10ProfileToHostTransformer {
    inner: ToHostTransformer<Kcp05V10Profile>,
}

impl Kcp05V10ProfileToHostTransformer {
    /// Create a transformer using default COBOL parameters.
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: ToHostTransformer::new()?,
        })
    }

    /// Create a transformer using a specific COBOL parameter set.
    pub fn with_context(context: CobolContext) -> Result<Self> {
        Ok(Self {
            inner: ToHostTransformer::with_context(context)?,
        })
    }

    /// Create a transformer using a specific host character set while
    /// other COBOL parameters keep their defaults.
    pub fn with_charset(host_charset: &str) -> Result<Self> {
        Ok(Self {
            inner: ToHostTransformer::with_charset(host_charset)?,
        })
    }

    /// The binding descriptor for the record type.
    pub fn binding(&self) -> &RecordBinding {
        self.inner.binding()
    }

    /// Encode a record into host bytes.
    pub fn transform(&self, value: &Kcp05V10Profile) -> Result<Vec<u8>> {
        self.inner.transform(value)
    }
}

/// Transforms mainframe host data to a [`Kcp05V10Profile`] data object.
#[derive(Debug)]
pub struct Kcp05V10ProfileFromHostTransformer {
    inner: FromHostTransformer<Kcp05V10Profile>,
}

impl Kcp05V10ProfileFromHostTransformer {
    /// Create a transformer using default COBOL parameters.
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: FromHostTransformer::new()?,
        })
    }

    /// Create a transformer using a specific COBOL parameter set.
    pub fn with_context(context: CobolContext) -> Result<Self> {
        Ok(Self {
            inner: FromHostTransformer::with_context(context)?,
        })
    }

    /// Create a transformer using a specific host character set while
    /// other COBOL parameters keep their defaults.
    pub fn with_charset(host_charset: &str) -> Result<Self> {
        Ok(Self {
            inner: FromHostTransformer::with_charset(host_charset)?,
        })
    }

    /// The binding descriptor for the record type.
    pub fn binding(&self) -> &RecordBinding {
        self.inner.binding()
    }

    /// Decode host bytes into a record.
    pub fn transform(&self, host: &[u8]) -> Result<Kcp05V10Profile> {
        self.inner.transform(host)
    }
}
