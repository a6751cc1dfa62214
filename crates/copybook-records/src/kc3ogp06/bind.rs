//! Binding descriptors and host transformers for the OGP06 referral
//! data record.

use copybook_binding::{
    BindingError, CobolContext, CobolType, FieldBinding, FieldMeta, FromHostTransformer,
    HostRecord, HostValue, RecordBinding, Result, ToHostTransformer,
};

use super::{Ogp06Diagnosis, Ogp06ReferralData};

fn missing(field: &str) -> BindingError {
    BindingError::ValueShape {
        field: field.to_string(),
        expected: "more child values".to_string(),
    }
}

impl HostRecord for Ogp06ReferralData {
    fn binding() -> Result<RecordBinding> {
        Ok(RecordBinding {
            name: "Ogp06ReferralData",
            cobol_name: "OGP06-REFERRAL-DATA",
            fields: vec![
                FieldBinding::elementary(FieldMeta {
                    cobol_name: "OGP06-REFERRAL-ID",
                    cobol_type: CobolType::AlphanumericItem,
                    level: 5,
                    signed: false,
                    total_digits: 0,
                    fraction_digits: 0,
                    min_occurs: 1,
                    max_occurs: 1,
                    picture: "X(10)",
                    usage: "DISPLAY",
                    srce_line: 4,
                }),
                FieldBinding::elementary(FieldMeta {
                    cobol_name: "OGP06-PROVIDER-NO",
                    cobol_type: CobolType::ZonedDecimalItem,
                    level: 5,
                    signed: false,
                    total_digits: 8,
                    fraction_digits: 0,
                    min_occurs: 1,
                    max_occurs: 1,
                    picture: "9(8)",
                    usage: "DISPLAY",
                    srce_line: 5,
                }),
                FieldBinding::elementary(FieldMeta {
                    cobol_name: "OGP06-REFERRAL-DATE",
                    cobol_type: CobolType::AlphanumericItem,
                    level: 5,
                    signed: false,
                    total_digits: 0,
                    fraction_digits: 0,
                    min_occurs: 1,
                    max_occurs: 1,
                    picture: "X(8)",
                    usage: "DISPLAY",
                    srce_line: 6,
                }),
                FieldBinding::elementary(FieldMeta {
                    cobol_name: "OGP06-URGENCY-CD",
                    cobol_type: CobolType::AlphanumericItem,
                    level: 5,
                    signed: false,
                    total_digits: 0,
                    fraction_digits: 0,
                    min_occurs: 1,
                    max_occurs: 1,
                    picture: "X",
                    usage: "DISPLAY",
                    srce_line: 7,
                }),
                FieldBinding::elementary(FieldMeta {
                    cobol_name: "OGP06-CASE-SEQ",
                    cobol_type: CobolType::BinaryItem,
                    level: 5,
                    signed: true,
                    total_digits: 4,
                    fraction_digits: 0,
                    min_occurs: 1,
                    max_occurs: 1,
                    picture: "S9(4)",
                    usage: "COMP",
                    srce_line: 8,
                }),
                FieldBinding::elementary(FieldMeta {
                    cobol_name: "OGP06-VISITS-AUTH",
                    cobol_type: CobolType::PackedDecimalItem,
                    level: 5,
                    signed: true,
                    total_digits: 3,
                    fraction_digits: 0,
                    min_occurs: 1,
                    max_occurs: 1,
                    picture: "S9(3)",
                    usage: "COMP-3",
                    srce_line: 9,
                }),
                FieldBinding::group(
                    FieldMeta {
                        cobol_name: "OGP06-DIAGNOSIS",
                        cobol_type: CobolType::GroupItem,
                        level: 5,
                        signed: false,
                        total_digits: 0,
                        fraction_digits: 0,
                        min_occurs: 5,
                        max_occurs: 5,
                        picture: "",
                        usage: "",
                        srce_line: 10,
                    },
                    vec![
                        FieldBinding::elementary(FieldMeta {
                            cobol_name: "OGP06-DIAG-CD",
                            cobol_type: CobolType::AlphanumericItem,
                            level: 10,
                            signed: false,
                            total_digits: 0,
                            fraction_digits: 0,
                            min_occurs: 1,
                            max_occurs: 1,
                            picture: "X(7)",
                            usage: "DISPLAY",
                            srce_line: 11,
                        }),
                        FieldBinding::elementary(FieldMeta {
                            cobol_name: "OGP06-DIAG-RANK",
                            cobol_type: CobolType::ZonedDecimalItem,
                            level: 10,
                            signed: false,
                            total_digits: 2,
                            fraction_digits: 0,
                            min_occurs: 1,
                            max_occurs: 1,
                            picture: "9(2)",
                            usage: "DISPLAY",
                            srce_line: 12,
                        }),
                    ],
                ),
                FieldBinding::elementary(FieldMeta {
                    cobol_name: "OGP06-AUTH-AMOUNT",
                    cobol_type: CobolType::PackedDecimalItem,
                    level: 5,
                    signed: true,
                    total_digits: 9,
                    fraction_digits: 2,
                    min_occurs: 1,
                    max_occurs: 1,
                    picture: "S9(7)V99",
                    usage: "PACKED-DECIMAL",
                    srce_line: 14,
                }),
            ],
        })
    }

    fn to_host_value(&self) -> HostValue {
        HostValue::Group(vec![
            HostValue::from(self.ogp06_referral_id.as_str()),
            HostValue::from(self.ogp06_provider_no),
            HostValue::from(self.ogp06_referral_date.as_str()),
            HostValue::from(self.ogp06_urgency_cd.as_str()),
            HostValue::from(self.ogp06_case_seq),
            HostValue::from(self.ogp06_visits_auth),
            HostValue::Array(
                self.ogp06_diagnosis
                    .as_deref()
                    .unwrap_or(&[])
                    .iter()
                    .map(Ogp06Diagnosis::to_host_value)
                    .collect(),
            ),
            HostValue::from(self.ogp06_auth_amount),
        ])
    }

    fn from_host_value(value: HostValue) -> Result<Self> {
        let mut children = value.into_group("OGP06-REFERRAL-DATA")?.into_iter();
        let mut next = |field: &'static str| children.next().ok_or_else(|| missing(field));
        let referral_id = next("OGP06-REFERRAL-ID")?.into_text("OGP06-REFERRAL-ID")?;
        let provider_no = next("OGP06-PROVIDER-NO")?.into_i32("OGP06-PROVIDER-NO")?;
        let referral_date = next("OGP06-REFERRAL-DATE")?.into_text("OGP06-REFERRAL-DATE")?;
        let urgency_cd = next("OGP06-URGENCY-CD")?.into_text("OGP06-URGENCY-CD")?;
        let case_seq = next("OGP06-CASE-SEQ")?.into_i16("OGP06-CASE-SEQ")?;
        let visits_auth = next("OGP06-VISITS-AUTH")?.into_i16("OGP06-VISITS-AUTH")?;
        let diagnosis_values = next("OGP06-DIAGNOSIS")?.into_array("OGP06-DIAGNOSIS")?;
        let auth_amount = next("OGP06-AUTH-AMOUNT")?.into_number("OGP06-AUTH-AMOUNT")?;

        let mut diagnosis = Vec::with_capacity(diagnosis_values.len());
        for entry in diagnosis_values {
            diagnosis.push(Ogp06Diagnosis::from_host_value(entry)?);
        }

        Ok(Self {
            ogp06_referral_id: referral_id,
            ogp06_provider_no: provider_no,
            ogp06_referral_date: referral_date,
            ogp06_urgency_cd: urgency_cd,
            ogp06_case_seq: case_seq,
            ogp06_visits_auth: visits_auth,
            ogp06_diagnosis: Some(diagnosis),
            ogp06_auth_amount: auth_amount,
        })
    }
}

impl Ogp06Diagnosis {
    pub(crate) fn to_host_value(&self) -> HostValue {
        HostValue::Group(vec![
            HostValue::from(self.ogp06_diag_cd.as_str()),
            HostValue::from(self.ogp06_diag_rank),
        ])
    }

    pub(crate) fn from_host_value(value: HostValue) -> Result<Self> {
        let mut children = value.into_group("OGP06-DIAGNOSIS")?.into_iter();
        Ok(Self {
            ogp06_diag_cd: children
                .next()
                .ok_or_else(|| missing("OGP06-DIAG-CD"))?
                .into_text("OGP06-DIAG-CD")?,
            ogp06_diag_rank: children
                .next()
                .ok_or_else(|| missing("OGP06-DIAG-RANK"))?
                .into_i16("OGP06-DIAG-RANK")?,
        })
    }
}

/// Transforms a [`Ogp06ReferralData`] data object to mainframe host data.
///
/// Typical use:
///
/// ```
/// use copybook_records::kc3ogp06::bind::Ogp06ReferralDataToHostTransformer;
/// use copybook_records::kc3ogp06::Ogp06ReferralData;
///
/// let transformer = Ogp06ReferralDataToHostTransformer::new().unwrap();
/// let host = transformer.transform(&Ogp06ReferralData::default()).unwrap();
/// assert_eq!(host.len(), 81);
/// ```
#[derive(Debug)]
pub struct Ogp06ReferralDataToHostTransformer {
    inner: ToHostTransformer<Ogp06ReferralData>,
}

impl Ogp06ReferralDataToHostTransformer {
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
    pub fn transform(&self, value: &Ogp06ReferralData) -> Result<Vec<u8>> {
        self.inner.transform(value)
    }
}

/// Transforms mainframe host data to a [`Ogp06ReferralData`] data object.
#[derive(Debug)]
pub struct Ogp06ReferralDataFromHostTransformer {
    inner: FromHostTransformer<Ogp06ReferralData>,
}

impl Ogp06ReferralDataFromHostTransformer {
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
    pub fn transform(&self, host: &[u8]) -> Result<Ogp06ReferralData> {
        self.inner.transform(host)
    }
}
