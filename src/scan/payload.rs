use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::error::DecodeError;

// Value type
//------------------------------------------------------------------------------

/// Semantic type the recognizer assigned to a barcode. Numeric codes follow
/// the recognizer's vocabulary, 0 through 12.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "RawValueType")]
pub enum ValueType {
    #[default]
    Unknown,
    ContactInfo,
    Email,
    Isbn,
    Phone,
    Product,
    Sms,
    Text,
    Url,
    Wifi,
    Geo,
    CalendarEvent,
    DriverLicense,
}

impl ValueType {
    pub const ALL: [ValueType; 13] = [
        Self::Unknown,
        Self::ContactInfo,
        Self::Email,
        Self::Isbn,
        Self::Phone,
        Self::Product,
        Self::Sms,
        Self::Text,
        Self::Url,
        Self::Wifi,
        Self::Geo,
        Self::CalendarEvent,
        Self::DriverLicense,
    ];

    /// Codes outside 0..=12 map to `Unknown`.
    pub fn from_code(code: i64) -> Self {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied()).unwrap_or_default()
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    /// Parses the snake_case name. Unknown names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "contact_info" => Self::ContactInfo,
            "email" => Self::Email,
            "isbn" => Self::Isbn,
            "phone" => Self::Phone,
            "product" => Self::Product,
            "sms" => Self::Sms,
            "text" | "plain_text" => Self::Text,
            "url" => Self::Url,
            "wifi" => Self::Wifi,
            "geo" => Self::Geo,
            "calendar_event" => Self::CalendarEvent,
            "driver_license" => Self::DriverLicense,
            _ => Self::Unknown,
        }
    }
}

// Recognizers report either the numeric code or the name
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValueType {
    Code(i64),
    Name(String),
}

impl From<RawValueType> for ValueType {
    fn from(raw: RawValueType) -> Self {
        match raw {
            RawValueType::Code(code) => Self::from_code(code),
            RawValueType::Name(name) => Self::from_name(&name),
        }
    }
}

// Structured fields
//------------------------------------------------------------------------------

/// Value of one structured field. Recognizers report some fields as integers
/// (email address type, Wi-Fi encryption type) and the rest as text.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Text(String),
    Null,
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Well-known structured field keys.
pub mod fields {
    pub const ADDRESS_TYPE: &str = "addressType";
    pub const ADDRESS: &str = "address";
    pub const SUBJECT: &str = "subject";
    pub const BODY: &str = "body";
    pub const URL: &str = "url";
    pub const TITLE: &str = "title";
    pub const ENCRYPTION_TYPE: &str = "encryptionType";
    pub const SSID: &str = "ssid";
    pub const PASSWORD: &str = "password";
}

// Decoded payload
//------------------------------------------------------------------------------

/// One barcode as reported by the external recognizer.
///
/// ```rust
/// use qrscan::{DecodedPayload, ValueType};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let payload = DecodedPayload::from_json(
///     r#"{"valueType": 8, "rawText": "https://example.com", "structuredFields": {"url": "https://example.com"}}"#,
/// )?;
/// assert_eq!(payload.value_type, ValueType::Url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecodedPayload {
    #[serde(alias = "valueTypeHint")]
    pub value_type: ValueType,
    pub raw_text: Option<String>,
    pub structured_fields: BTreeMap<String, FieldValue>,
}

impl DecodedPayload {
    pub fn new(value_type: ValueType) -> Self {
        Self { value_type, ..Self::default() }
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw_text = Some(raw.into());
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.structured_fields.insert(key.to_string(), value.into());
        self
    }

    /// Field as text. Integers render in decimal; null and missing are `None`.
    pub fn text_field(&self, key: &str) -> Option<String> {
        match self.structured_fields.get(key)? {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Int(i) => Some(i.to_string()),
            FieldValue::Null => None,
        }
    }

    /// Field as an integer. Text is parsed as decimal; anything else is `None`.
    pub fn int_field(&self, key: &str) -> Option<i64> {
        match self.structured_fields.get(key)? {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Null => None,
        }
    }
}
