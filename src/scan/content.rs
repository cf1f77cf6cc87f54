use serde::{Deserialize, Serialize};

/// Meaning of one decoded barcode.
///
/// Absent fields stay `None` rather than defaulting to an empty string, and
/// `raw` is the recognizer's text untouched.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Content {
    Email {
        address_type: Option<String>,
        address: Option<String>,
        subject: Option<String>,
        body: Option<String>,
        raw: Option<String>,
    },
    Url {
        url: Option<String>,
        title: Option<String>,
        raw: Option<String>,
    },
    Wifi {
        encryption_type: Option<i64>,
        ssid: Option<String>,
        password: Option<String>,
        raw: Option<String>,
    },
    PlainText {
        raw: Option<String>,
    },
    Unrecognized {
        message: String,
        raw: String,
    },
}

impl Content {
    pub fn unrecognized(message: &str, raw: Option<&str>) -> Self {
        Self::Unrecognized { message: message.to_string(), raw: raw.unwrap_or_default().to_string() }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Email { raw, .. }
            | Self::Url { raw, .. }
            | Self::Wifi { raw, .. }
            | Self::PlainText { raw } => raw.as_deref(),
            Self::Unrecognized { raw, .. } => Some(raw),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized { .. })
    }
}

/// Text shown for a [`Content`] and the raw text offered for editing or
/// regenerating a symbol.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct FormattedResult {
    pub display: String,
    pub editable_raw: String,
}
