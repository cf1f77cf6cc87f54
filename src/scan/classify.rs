use tracing::trace;

use super::content::Content;
use super::payload::{fields, DecodedPayload, ValueType};

/// Maps a decoded barcode to its [`Content`]. Total: every input yields a
/// variant, unknown or unsupported types become [`Content::Unrecognized`].
pub fn classify(payload: &DecodedPayload) -> Content {
    let raw = payload.raw_text.clone();
    let content = match payload.value_type {
        ValueType::Email => Content::Email {
            address_type: payload.text_field(fields::ADDRESS_TYPE),
            address: payload.text_field(fields::ADDRESS),
            subject: payload.text_field(fields::SUBJECT),
            body: payload.text_field(fields::BODY),
            raw,
        },
        ValueType::Url => Content::Url {
            url: payload.text_field(fields::URL),
            title: payload.text_field(fields::TITLE),
            raw,
        },
        ValueType::Wifi => Content::Wifi {
            encryption_type: payload.int_field(fields::ENCRYPTION_TYPE),
            ssid: payload.text_field(fields::SSID),
            password: payload.text_field(fields::PASSWORD),
            raw,
        },
        ValueType::Text => Content::PlainText { raw },
        ValueType::ContactInfo
        | ValueType::Isbn
        | ValueType::Phone
        | ValueType::Product
        | ValueType::Sms
        | ValueType::Geo
        | ValueType::CalendarEvent
        | ValueType::DriverLicense => Content::unrecognized(NOT_SUPPORTED, raw.as_deref()),
        ValueType::Unknown => Content::unrecognized(NOT_RECOGNIZED, raw.as_deref()),
    };
    trace!(value_type = ?payload.value_type, recognized = content.is_recognized(), "Classified payload");
    content
}

/// Classifies the result of one recognizer run. The last barcode wins when
/// several are reported; none yields "not recognized" with empty raw text.
pub fn classify_results(payloads: &[DecodedPayload]) -> Content {
    match payloads.last() {
        Some(payload) => classify(payload),
        None => Content::unrecognized(NOT_RECOGNIZED, None),
    }
}


// Global constants
//------------------------------------------------------------------------------

pub const NOT_RECOGNIZED: &str = "not recognized";

pub const NOT_SUPPORTED: &str = "not supported yet";
