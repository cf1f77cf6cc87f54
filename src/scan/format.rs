use super::content::{Content, FormattedResult};

/// Renders `content` for display. Absent values render as empty segments and
/// the editable text is the raw payload, or empty when there is none.
pub fn format(content: &Content) -> FormattedResult {
    let display = match content {
        Content::Email { address_type, address, subject, body, .. } => format!(
            "Type: {}\nTo: {}\nSubject: {}\nBody: {}",
            seg(address_type),
            seg(address),
            seg(subject),
            seg(body)
        ),
        Content::Url { url, title, .. } => format!("Title: {}\nURL: {}", seg(title), seg(url)),
        Content::Wifi { encryption_type, ssid, password, .. } => format!(
            "Encryption Type: {}\nSSID: {}\nPassword: {}",
            encryption_type.map(|e| e.to_string()).unwrap_or_default(),
            seg(ssid),
            seg(password)
        ),
        Content::PlainText { raw } => format!("Text: {}", seg(raw)),
        Content::Unrecognized { message, .. } => message.clone(),
    };
    let editable_raw = content.raw().unwrap_or_default().to_string();
    FormattedResult { display, editable_raw }
}

fn seg(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}
