//! Interpretation of barcodes decoded by an external recognizer.

pub mod classify;
pub mod content;
pub mod format;
pub mod payload;

pub use classify::{classify, classify_results, NOT_RECOGNIZED, NOT_SUPPORTED};
pub use content::{Content, FormattedResult};
pub use format::format;
pub use payload::{fields, DecodedPayload, FieldValue, ValueType};
