//! # qrscan
//!
//! Core of a QR scanning and generating app: interprets barcodes decoded by an
//! external recognizer and builds new QR symbols from text.
//!
//! ## Features
//!
//! - **Classification**: Turns a recognizer's decoded payload into typed content (email, URL, Wi-Fi, text)
//! - **Formatting**: Deterministic display text for every content kind
//! - **QR Code Generation**: Byte-mode encoding with Reed-Solomon error correction and penalty-based mask selection
//! - **Rendering**: Module matrix to RGB image with a quiet zone
//! - **Scan session**: Observable state machine where the last scan request wins
//!
//! ## Quick Start
//!
//! ### Generating a QR Code
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let matrix = qrscan::encode("Hello, World!")?;
//! let img = qrscan::render(&matrix, 512);
//! assert_eq!(img.dimensions(), (512, 512));
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrscan::{ECLevel, MaskPattern, QRBuilder, Renderer, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let matrix = QRBuilder::new(b"Hello, World!")
//!     .version(Version::try_from(2usize)?) // if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::M)           // if not provided, defaults to ECLevel::L
//!     .boost_ec_level(false)          // if not disabled, raises EC level while the version still fits
//!     .mask(MaskPattern::try_new(3)?) // if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! let img = Renderer::new().foreground([20, 20, 120]).quiet_zone(6).render(&matrix, 300);
//! # Ok(())
//! # }
//! ```
//!
//! ### Reading a scan result
//!
//! ```rust
//! use qrscan::{classify, format, fields, DecodedPayload, ValueType};
//!
//! let payload = DecodedPayload::new(ValueType::Url)
//!     .with_raw("https://example.com")
//!     .with_field(fields::URL, "https://example.com");
//! let res = format(&classify(&payload));
//! assert_eq!(res.display, "Title: \nURL: https://example.com");
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

pub mod builder;
pub(crate) mod common;
pub mod matrix;
pub mod render;
pub mod scan;
pub mod session;

pub use builder::QRBuilder;
pub use common::error::{DecodeError, EncodeError, EncodeResult, CANNOT_READ_MESSAGE};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Version};
pub use matrix::QrMatrix;
pub use render::{render, Renderer, MAX_IMAGE_SIZE, MAX_QUIET_ZONE, MIN_QUIET_ZONE};
pub use scan::{
    classify, classify_results, fields, format, Content, DecodedPayload, FieldValue,
    FormattedResult, ValueType,
};
pub use session::{ScanSession, ScanTicket, SessionConfig, SessionState};

/// Encodes `text` as a byte-mode QR symbol with default settings.
///
/// The smallest fitting version is chosen and the output is deterministic.
/// Empty text yields a version 1 symbol.
pub fn encode(text: &str) -> EncodeResult<QrMatrix> {
    QRBuilder::new(text.as_bytes()).build()
}

#[cfg(test)]
mod lib_tests {
    use super::{encode, EncodeError};

    #[test]
    fn test_encode() {
        let matrix = encode("").unwrap();
        assert_eq!(matrix.width(), 21);
        assert_eq!(encode("same").unwrap(), encode("same").unwrap());
        assert_eq!(
            encode(&"a".repeat(2954)).unwrap_err(),
            EncodeError::TooLarge { len: 2954, max: 2953 }
        );
    }
}
