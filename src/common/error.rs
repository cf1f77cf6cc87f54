// Encode error
//------------------------------------------------------------------------------

/// Failure to build a QR symbol. Returned as a value; never fatal.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum EncodeError {
    #[error("Data too long: {len} bytes exceed the capacity of {max} bytes")]
    TooLarge { len: usize, max: usize },

    /// Reserved for non-byte modes; byte mode accepts every input.
    #[error("Unsupported characters for the selected mode")]
    UnsupportedCharacters,

    #[error("Invalid version: {0}")]
    InvalidVersion(usize),

    #[error("Invalid masking pattern: {0}")]
    InvalidMask(u8),
}

pub type EncodeResult<T> = Result<T, EncodeError>;

// Decode error
//------------------------------------------------------------------------------

/// Failure reported by the external recognizer. Surfaces as `SessionState::Failed`.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum DecodeError {
    #[error("Recognizer failed: {0}")]
    Recognizer(String),

    #[error("Source image unreadable: {0}")]
    SourceUnreadable(String),
}

impl DecodeError {
    /// Generic text shown to the user for every decode failure.
    pub fn user_message(&self) -> &'static str {
        CANNOT_READ_MESSAGE
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        Self::SourceUnreadable(err.to_string())
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Recognizer(format!("Malformed payload: {err}"))
    }
}

pub const CANNOT_READ_MESSAGE: &str = "The selected QR code cannot be read";
