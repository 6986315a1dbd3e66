use core::str::Utf8Error;

/// Coarse classification of [`SessionIdError`], for callers that only need
/// to decide how to treat a rejected identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidEncoding,
    MalformedText,
    TruncatedData,
    TrailingBytes,
    EncodingTooLarge,
}

/// Errors from session identifier encode/decode operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionIdError {
    #[error("extension block is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("field at offset {offset} is not valid UTF-8: {source}")]
    MalformedText {
        offset: usize,
        #[source]
        source: Utf8Error,
    },

    #[error("truncated extension block: need {needed} bytes at offset {offset}, {available} available")]
    TruncatedData { offset: usize, needed: usize, available: usize },

    #[error("{0} unexpected bytes after the last extension entry")]
    TrailingBytes(usize),

    #[error("{what} length {len} exceeds the 16-bit prefix limit")]
    EncodingTooLarge { what: &'static str, len: usize },
}

impl SessionIdError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEncoding(_) => ErrorKind::InvalidEncoding,
            Self::MalformedText { .. } => ErrorKind::MalformedText,
            Self::TruncatedData { .. } => ErrorKind::TruncatedData,
            Self::TrailingBytes(_) => ErrorKind::TrailingBytes,
            Self::EncodingTooLarge { .. } => ErrorKind::EncodingTooLarge,
        }
    }

    /// Returns `true` when the error came from decoding untrusted input, i.e.
    /// the identifier should be treated as malformed or tampered with.
    pub fn is_tampered(&self) -> bool {
        !matches!(self, Self::EncodingTooLarge { .. })
    }
}

pub type Result<T, E = SessionIdError> = core::result::Result<T, E>;
