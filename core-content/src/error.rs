//! # Content Error Types

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors raised while resolving surah content.
#[derive(Error, Debug)]
pub enum ContentError {
    /// Surah number outside `1..=114`. Raised before any I/O.
    #[error("Invalid surah number: {0} (must be between 1 and 114)")]
    InvalidSurahNumber(u16),

    /// Every source tier failed for this surah.
    #[error("All content sources failed for surah {surah_number}: {last_error}")]
    SourceUnavailable { surah_number: u16, last_error: String },

    /// The HTTP bridge could not complete the request.
    #[error("HTTP error: {0}")]
    Http(#[from] BridgeError),

    /// The server answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The response parsed but contradicts itself.
    #[error("Inconsistent content: {0}")]
    Inconsistent(String),
}

impl ContentError {
    /// Whether invoking the same load again may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ContentError::InvalidSurahNumber(_))
    }

    /// Message suitable for showing next to a retry button.
    pub fn user_message(&self) -> String {
        match self {
            ContentError::InvalidSurahNumber(n) => {
                format!("Surah {} does not exist. Please choose a surah from 1 to 114.", n)
            }
            _ => "Unable to load this surah. Please check your connection and try again."
                .to_string(),
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Parse(err.to_string())
    }
}

/// Result type for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_number_is_not_retryable() {
        assert!(!ContentError::InvalidSurahNumber(0).is_retryable());
        assert!(ContentError::SourceUnavailable {
            surah_number: 2,
            last_error: "timeout".to_string(),
        }
        .is_retryable());
    }

    #[test]
    fn bridge_errors_convert() {
        let err: ContentError = BridgeError::OperationFailed("refused".to_string()).into();
        assert!(matches!(err, ContentError::Http(_)));
        assert!(err.user_message().contains("try again"));
    }
}
