//! Error types for vsrc

use thiserror::Error;

/// Main error type for vsrc operations
#[derive(Debug, Error)]
pub enum VsrcError {
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("No playable source found")]
    NoSourceFound,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl VsrcError {
    /// Check if error is retryable
    ///
    /// Decoding is a pure function of its inputs, so decoder errors are never
    /// retryable; only the network collaborators can recover on a second try.
    pub fn is_retryable(&self) -> bool {
        match self {
            VsrcError::Http(err) => match err.status() {
                Some(status) => {
                    status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
                }
                None => err.is_timeout() || err.is_connect() || err.is_request(),
            },
            VsrcError::Timeout(_) => true,
            _ => false,
        }
    }

    /// Check if error came out of the decoding engine
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            VsrcError::InvalidEncoding(_) | VsrcError::MalformedPayload(_) | VsrcError::EmptyInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_errors_are_not_retryable() {
        let errors = [
            VsrcError::MalformedPayload("bad prefix".to_string()),
            VsrcError::EmptyInput("ciphertext".to_string()),
        ];
        for error in errors {
            assert!(error.is_decode_error());
            assert!(!error.is_retryable());
        }
    }

    #[test]
    fn test_timeout_is_retryable() {
        let error = VsrcError::Timeout("server key".to_string());
        assert!(error.is_retryable());
        assert!(!error.is_decode_error());
    }

    #[test]
    fn test_base64_error_converts() {
        use base64::Engine;
        let err = base64::engine::general_purpose::STANDARD
            .decode("@@@")
            .unwrap_err();
        let error: VsrcError = err.into();
        assert!(matches!(error, VsrcError::InvalidEncoding(_)));
        assert!(error.to_string().starts_with("Invalid encoding"));
    }

    #[test]
    fn test_key_not_found_classification() {
        let error = VsrcError::KeyNotFound("key".to_string());
        assert!(!error.is_retryable());
        assert!(!error.is_decode_error());
    }
}
