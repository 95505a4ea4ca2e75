use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum LodestoneError {
    // Network errors
    #[error("Network timeout: {0}")]
    Timeout(String),

    #[error("Rate limited: retry after {0}s")]
    RateLimited(u64),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Empty response body from {0}")]
    EmptyResponse(String),

    // Lookup errors
    #[error("Does not exist: {0}")]
    DoesNotExist(String),

    // Extraction errors
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Cannot coerce {field}: {value:?}")]
    CoercionError { field: String, value: String },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    // Input errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // IO errors
    #[error("IO error: {0}")]
    IoError(String),
}

impl LodestoneError {
    /// Build a coercion failure for `field` carrying the offending raw text.
    pub fn coercion(field: &str, value: &str) -> Self {
        LodestoneError::CoercionError {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// True for the errors that mean "the requested identity is not there".
    pub fn is_does_not_exist(&self) -> bool {
        matches!(self, LodestoneError::DoesNotExist(_))
    }
}

impl From<wreq::Error> for LodestoneError {
    fn from(err: wreq::Error) -> Self {
        if err.is_timeout() {
            LodestoneError::Timeout(err.to_string())
        } else if err.is_connect() {
            LodestoneError::NetworkError(format!("Connection failed: {}", err))
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                404 | 410 => LodestoneError::DoesNotExist(err.to_string()),
                429 => LodestoneError::RateLimited(60), // Default retry after 60s
                _ => LodestoneError::NetworkError(err.to_string()),
            }
        } else {
            LodestoneError::NetworkError(err.to_string())
        }
    }
}

impl From<url::ParseError> for LodestoneError {
    fn from(err: url::ParseError) -> Self {
        LodestoneError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for LodestoneError {
    fn from(err: std::io::Error) -> Self {
        LodestoneError::IoError(err.to_string())
    }
}

/// Type alias for Result with LodestoneError
pub type Result<T> = std::result::Result<T, LodestoneError>;
