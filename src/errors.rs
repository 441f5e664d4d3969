//! Error types for the jackpot participation client
//!
//! One root error enum covering transport failures, backend rejections and
//! configuration problems, surfaced unchanged to the caller. The client
//! never recovers from these locally and never retries.

use std::fmt;

/// Root error type for all client operations
#[derive(Debug)]
pub enum LotteryError {
    /// Transport-level failure, no response was received
    Network(String),

    /// The backend rejected the request with an unexpected status
    Service { status: u16, message: String },

    /// A privileged call was made without a valid session token
    Unauthorized,

    /// Login was rejected
    InvalidCredentials,

    /// Registration input was rejected by the backend
    Validation(String),

    /// The payment backend declined the entry payment
    PaymentRejected(String),

    /// Client configuration errors
    Config(ConfigError),
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Missing required field: {0}")]
    MissingRequired(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl fmt::Display for LotteryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotteryError::Network(msg) => write!(f, "Network error: {}", msg),
            LotteryError::Service { status, message } => {
                write!(f, "Service error ({}): {}", status, message)
            }
            LotteryError::Unauthorized => write!(f, "Missing or rejected session token"),
            LotteryError::InvalidCredentials => write!(f, "Invalid credentials"),
            LotteryError::Validation(msg) => write!(f, "Validation error: {}", msg),
            LotteryError::PaymentRejected(msg) => write!(f, "Payment rejected: {}", msg),
            LotteryError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for LotteryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LotteryError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for LotteryError {
    fn from(e: ConfigError) -> Self {
        LotteryError::Config(e)
    }
}

impl From<reqwest::Error> for LotteryError {
    fn from(e: reqwest::Error) -> Self {
        LotteryError::Network(e.to_string())
    }
}

/// Convenience type alias for Results
pub type LotteryResult<T> = Result<T, LotteryError>;

impl LotteryError {
    /// True when the error denotes a definitive backend rejection rather
    /// than an unknown transport outcome.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, LotteryError::Network(_))
    }
}
