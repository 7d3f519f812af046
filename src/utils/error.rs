use std::fmt;

/// Result type alias for trunk CLI operations
pub type TrunkResult<T> = Result<T, TrunkError>;

/// Main error type for the trunk CLI
#[derive(Debug)]
pub enum TrunkError {
    /// IO-related errors
    Io(std::io::Error),
    /// Transport-level HTTP errors (DNS, timeout, TLS)
    Http(reqwest::Error),
    /// JSON serialization/deserialization errors
    Json(serde_json::Error),
    /// TOML parsing errors
    Toml(toml::de::Error),
    /// Configuration errors
    Config(String),
    /// Missing or invalid arguments, or a missing session token
    Usage(String),
    /// Registry errors with status code and classified message
    Api { status: u16, message: String },
    /// Local podspec lint failures
    Validation(String),
    /// Generic errors with custom message
    Other(String),
}

impl fmt::Display for TrunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrunkError::Io(e) => write!(f, "IO error: {}", e),
            TrunkError::Http(e) => write!(f, "HTTP error: {}", e),
            TrunkError::Json(e) => write!(f, "JSON error: {}", e),
            TrunkError::Toml(e) => write!(f, "TOML error: {}", e),
            TrunkError::Config(msg) => write!(f, "Configuration error: {}", msg),
            // User-facing conditions are surfaced verbatim.
            TrunkError::Usage(msg) => write!(f, "{}", msg),
            TrunkError::Api { message, .. } => write!(f, "{}", message),
            TrunkError::Validation(msg) => write!(f, "{}", msg),
            TrunkError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TrunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrunkError::Io(e) => Some(e),
            TrunkError::Http(e) => Some(e),
            TrunkError::Json(e) => Some(e),
            TrunkError::Toml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TrunkError {
    fn from(err: std::io::Error) -> Self {
        TrunkError::Io(err)
    }
}

impl From<reqwest::Error> for TrunkError {
    fn from(err: reqwest::Error) -> Self {
        TrunkError::Http(err)
    }
}

impl From<serde_json::Error> for TrunkError {
    fn from(err: serde_json::Error) -> Self {
        TrunkError::Json(err)
    }
}

impl From<toml::de::Error> for TrunkError {
    fn from(err: toml::de::Error) -> Self {
        TrunkError::Toml(err)
    }
}
