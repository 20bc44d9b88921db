//! Error handling for the bridge
//!
//! Every failure inside the bridge is one of these variants. The dispatcher
//! only ever shows callers two of them: `InvalidParam` becomes `-400`, and
//! everything else collapses into `-500`.

use std::fmt;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Status code reported for malformed commands and parameters
pub const STATUS_INVALID_PARAM: i32 = -400;
/// Status code reported for any other handler failure
pub const STATUS_INTERNAL_ERROR: i32 = -500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Malformed command envelope, missing or mistyped field, bad hex
    InvalidParam(String),
    /// Key parsing, signing or verification failures
    Crypto(String),
    /// Transport failures talking to a delegate node
    Network(String),
    /// JSON encoding/decoding errors
    Serialization(String),
    /// Configuration errors
    Config(String),
    /// File I/O errors
    Io(String),
    /// Invalid address format
    InvalidAddress(String),
    /// Anything the handler did not anticipate
    Internal(String),
}

impl BridgeError {
    /// Maps the error onto the response envelope status taxonomy.
    pub fn status_code(&self) -> i32 {
        match self {
            BridgeError::InvalidParam(_) => STATUS_INVALID_PARAM,
            _ => STATUS_INTERNAL_ERROR,
        }
    }

    pub fn is_invalid_param(&self) -> bool {
        matches!(self, BridgeError::InvalidParam(_))
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::InvalidParam(msg) => write!(f, "Invalid parameter: {msg}"),
            BridgeError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            BridgeError::Network(msg) => write!(f, "Network error: {msg}"),
            BridgeError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BridgeError::Config(msg) => write!(f, "Configuration error: {msg}"),
            BridgeError::Io(msg) => write!(f, "I/O error: {msg}"),
            BridgeError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
            BridgeError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

impl From<hex::FromHexError> for BridgeError {
    fn from(err: hex::FromHexError) -> Self {
        BridgeError::InvalidParam(format!("Invalid hex encoding: {err}"))
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        BridgeError::Network(err.to_string())
    }
}
