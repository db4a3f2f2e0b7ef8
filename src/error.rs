//! ═══════════════════════════════════════════════════════════════════════════════
//! ERROR — Unified Error Type for Neuroswarm
//! ═══════════════════════════════════════════════════════════════════════════════
//! Centralized error handling. No scattered .unwrap() or .expect() calls.
//! ═══════════════════════════════════════════════════════════════════════════════

use std::fmt;

/// The unified error type for the neuroswarm crate
#[derive(Debug)]
pub enum SwarmError {
    /// I/O error (recording files, config files)
    Io(std::io::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
    /// Configuration error
    Config(ConfigError),
    /// Sample stream error (registration, playback source)
    Stream(String),
    /// Internal error (should not happen)
    Internal(String),
}

impl std::error::Error for SwarmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SwarmError::Io(e) => Some(e),
            SwarmError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for SwarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwarmError::Io(e) => write!(f, "I/O error: {}", e),
            SwarmError::Json(e) => write!(f, "JSON error: {}", e),
            SwarmError::Config(e) => write!(f, "Configuration error: {}", e),
            SwarmError::Stream(msg) => write!(f, "Stream error: {}", msg),
            SwarmError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<std::io::Error> for SwarmError {
    fn from(err: std::io::Error) -> Self {
        SwarmError::Io(err)
    }
}

impl From<serde_json::Error> for SwarmError {
    fn from(err: serde_json::Error) -> Self {
        SwarmError::Json(err)
    }
}

/// Configuration-specific errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Invalid value
    InvalidValue { field: String, message: String },
    /// Config file not found
    FileNotFound(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{}': {}", field, message)
            }
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for SwarmError {
    fn from(err: ConfigError) -> Self {
        SwarmError::Config(err)
    }
}

/// Type alias for Result with SwarmError
pub type SwarmResult<T> = Result<T, SwarmError>;
