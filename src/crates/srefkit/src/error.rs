//! Error types for srefkit
//!
//! Provides a unified error type for all application-level operations.

use std::fmt;

/// Result type alias for srefkit operations
pub type Result<T> = std::result::Result<T, SrefkitError>;

/// Main error type for srefkit operations
#[derive(Debug)]
pub enum SrefkitError {
    /// Configuration error
    Config(String),

    /// Settings persistence error
    Settings(String),

    /// Model artifact download error
    Download(String),

    /// Project file error
    Project(String),

    /// Export blocked or failed
    Export(String),

    /// Unsupported or unreadable image input
    Image(String),

    /// Analysis run failed
    Analysis(String),

    /// IO error
    Io(std::io::Error),

    /// Serialization/deserialization error
    Serde(serde_json::Error),

    /// Generic error with message
    Other(String),
}

impl fmt::Display for SrefkitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Settings(msg) => write!(f, "Settings error: {}", msg),
            Self::Download(msg) => write!(f, "Download error: {}", msg),
            Self::Project(msg) => write!(f, "Project error: {}", msg),
            Self::Export(msg) => write!(f, "Export error: {}", msg),
            Self::Image(msg) => write!(f, "Image error: {}", msg),
            Self::Analysis(msg) => write!(f, "Analysis error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Serde(err) => write!(f, "Serialization error: {}", err),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SrefkitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serde(err) => Some(err),
            _ => None,
        }
    }
}

// Conversions from common error types
impl From<std::io::Error> for SrefkitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SrefkitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}

impl From<anyhow::Error> for SrefkitError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for SrefkitError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

impl From<&str> for SrefkitError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}
