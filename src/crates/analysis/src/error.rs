//! Error types for analysis backend implementations.

use thiserror::Error;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while running an analysis against a backend.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// API key not found in environment.
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Backend returned something that does not parse into a specification.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local engine unreachable (e.g. inference server not running).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Local engine accepted the request but inference failed.
    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    /// General provider error.
    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl AnalysisError {
    /// Check if this error is due to authentication.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::AuthenticationError(_) | AnalysisError::ApiKeyNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_classification() {
        assert!(AnalysisError::ApiKeyNotFound("CLAUDE_API_KEY".into()).is_auth_error());
        assert!(AnalysisError::AuthenticationError("401".into()).is_auth_error());
        assert!(!AnalysisError::InferenceFailed("oom".into()).is_auth_error());
    }
}
