//! Error Types

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Provider-layer error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Generation did not finish within the allotted time
    #[error("Provider timed out after {0} seconds")]
    Timeout(u64),

    /// Provider returned an empty completion
    #[error("Provider returned no content")]
    EmptyCompletion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CoreError::Timeout(30).to_string(),
            "Provider timed out after 30 seconds"
        );
        assert_eq!(
            CoreError::ProviderUnavailable("connection refused".into()).to_string(),
            "Provider unavailable: connection refused"
        );
    }
}
