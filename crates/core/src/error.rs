//! Error types for the Shrike domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Provider and tool
//! failures get their own enums; the top-level `Error` is what the agent
//! surfaces to callers.

use thiserror::Error;

/// The top-level error type for all Shrike operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// `call`/`call_stream` was invoked before `start` seeded the
    /// conversation (or after `stop` cleared it).
    #[error("Agent not started: call start() with a system prompt first")]
    NotStarted,

    /// The model kept requesting tools past the configured hop limit.
    /// The conversation stays committed through the last resolved hop.
    #[error("Tool resolution loop exceeded {hops} hops")]
    ToolLoopExceeded { hops: u32 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether retrying the same turn is reasonable.
    ///
    /// Transient provider conditions (network, rate limits, timeouts,
    /// interrupted streams) are retryable; tool logic errors, bad
    /// configuration, and the hop cap are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Provider(e) => matches!(
                e,
                ProviderError::Network(_)
                    | ProviderError::RateLimited { .. }
                    | ProviderError::Timeout(_)
                    | ProviderError::StreamInterrupted(_)
            ),
            _ => false,
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::NotFound("telescope".into()));
        assert!(err.to_string().contains("telescope"));
    }

    #[test]
    fn network_errors_are_retryable() {
        let err = Error::Provider(ProviderError::Network("connection reset".into()));
        assert!(err.is_retryable());

        let err = Error::Provider(ProviderError::RateLimited {
            retry_after_secs: 5,
        });
        assert!(err.is_retryable());
    }

    #[test]
    fn logic_errors_are_not_retryable() {
        assert!(!Error::NotStarted.is_retryable());
        assert!(!Error::ToolLoopExceeded { hops: 8 }.is_retryable());
        assert!(!Error::Provider(ProviderError::AuthenticationFailed("bad key".into()))
            .is_retryable());
        assert!(!Error::Tool(ToolError::InvalidArguments("missing url".into())).is_retryable());
    }
}
