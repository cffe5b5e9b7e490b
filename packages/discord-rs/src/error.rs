//! Error types for the Discord client.

use thiserror::Error;

/// Result type for Discord client operations.
pub type Result<T> = std::result::Result<T, DiscordError>;

/// Discord client errors.
#[derive(Debug, Error)]
pub enum DiscordError {
    /// Configuration error (missing token, bad URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, missing permissions)
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Gateway error (websocket failure, protocol violation)
    #[error("Gateway error: {0}")]
    Gateway(String),
}
