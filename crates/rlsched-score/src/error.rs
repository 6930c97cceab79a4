//! Error types for plugin construction and score strategies.

use thiserror::Error;

/// Construction-time failures. These are the only errors a caller ever sees.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("undecodable scorer configuration: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unknown score plugin: {0}")]
    UnknownPlugin(String),

    #[error("failed to build remote scoring client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Why a strategy could not produce a score. Always recovered by fallback.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("remote scorer answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("undecodable remote response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("remote scorer returned a non-finite score")]
    InvalidScore,

    #[error("remote scorer timed out")]
    Timeout,

    #[error("scoring cancelled by caller")]
    Cancelled,
}

impl StrategyError {
    /// Short label used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyError::Transport(e) if e.is_connect() => "connect",
            StrategyError::Transport(e) if e.is_timeout() => "timeout",
            StrategyError::Transport(_) => "transport",
            StrategyError::Status(_) => "status",
            StrategyError::Decode(_) => "decode",
            StrategyError::InvalidScore => "invalid_score",
            StrategyError::Timeout => "timeout",
            StrategyError::Cancelled => "cancelled",
        }
    }
}
