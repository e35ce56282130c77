//! Error types for the viewport sync engine
//!
//! Unknown viewport ids are never errors: camera events legitimately race
//! with viewport teardown, so those paths are silent no-ops.

use thiserror::Error;

/// Engine errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for engine operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors from loading engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Error a camera listener may report. Logged and swallowed by the engine.
#[derive(Debug, Error)]
#[error("Listener failed: {message}")]
pub struct ListenerError {
    pub message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&str> for ListenerError {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ListenerError {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
