use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format '{0}' (expected text, json or journald)")]
    UnknownFormat(String),
    #[error("journald logging needs linux and the `journald` feature")]
    JournaldUnavailable,
    #[error("a global logger is already installed")]
    AlreadyInitialized,
    #[error("failed to install logger: {0}")]
    Init(String),
    #[error("invalid log level directive: {0}")]
    InvalidLevel(String),
}
