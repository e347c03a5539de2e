//! Error types shared across the crate.
//!
//! Library code returns these typed errors; file loading and the CLI use
//! `anyhow` with context. Command execution never uses them: every
//! execution outcome is an [`ExecutionResult`](crate::executor::ExecutionResult).

use thiserror::Error;

/// Errors raised by configuration updates and the session runtime
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid command '{id}': {reason}")]
    InvalidCommand { id: String, reason: String },

    #[error("Voice session runtime stopped")]
    RuntimeStopped,
}

/// Errors reported by a speech recognition backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("recognition session is already running")]
    AlreadyStarted,

    #[error("recognition session is not running")]
    NotStarted,

    #[error("{0}")]
    Platform(String),
}
