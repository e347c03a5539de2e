//! Session state, events and notifications

use std::fmt;

use serde::Serialize;

use super::backend::TimerId;
use crate::commands::VoiceCommand;
use crate::executor::ExecutionResult;

/// Lifecycle phase of a recognition session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Not yet initialized
    #[default]
    Uninitialized,
    /// Probing and configuring the backend
    Initializing,
    /// No speech recognition on this platform; permanent
    Unsupported,
    /// Ready, not listening
    Idle,
    /// Backend asked to start, waiting for it to report `Started`
    Starting,
    Listening,
    /// Backend asked to stop, waiting for `Ended`
    Stopping,
    /// Waiting on the auto-restart timer
    Restarting,
    /// A non-retryable error halted listening
    Error,
    /// Torn down; every operation is a no-op
    Disposed,
}

impl SessionPhase {
    /// Whether the backend session is (or is about to be) running
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting | Self::Listening | Self::Stopping)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "Uninitialized",
            Self::Initializing => "Initializing",
            Self::Unsupported => "Unsupported",
            Self::Idle => "Idle",
            Self::Starting => "Starting",
            Self::Listening => "Listening",
            Self::Stopping => "Stopping",
            Self::Restarting => "Restarting",
            Self::Error => "Error",
            Self::Disposed => "Disposed",
        };
        f.write_str(name)
    }
}

/// Observable session state, read-only outside the session
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceControlState {
    pub is_listening: bool,
    pub is_supported: bool,
    pub is_initialized: bool,
    /// Most recent utterance, interim or final
    pub last_transcript: String,
    /// Id of the last executed command, empty when the last attempt missed
    pub last_command: String,
    pub last_result: Option<ExecutionResult>,
    pub error: Option<String>,
    /// Confidence of the last recognition result, 0-100
    pub confidence: f64,
    /// Active recognition locale
    pub language: String,
}

/// Lifecycle and result events emitted by a recognition backend
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Started,
    Ended,
    Result {
        transcript: String,
        is_final: bool,
        /// Recognizer confidence in [0, 1]
        confidence: f64,
    },
    Error {
        /// Platform error code such as `no-speech` or `network`
        code: String,
    },
}

impl RecognitionEvent {
    /// Final result with full confidence
    pub fn final_result(transcript: impl Into<String>) -> Self {
        Self::Result {
            transcript: transcript.into(),
            is_final: true,
            confidence: 1.0,
        }
    }

    pub fn interim_result(transcript: impl Into<String>, confidence: f64) -> Self {
        Self::Result {
            transcript: transcript.into(),
            is_final: false,
            confidence,
        }
    }

    pub fn error(code: impl Into<String>) -> Self {
        Self::Error { code: code.into() }
    }
}

/// Everything that can drive the session forward
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Recognition(RecognitionEvent),
    TimerFired(TimerId),
}

impl From<RecognitionEvent> for SessionEvent {
    fn from(event: RecognitionEvent) -> Self {
        Self::Recognition(event)
    }
}

/// Emitted by the session for UI adapters, drained with `take_notifications`
#[derive(Debug, Clone)]
pub enum SessionNotification {
    StateChanged(VoiceControlState),
    CommandExecuted(ExecutionResult),
    Error(String),
}

/// Partial configuration change applied with `update_config`
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    /// Replaces the whole command table
    pub commands: Option<Vec<VoiceCommand>>,
    pub wake_words: Option<Vec<String>>,
    /// First entry becomes the active language
    pub languages: Option<Vec<String>>,
    pub confidence: Option<f64>,
    pub continuous: Option<bool>,
    pub interim_results: Option<bool>,
    pub enable_wake_words: Option<bool>,
    pub enable_speech_feedback: Option<bool>,
}
