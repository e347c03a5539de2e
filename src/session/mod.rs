//! Recognition session
//!
//! [`VoiceSession`] owns one platform recognizer and turns its events into
//! executed commands: result -> wake-word gate -> matcher -> executor.
//! It is sans-IO; the [`runtime`](crate::runtime) module drives it from a
//! tokio task, tests drive it directly with fake backends and timers.

mod backend;
mod machine;
mod types;

pub use backend::{RecognitionBackend, RecognitionSettings, TimerId, TimerScheduler};
pub use machine::{
    AUTO_START_DELAY, ERROR_RESTART_DELAY, MAX_ALTERNATIVES, RESTART_DELAY, SessionHost,
    VoiceSession, WAKE_ACKNOWLEDGEMENT,
};
pub use types::{
    ConfigUpdate, RecognitionEvent, SessionEvent, SessionNotification, SessionPhase,
    VoiceControlState,
};

#[cfg(test)]
mod tests;
