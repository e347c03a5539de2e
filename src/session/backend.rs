//! Platform seams: the speech recognizer and the timer source

use std::time::Duration;

use crate::error::RecognitionError;

/// Options pushed to the recognizer when the session initializes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionSettings {
    pub continuous: bool,
    pub interim_results: bool,
    pub language: String,
    pub max_alternatives: u32,
}

/// A platform speech recognizer
///
/// Calls only request transitions. The backend reports what actually happened
/// (`Started`, `Ended`, results, errors) as
/// [`RecognitionEvent`](super::RecognitionEvent)s fed back into the session.
pub trait RecognitionBackend {
    /// Whether speech recognition exists on this platform at all
    fn is_supported(&self) -> bool;

    fn configure(&mut self, settings: &RecognitionSettings) -> Result<(), RecognitionError>;

    fn start(&mut self) -> Result<(), RecognitionError>;

    fn stop(&mut self) -> Result<(), RecognitionError>;

    fn set_language(&mut self, language: &str) -> Result<(), RecognitionError>;
}

/// Handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// One-shot timers that fire back into the session as `TimerFired`
pub trait TimerScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Cancel a pending timer. Cancelling a fired or unknown timer is a no-op.
    fn cancel(&mut self, id: TimerId);
}
