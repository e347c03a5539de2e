//! Wake-word gate
//!
//! Decides whether an utterance is addressed to us and strips the wake phrase
//! so only the command text reaches the matcher.

use tracing::debug;

use crate::matcher::{normalize, similarity};

/// Default minimum whole-utterance similarity for a fuzzy wake-word hit
pub const DEFAULT_WAKE_THRESHOLD: f64 = 0.8;

/// Check whether `transcript` contains any of `wake_words`
///
/// True on an exact normalized substring hit, or when the whole transcript is
/// at least `threshold` similar to a wake phrase.
pub fn contains_wake_word<S: AsRef<str>>(transcript: &str, wake_words: &[S], threshold: f64) -> bool {
    let text = normalize(transcript);

    wake_words.iter().any(|wake| {
        let wake = normalize(wake.as_ref());
        if wake.is_empty() {
            return false;
        }
        text.contains(&wake) || similarity(&text, &wake) >= threshold
    })
}

/// Return what follows the first wake phrase found in `transcript`
///
/// Wake phrases are tried in list order. The remainder is normalized and
/// trimmed and may be empty. When no wake phrase occurs verbatim the original
/// transcript is returned unchanged.
pub fn extract_command_after_wake_word<S: AsRef<str>>(transcript: &str, wake_words: &[S]) -> String {
    let text = normalize(transcript);
    match strip_wake_phrase(&text, wake_words) {
        Some(rest) => rest.to_string(),
        None => transcript.to_string(),
    }
}

fn strip_wake_phrase<'t, S: AsRef<str>>(text: &'t str, wake_words: &[S]) -> Option<&'t str> {
    wake_words.iter().find_map(|wake| {
        let wake = normalize(wake.as_ref());
        if wake.is_empty() {
            return None;
        }
        text.find(&wake).map(|pos| text[pos + wake.len()..].trim())
    })
}

/// What the gate decided for one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Gating is on and no wake word was heard
    Dropped,
    /// A wake word was heard with nothing after it
    WakeOnly,
    /// Text to hand to the matcher
    Command(String),
}

/// Wake-word gating policy applied to actionable transcripts
#[derive(Debug, Clone)]
pub struct WakeWordGate {
    pub enabled: bool,
    pub wake_words: Vec<String>,
    pub threshold: f64,
}

impl WakeWordGate {
    pub fn new(enabled: bool, wake_words: Vec<String>) -> Self {
        Self {
            enabled,
            wake_words,
            threshold: DEFAULT_WAKE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Gate a transcript
    ///
    /// With gating disabled every transcript passes through untouched.
    pub fn evaluate(&self, transcript: &str) -> GateOutcome {
        if !self.enabled {
            return GateOutcome::Command(transcript.to_string());
        }

        if !contains_wake_word(transcript, &self.wake_words, self.threshold) {
            debug!(transcript, "No wake word, dropping utterance");
            return GateOutcome::Dropped;
        }

        let text = normalize(transcript);
        match strip_wake_phrase(&text, &self.wake_words) {
            Some(rest) if !rest.is_empty() => GateOutcome::Command(rest.to_string()),
            // Either nothing follows the wake phrase or the wake phrase was
            // only a fuzzy hit, in which case the whole utterance is the phrase.
            _ => GateOutcome::WakeOnly,
        }
    }
}
