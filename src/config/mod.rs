//! Configuration for voicenav
//!
//! Configuration lives in `~/.voicenav/config.toml` unless a path is given.
//! Every field has a default, so an empty file (or no file) yields the
//! built-in command set with English and Hindi recognition.
//!
//! ```toml
//! languages = ["en-US", "hi-IN"]
//! confidence = 0.7
//! enable_wake_words = true
//!
//! [[commands]]
//! id = "nav-blog-hi"
//! keywords = ["blog dikhao"]
//! action = "route"
//! target = "/blog"
//! language = "hi"
//! ```

mod io;
mod validation;

pub use validation::{ValidationError, validate_locale, validate_threshold};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::commands::{VoiceCommand, default_commands, default_wake_words};
use crate::wake::DEFAULT_WAKE_THRESHOLD;

/// Recognition, matching and gating options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Start from the built-in command set; `commands` are appended to it
    #[serde(default = "default_true")]
    pub include_default_commands: bool,

    /// Activation phrases checked when `enable_wake_words` is set
    #[serde(default = "default_wake_words")]
    pub wake_words: Vec<String>,

    /// Locale preference list; the first entry is the active language
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Interim-result acceptance threshold and fuzzy match threshold (0.0-1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Ask the backend for continuous recognition
    #[serde(default = "default_true")]
    pub continuous: bool,

    /// Deliver interim (non-final) results
    #[serde(default = "default_true")]
    pub interim_results: bool,

    /// Begin listening shortly after initialization
    #[serde(default)]
    pub auto_start: bool,

    /// Only act on utterances that contain a wake word
    #[serde(default)]
    pub enable_wake_words: bool,

    /// Speak execution results back
    #[serde(default)]
    pub enable_speech_feedback: bool,

    /// Minimum similarity for a fuzzy wake-word hit (0.0-1.0)
    #[serde(default = "default_wake_word_threshold")]
    pub wake_word_threshold: f64,

    #[serde(default)]
    pub onboarding: OnboardingSettings,

    /// Extra commands, matched after the built-in ones
    #[serde(default)]
    pub commands: Vec<VoiceCommand>,
}

/// First-run onboarding behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingSettings {
    /// Show the onboarding automatically until it has been completed
    #[serde(default = "default_true")]
    pub auto_show: bool,

    /// Delay before the automatic onboarding appears (milliseconds)
    #[serde(default = "default_show_delay_ms")]
    pub show_delay_ms: u64,
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self {
            auto_show: true,
            show_delay_ms: default_show_delay_ms(),
        }
    }
}

impl OnboardingSettings {
    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms)
    }
}

fn default_true() -> bool {
    true
}

fn default_languages() -> Vec<String> {
    vec!["en-US".to_string(), "hi-IN".to_string()]
}

fn default_confidence() -> f64 {
    0.7
}

fn default_wake_word_threshold() -> f64 {
    DEFAULT_WAKE_THRESHOLD
}

fn default_show_delay_ms() -> u64 {
    2000
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            include_default_commands: true,
            wake_words: default_wake_words(),
            languages: default_languages(),
            confidence: default_confidence(),
            continuous: true,
            interim_results: true,
            auto_start: false,
            enable_wake_words: false,
            enable_speech_feedback: false,
            wake_word_threshold: default_wake_word_threshold(),
            onboarding: OnboardingSettings::default(),
            commands: Vec::new(),
        }
    }
}

impl VoiceConfig {
    /// The active recognition locale
    pub fn language(&self) -> &str {
        self.languages.first().map(String::as_str).unwrap_or("en-US")
    }

    /// The full command table this configuration describes
    pub fn effective_commands(&self) -> Vec<VoiceCommand> {
        let mut commands = if self.include_default_commands {
            default_commands()
        } else {
            Vec::new()
        };
        commands.extend(self.commands.iter().cloned());
        commands
    }
}
