//! Configuration validation

use std::collections::HashSet;

use thiserror::Error;
use tracing::warn;

use super::VoiceConfig;
use crate::error::VoiceError;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Command(#[from] VoiceError),
}

/// Validate a probability-like threshold (0.0 to 1.0)
pub fn validate_threshold(name: &str, value: f64) -> Result<f64, ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidRange(format!(
            "{name} must be between 0.0 and 1.0, got {value}"
        )));
    }
    Ok(value)
}

/// Validate a locale tag such as "en-US"
pub fn validate_locale(locale: &str) -> Result<&str, ValidationError> {
    let valid = !locale.is_empty()
        && locale.len() <= 35
        && locale.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ValidationError::InvalidFormat(format!(
            "'{locale}' is not a valid locale tag"
        )));
    }
    Ok(locale)
}

impl VoiceConfig {
    /// Check ranges, locales and user commands
    ///
    /// Duplicate command ids are allowed (removal drops all of them) but
    /// logged, since they usually indicate a copy-paste mistake.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_threshold("confidence", self.confidence)?;
        validate_threshold("wake_word_threshold", self.wake_word_threshold)?;

        if self.languages.is_empty() {
            return Err(ValidationError::InvalidFormat(
                "languages must contain at least one locale".to_string(),
            ));
        }
        for locale in &self.languages {
            validate_locale(locale)?;
        }

        for command in &self.commands {
            command.validate()?;
        }

        let mut seen = HashSet::new();
        for command in self.effective_commands() {
            if !seen.insert(command.id.clone()) {
                warn!(id = %command.id, "Duplicate voice command id in configuration");
            }
        }

        Ok(())
    }
}
