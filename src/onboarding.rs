//! First-run onboarding tracker
//!
//! Remembers whether the user has completed the voice-control introduction
//! and decides when it should be shown. Persistence failures are logged and
//! never surface to the caller; at worst the introduction is shown again.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{OnboardingSettings, VoiceConfig};

/// Persisted onboarding state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingRecord {
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl OnboardingRecord {
    pub fn completed_now() -> Self {
        Self {
            completed: true,
            completed_at: Some(Utc::now()),
        }
    }
}

/// Where the onboarding record lives
pub trait OnboardingStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<OnboardingRecord>>;
    fn save(&mut self, record: &OnboardingRecord) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// JSON file store, `~/.voicenav/onboarding.json` by default
#[derive(Debug, Clone)]
pub struct FileOnboardingStore {
    path: PathBuf,
}

impl FileOnboardingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        VoiceConfig::global_config_dir().join("onboarding.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileOnboardingStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl OnboardingStore for FileOnboardingStore {
    fn load(&self) -> Result<Option<OnboardingRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read onboarding state from {}", self.path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| "Failed to parse onboarding state JSON")?;
        Ok(Some(record))
    }

    fn save(&mut self, record: &OnboardingRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(record)
            .with_context(|| "Failed to serialize onboarding state")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write onboarding state to {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove onboarding state {}", self.path.display())),
        }
    }
}

/// In-memory store for tests and embedders without a filesystem
#[derive(Debug, Clone, Default)]
pub struct MemoryOnboardingStore {
    record: Option<OnboardingRecord>,
}

impl OnboardingStore for MemoryOnboardingStore {
    fn load(&self) -> Result<Option<OnboardingRecord>> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &OnboardingRecord) -> Result<()> {
        self.record = Some(record.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.record = None;
        Ok(())
    }
}

/// Onboarding modal state backed by a store
#[derive(Debug)]
pub struct VoiceOnboarding<S: OnboardingStore> {
    store: S,
    settings: OnboardingSettings,
    show_modal: bool,
    has_seen_onboarding: bool,
}

impl<S: OnboardingStore> VoiceOnboarding<S> {
    /// Read the completion flag from `store`. An unreadable store counts as
    /// not completed.
    pub fn new(store: S, settings: OnboardingSettings) -> Self {
        let has_seen_onboarding = match store.load() {
            Ok(record) => record.is_some_and(|r| r.completed),
            Err(e) => {
                warn!("Failed to check onboarding status: {e:#}");
                false
            }
        };

        Self {
            store,
            settings,
            show_modal: false,
            has_seen_onboarding,
        }
    }

    pub fn show_modal(&self) -> bool {
        self.show_modal
    }

    pub fn has_seen_onboarding(&self) -> bool {
        self.has_seen_onboarding
    }

    /// Whether the modal should open on its own after [`show_delay`](Self::show_delay)
    pub fn should_auto_show(&self) -> bool {
        self.settings.auto_show && !self.has_seen_onboarding
    }

    pub fn show_delay(&self) -> Duration {
        self.settings.show_delay()
    }

    /// Open the modal if auto-show still applies. Call once the delay elapsed.
    pub fn auto_show(&mut self) -> bool {
        if self.should_auto_show() {
            self.show_modal = true;
        }
        self.show_modal
    }

    pub fn open_modal(&mut self) {
        self.show_modal = true;
    }

    pub fn close_modal(&mut self) {
        self.show_modal = false;
    }

    /// Persist completion and close the modal. On a store failure nothing changes.
    pub fn mark_completed(&mut self) {
        match self.store.save(&OnboardingRecord::completed_now()) {
            Ok(()) => {
                self.has_seen_onboarding = true;
                self.show_modal = false;
            }
            Err(e) => warn!("Failed to save onboarding status: {e:#}"),
        }
    }

    pub fn reset_onboarding(&mut self) {
        match self.store.clear() {
            Ok(()) => self.has_seen_onboarding = false,
            Err(e) => warn!("Failed to reset onboarding status: {e:#}"),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
