//! Configuration file I/O operations

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::VoiceConfig;

impl VoiceConfig {
    /// Get the global config directory path (~/.voicenav/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".voicenav")
    }

    /// Get the global config file path (~/.voicenav/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load and validate configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: VoiceConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from `path`, or from the global path.
    ///
    /// A missing global config yields the defaults; a missing explicit path
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let global_path = Self::global_config_path();
                if global_path.exists() {
                    Self::from_file(&global_path)
                } else {
                    tracing::debug!(
                        "No config at {}, using defaults",
                        global_path.display()
                    );
                    Ok(Self::default())
                }
            }
        }
    }

    /// Serialize to pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).with_context(|| "Failed to serialize config")
    }

    /// Validate, then replace `path` with this configuration.
    ///
    /// Writers hold `<path>.toml.lock` for the whole save. Readers only ever
    /// see the old file or the new one: the TOML lands in `<path>.toml.tmp`
    /// first and is renamed over the target. A failed save leaves no temp file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()
            .with_context(|| format!("Refusing to save invalid config to {}", path.display()))?;
        let content = self.to_toml_string()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let _lock = SaveLock::acquire(path)?;
        let staged = path.with_extension("toml.tmp");
        let outcome = write_synced(&staged, content.as_bytes()).and_then(|()| {
            fs::rename(&staged, path)
                .with_context(|| format!("Failed to replace config file: {}", path.display()))
        });

        if outcome.is_err() {
            let _ = fs::remove_file(&staged);
        }
        outcome
    }
}

/// Exclusive advisory lock on the sibling lock file, released on drop
struct SaveLock {
    file: File,
}

impl SaveLock {
    fn acquire(target: &Path) -> Result<Self> {
        let lock_path = target.with_extension("toml.lock");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
        file.lock_exclusive()
            .with_context(|| format!("Failed to lock {}", lock_path.display()))?;
        Ok(Self { file })
    }
}

impl Drop for SaveLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to release config lock: {e}");
        }
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create temp file: {}", path.display()))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .with_context(|| format!("Failed to write temp file: {}", path.display()))
}
