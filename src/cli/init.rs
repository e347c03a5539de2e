//! Init command implementation

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use voicenav::VoiceConfig;

/// Default configuration content for voicenav init
pub const DEFAULT_CONFIG: &str = r##"# voicenav configuration
# =====================
#
# Every option has a default; delete what you do not need.

# Recognition locales, first one is active
languages = ["en-US", "hi-IN"]

# Interim results above this confidence are acted on, and fuzzy matches must
# score at least this much (0.0 - 1.0)
confidence = 0.7

continuous = true
interim_results = true

# Begin listening one second after startup
auto_start = false

# Only act on utterances that contain a wake word
enable_wake_words = false
wake_word_threshold = 0.8
# wake_words = ["hey beast developer", "hey portfolio"]

# Speak execution results back
enable_speech_feedback = false

# Keep the built-in English and Hindi commands
include_default_commands = true

[onboarding]
auto_show = true
show_delay_ms = 2000

# ============================================================================
# COMMANDS - appended to the built-in set
# ============================================================================
#
# action = "route"     target = "/path"
# action = "scroll"    target = "top" | "bottom" | "#selector"
# action = "scrollBy"  amount = 500 (negative scrolls up)
# action = "custom"    handled by a callback registered under the same id
#
# [[commands]]
# id = "nav-blog-hi"
# keywords = ["blog dikhao", "blog kholo"]
# action = "route"
# target = "/blog"
# description = "Open the blog"
# language = "hi"
"##;

/// Write the default configuration to `config_path` or the global path
pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(VoiceConfig::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created: {}", config_path.display());

    Ok(())
}
