//! Configuration files on disk

use std::fs;

use tempfile::TempDir;
use voicenav::{CommandAction, CommandRegistry, ScrollTarget, VoiceCommand, VoiceConfig};

#[test]
fn test_load_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r##"
languages = ["hi-IN", "en-US"]
enable_wake_words = true
wake_words = ["suno portfolio"]

[onboarding]
auto_show = false

[[commands]]
id = "scroll-faq"
keywords = ["faq dikhao", "show faq"]
action = "scroll"
target = "#faq"
"##,
    )
    .unwrap();

    let config = VoiceConfig::load(Some(&path)).unwrap();
    assert_eq!(config.language(), "hi-IN");
    assert_eq!(config.wake_words, vec!["suno portfolio"]);
    assert!(!config.onboarding.auto_show);
    assert_eq!(config.onboarding.show_delay_ms, 2000);

    let registry = CommandRegistry::from_commands(config.effective_commands());
    let faq = registry.find_match("show faq please", config.confidence).unwrap();
    assert_eq!(faq.id, "scroll-faq");
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");
    let err = VoiceConfig::load(Some(&path)).unwrap_err();
    assert!(format!("{err:#}").contains("nope.toml"));
}

#[test]
fn test_invalid_file_names_the_problem() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[[commands]]
id = "broken"
keywords = ["jump"]
action = "scrollBy"
amount = 0
"#,
    )
    .unwrap();

    let err = VoiceConfig::load(Some(&path)).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Invalid config file"), "{message}");
    assert!(message.contains("broken"), "{message}");
}

#[test]
fn test_saved_config_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = VoiceConfig {
        confidence: 0.55,
        auto_start: true,
        ..VoiceConfig::default()
    };
    config.commands.push(
        VoiceCommand::scroll("scroll-faq", "show faq", "#faq").with_description("FAQ section"),
    );
    config.commands.push(VoiceCommand::scroll_by("nudge", "nudge down", 120));
    config.save_to_file(&path).unwrap();

    let loaded = VoiceConfig::load(Some(&path)).unwrap();
    assert_eq!(loaded.confidence, 0.55);
    assert!(loaded.auto_start);
    assert_eq!(loaded.commands.len(), 2);
    assert_eq!(loaded.commands[0].description, "FAQ section");
    assert!(matches!(
        &loaded.commands[0].action,
        CommandAction::Scroll { target: ScrollTarget::Selector(selector) } if selector == "#faq"
    ));
    assert!(matches!(loaded.commands[1].action, CommandAction::ScrollBy { amount: 120 }));
    assert!(!path.with_extension("toml.tmp").exists());
}
