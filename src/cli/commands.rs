//! List voice commands

use voicenav::{CommandLanguage, CommandRegistry, VoiceConfig};

/// Print the command table, optionally filtered by language
pub fn commands_command(config: &VoiceConfig, lang: Option<CommandLanguage>) {
    let registry = CommandRegistry::from_commands(config.effective_commands());
    let commands: Vec<_> = match lang {
        Some(lang) => registry.filter_by_language(lang),
        None => registry.iter().collect(),
    };

    if commands.is_empty() {
        println!("No voice commands configured.");
        return;
    }

    println!("Voice commands ({}):\n", commands.len());

    for command in commands {
        println!(
            "  {} [{}] ({})",
            command.id,
            command.kind(),
            command.language
        );
        println!("    say: {}", command.keywords.join(" | "));
        if !command.description.is_empty() {
            println!("    {}", command.description);
        }
        println!();
    }

    if config.enable_wake_words {
        println!("Wake words: {}", config.wake_words.join(", "));
    }
}
