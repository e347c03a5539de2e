//! CommandRegistry - the ordered command table owned by a session
//!
//! Registry order is significant: it breaks ties between equally long exact
//! keyword hits. Normalized keyword forms are computed once when a command is
//! added, so matching an utterance does not re-normalize the whole table.

use tracing::debug;

use super::defaults::default_commands;
use super::voice_command::{CommandLanguage, VoiceCommand};
use crate::matcher::{self, CommandMatch};

#[derive(Debug, Clone)]
struct Entry {
    command: VoiceCommand,
    normalized: Vec<String>,
}

impl Entry {
    fn new(command: VoiceCommand) -> Self {
        let normalized = command.keywords.iter().map(|k| matcher::normalize(k)).collect();
        Self { command, normalized }
    }
}

/// Ordered, mutable table of voice commands
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    entries: Vec<Entry>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in command set
    pub fn with_defaults() -> Self {
        Self::from_commands(default_commands())
    }

    pub fn from_commands(commands: impl IntoIterator<Item = VoiceCommand>) -> Self {
        let mut registry = Self::new();
        for command in commands {
            registry.add(command);
        }
        registry
    }

    /// Append a command. Ids are not de-duplicated.
    pub fn add(&mut self, command: VoiceCommand) {
        debug!(id = %command.id, keywords = command.keywords.len(), "Registered voice command");
        self.entries.push(Entry::new(command));
    }

    /// Remove every command with `id`, returning how many were removed
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.command.id != id);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(id, removed, "Removed voice command");
        }
        removed
    }

    /// Replace the whole table
    pub fn replace_all(&mut self, commands: impl IntoIterator<Item = VoiceCommand>) {
        self.entries = commands.into_iter().map(Entry::new).collect();
    }

    /// First command with `id`
    pub fn get(&self, id: &str) -> Option<&VoiceCommand> {
        self.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VoiceCommand> {
        self.entries.iter().map(|e| &e.command)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Commands usable in `language`, in registry order
    ///
    /// `En` and `Hi` select commands tagged with that language or `both`.
    /// `Both` selects every command.
    pub fn filter_by_language(&self, language: CommandLanguage) -> Vec<&VoiceCommand> {
        self.iter()
            .filter(|c| {
                language == CommandLanguage::Both
                    || c.language == language
                    || c.language == CommandLanguage::Both
            })
            .collect()
    }

    /// Every keyword of every command, in registry order
    pub fn all_keywords(&self) -> Vec<&str> {
        self.iter()
            .flat_map(|c| c.keywords.iter().map(String::as_str))
            .collect()
    }

    /// Owned copy of the table
    pub fn to_vec(&self) -> Vec<VoiceCommand> {
        self.iter().cloned().collect()
    }

    /// Find the command a transcript refers to
    pub fn find_match(&self, transcript: &str, threshold: f64) -> Option<&VoiceCommand> {
        self.find_match_detailed(transcript, threshold).map(|m| m.command)
    }

    pub fn find_match_detailed(&self, transcript: &str, threshold: f64) -> Option<CommandMatch<'_>> {
        matcher::best_match(
            transcript,
            self.entries
                .iter()
                .map(|e| (&e.command, e.normalized.as_slice())),
            threshold,
        )
    }
}

impl FromIterator<VoiceCommand> for CommandRegistry {
    fn from_iter<T: IntoIterator<Item = VoiceCommand>>(iter: T) -> Self {
        Self::from_commands(iter)
    }
}
