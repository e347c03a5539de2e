use serde::{Serialize, Serializer};

use crate::commands::{ActionKind, VoiceCommand};

/// Outcome of one execution attempt
///
/// Failures are data, never errors: a missed match or a failed action is a
/// result with `success == false` and a readable `message`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    pub message: String,
    /// The matched command, serialized by id
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_command_id"
    )]
    pub command: Option<VoiceCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionKind>,
}

fn serialize_command_id<S: Serializer>(
    command: &Option<VoiceCommand>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match command {
        Some(command) => serializer.serialize_some(&command.id),
        None => serializer.serialize_none(),
    }
}

impl ExecutionResult {
    pub fn no_match(transcript: &str) -> Self {
        Self {
            success: false,
            message: format!("No matching command found for: {transcript}"),
            command: None,
            action: None,
        }
    }

    pub fn succeeded(command: &VoiceCommand, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            command: Some(command.clone()),
            action: Some(command.kind()),
        }
    }

    pub fn failed(command: &VoiceCommand, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            command: Some(command.clone()),
            action: Some(command.kind()),
        }
    }

    /// Id of the matched command, if any
    pub fn command_id(&self) -> Option<&str> {
        self.command.as_ref().map(|c| c.id.as_str())
    }
}
