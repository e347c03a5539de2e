//! Chained commands: "go home and scroll down"

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{ExecutionContext, ExecutionResult, execute_voice_command};
use crate::commands::VoiceCommand;

/// Pause between chained commands so one side effect settles before the next
pub const BATCH_STEP_DELAY: Duration = Duration::from_millis(500);

static CONNECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(?:and|then|after|next)\s+").expect("connector pattern is valid")
});

/// Split a transcript on natural-language connectors, dropping empty parts
pub fn split_batch(transcript: &str) -> Vec<&str> {
    CONNECTOR
        .split(transcript)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Execute each part of a chained transcript in order
pub async fn execute_batch_commands(
    transcript: &str,
    commands: &[VoiceCommand],
    ctx: &mut ExecutionContext<'_>,
    threshold: f64,
) -> Vec<ExecutionResult> {
    execute_batch_commands_with_delay(transcript, commands, ctx, threshold, BATCH_STEP_DELAY).await
}

pub async fn execute_batch_commands_with_delay(
    transcript: &str,
    commands: &[VoiceCommand],
    ctx: &mut ExecutionContext<'_>,
    threshold: f64,
    delay: Duration,
) -> Vec<ExecutionResult> {
    let parts = split_batch(transcript);
    debug!(parts = parts.len(), "Executing batch voice command");

    let mut results = Vec::with_capacity(parts.len());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        results.push(execute_voice_command(part, commands, ctx, threshold));
    }
    results
}
