//! Action executor
//!
//! Resolves a transcript to a command and performs its side effect against an
//! [`ExecutionContext`]. Execution is total: every path ends in an
//! [`ExecutionResult`], including a missed match, a missing collaborator or a
//! failing user callback.

mod batch;
mod context;
mod result;

pub use batch::{BATCH_STEP_DELAY, execute_batch_commands, execute_batch_commands_with_delay, split_batch};
pub use context::{CallbackTable, ExecutionContext, ListeningControl, Navigator, SpeechOutput, Viewport};
pub use result::ExecutionResult;

use std::panic::{self, AssertUnwindSafe};

use anyhow::anyhow;
use thiserror::Error;
use tracing::{info, warn};

use crate::commands::defaults::{START_LISTENING_IDS, is_listening_control};
use crate::commands::{CommandAction, CommandRegistry, CustomCallback, ScrollTarget, VoiceCommand};
use crate::matcher;

/// Why an action did not take effect. Rendered into the result message.
#[derive(Debug, Error)]
enum ActionError {
    #[error("Failed to navigate to {target}: {reason}")]
    Navigation { target: String, reason: String },

    #[error("Failed to scroll to {0}")]
    ScrollTo(ScrollTarget),

    #[error("Failed to scroll {0}")]
    ScrollBy(&'static str),

    #[error("No handler found for custom command: {0}")]
    NoHandler(String),

    #[error("Execution error: {0}")]
    Callback(anyhow::Error),
}

/// Match `transcript` against `commands` and execute the winner
pub fn execute_voice_command(
    transcript: &str,
    commands: &[VoiceCommand],
    ctx: &mut ExecutionContext<'_>,
    threshold: f64,
) -> ExecutionResult {
    match matcher::find_best_match(transcript, commands, threshold) {
        Some(command) => execute_matched(command, ctx),
        None => {
            info!(transcript, "No matching voice command");
            ExecutionResult::no_match(transcript)
        }
    }
}

/// Same as [`execute_voice_command`], using the registry's memoized keywords
pub fn execute_with_registry(
    transcript: &str,
    registry: &CommandRegistry,
    ctx: &mut ExecutionContext<'_>,
    threshold: f64,
) -> ExecutionResult {
    match registry.find_match(transcript, threshold) {
        Some(command) => execute_matched(command, ctx),
        None => {
            info!(transcript, "No matching voice command");
            ExecutionResult::no_match(transcript)
        }
    }
}

/// Execute an already matched command
pub fn execute_matched(command: &VoiceCommand, ctx: &mut ExecutionContext<'_>) -> ExecutionResult {
    match perform(command, ctx) {
        Ok(message) => {
            info!(command = %command.id, action = %command.kind(), "{message}");
            if let Some(speech) = ctx.speech.as_mut() {
                speech.speak(&message, ctx.language);
            }
            ExecutionResult::succeeded(command, message)
        }
        Err(e) => {
            warn!(command = %command.id, "{e}");
            ExecutionResult::failed(command, e.to_string())
        }
    }
}

fn perform(command: &VoiceCommand, ctx: &mut ExecutionContext<'_>) -> Result<String, ActionError> {
    match &command.action {
        CommandAction::Route { target } => {
            let navigator = ctx.navigator.as_mut().ok_or_else(|| ActionError::Navigation {
                target: target.clone(),
                reason: "no navigator available".to_string(),
            })?;
            navigator
                .navigate(target)
                .map_err(|e| ActionError::Navigation {
                    target: target.clone(),
                    reason: e.to_string(),
                })?;
            Ok(format!("Navigating to {target}"))
        }

        CommandAction::Scroll { target } => {
            let failed = || ActionError::ScrollTo(target.clone());
            let viewport = ctx.viewport.as_mut().ok_or_else(failed)?;
            let scrolled = match target {
                ScrollTarget::Top => viewport.scroll_to_top().map(|_| true),
                ScrollTarget::Bottom => viewport.scroll_to_bottom().map(|_| true),
                ScrollTarget::Selector(selector) => viewport.scroll_into_view(selector),
            };
            match scrolled {
                Ok(true) => Ok(format!("Scrolling to {target}")),
                Ok(false) => Err(failed()),
                Err(e) => {
                    warn!(target = %target, "Scroll failed: {e:#}");
                    Err(failed())
                }
            }
        }

        CommandAction::ScrollBy { amount } => {
            let direction = if *amount > 0 { "down" } else { "up" };
            let viewport = ctx.viewport.as_mut().ok_or(ActionError::ScrollBy(direction))?;
            viewport
                .scroll_by(*amount)
                .map_err(|_| ActionError::ScrollBy(direction))?;
            Ok(format!("Scrolling {direction}"))
        }

        CommandAction::Custom { callback } => {
            let id = command.id.as_str();
            let message = format!("Executed: {}", describe(command));

            if is_listening_control(id) {
                match ctx.listening.as_mut() {
                    Some(listening) if START_LISTENING_IDS.contains(&id) => listening.start_listening(),
                    Some(listening) => listening.stop_listening(),
                    None => {}
                }
                return Ok(message);
            }

            let handler = callback
                .as_ref()
                .or_else(|| ctx.custom_callbacks.and_then(|table| table.get(id)))
                .ok_or_else(|| ActionError::NoHandler(id.to_string()))?;
            invoke_guarded(handler).map_err(ActionError::Callback)?;
            Ok(message)
        }
    }
}

/// Run a user callback, turning a panic into an error
fn invoke_guarded(callback: &CustomCallback) -> anyhow::Result<()> {
    panic::catch_unwind(AssertUnwindSafe(|| callback.invoke())).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(anyhow!("callback panicked: {reason}"))
    })
}

fn describe(command: &VoiceCommand) -> &str {
    if command.description.is_empty() {
        command.display_phrase()
    } else {
        &command.description
    }
}
