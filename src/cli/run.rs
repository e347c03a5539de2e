//! Match and run commands

use anyhow::{Context, Result};

use voicenav::config::validate_threshold;
use voicenav::executor::{self, ExecutionContext, ExecutionResult};
use voicenav::{CommandRegistry, VoiceConfig};

use super::console::{ConsoleListening, ConsoleNavigator, ConsoleSpeech, ConsoleViewport};

fn resolve_threshold(config: &VoiceConfig, threshold: Option<f64>) -> Result<f64> {
    match threshold {
        Some(value) => {
            validate_threshold("threshold", value)?;
            Ok(value)
        }
        None => Ok(config.confidence),
    }
}

/// Print the command a transcript resolves to
pub fn match_command(config: &VoiceConfig, transcript: &str, threshold: Option<f64>) -> Result<()> {
    let threshold = resolve_threshold(config, threshold)?;
    let registry = CommandRegistry::from_commands(config.effective_commands());

    match registry.find_match_detailed(transcript, threshold) {
        Some(found) => {
            println!("Matched: {} ({})", found.command.id, found.command.kind());
            println!("  keyword: \"{}\"", found.keyword);
            println!("  {:?} match, score {:.2}", found.kind, found.score);
            if !found.command.description.is_empty() {
                println!("  {}", found.command.description);
            }
        }
        None => println!("No command matches \"{transcript}\" at threshold {threshold:.2}"),
    }
    Ok(())
}

/// Execute a transcript (or a chained batch) against the console host
pub async fn run_command(
    config: &VoiceConfig,
    transcript: &str,
    batch: bool,
    json: bool,
    threshold: Option<f64>,
) -> Result<()> {
    let threshold = resolve_threshold(config, threshold)?;
    let commands = config.effective_commands();

    let mut navigator = ConsoleNavigator::default();
    let mut viewport = ConsoleViewport::default();
    let mut speech = ConsoleSpeech;
    let mut listening = ConsoleListening;

    let mut ctx = ExecutionContext::new()
        .with_navigator(&mut navigator)
        .with_viewport(&mut viewport)
        .with_listening(&mut listening)
        .with_language(config.language());
    if config.enable_speech_feedback {
        ctx = ctx.with_speech(&mut speech);
    }

    let results = if batch {
        executor::execute_batch_commands(transcript, &commands, &mut ctx, threshold).await
    } else {
        vec![executor::execute_voice_command(transcript, &commands, &mut ctx, threshold)]
    };

    if json {
        let output = serde_json::to_string_pretty(&results)
            .with_context(|| "Failed to serialize execution results")?;
        println!("{output}");
    } else {
        for result in &results {
            print_result(result);
        }
    }
    Ok(())
}

pub fn print_result(result: &ExecutionResult) {
    let status = if result.success { "ok" } else { "failed" };
    match result.command_id() {
        Some(id) => println!("[{status}] {id}: {}", result.message),
        None => println!("[{status}] {}", result.message),
    }
}
