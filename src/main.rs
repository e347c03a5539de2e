use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use voicenav::{CommandLanguage, VoiceConfig};

mod cli;

#[derive(Parser)]
#[command(name = "voicenav")]
#[command(about = "Voice command recognition and dispatch")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.voicenav/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which command a transcript resolves to, without executing it
    Match {
        /// The spoken text
        #[arg(required = true, num_args = 1..)]
        transcript: Vec<String>,

        /// Minimum fuzzy score (defaults to the configured confidence)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Execute a transcript against a console host
    Run {
        /// The spoken text
        #[arg(required = true, num_args = 1..)]
        transcript: Vec<String>,

        /// Split on "and", "then", "after", "next" and run each part
        #[arg(long)]
        batch: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Minimum fuzzy score (defaults to the configured confidence)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// List the configured voice commands
    Commands {
        /// Only commands surfaced for this language (en, hi)
        #[arg(long)]
        lang: Option<CommandLanguage>,
    },

    /// Interactive session: each line typed is a recognized utterance
    Listen {
        /// Only act on utterances that start with a wake word
        #[arg(long)]
        wake_words: bool,

        /// Print spoken feedback
        #[arg(long)]
        speak: bool,
    },

    /// Write a default ~/.voicenav/config.toml
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config_path = cli.config;
    let load_config = || VoiceConfig::load(config_path.as_deref());

    match cli.command {
        Some(Commands::Match {
            transcript,
            threshold,
        }) => {
            cli::run::match_command(&load_config()?, &transcript.join(" "), threshold)?;
        }
        Some(Commands::Run {
            transcript,
            batch,
            json,
            threshold,
        }) => {
            cli::run::run_command(&load_config()?, &transcript.join(" "), batch, json, threshold)
                .await?;
        }
        Some(Commands::Commands { lang }) => {
            cli::commands::commands_command(&load_config()?, lang);
        }
        Some(Commands::Listen { wake_words, speak }) => {
            cli::listen::listen_command(load_config()?, wake_words, speak).await?;
        }
        Some(Commands::Init { force }) => {
            cli::init::init_command(config_path.clone(), force)?;
        }
        None => {
            // Default: interactive session
            cli::listen::listen_command(load_config()?, false, false).await?;
        }
    }

    Ok(())
}
