//! Interactive listening session on the terminal

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use voicenav::VoiceConfig;
use voicenav::onboarding::{FileOnboardingStore, VoiceOnboarding};
use voicenav::runtime::{SessionHandle, SpawnedSession, spawn_session};
use voicenav::session::SessionNotification;

use super::console::{ConsoleBackend, SECTIONS, console_host};
use super::run::print_result;

const HELP: &str = "Type what you would say, e.g. \"go home\" or \"scroll down and go to contact section\".
Meta commands: :start  :stop  :state  :help  :reset-onboarding  :quit";

fn print_intro(config: &VoiceConfig) {
    println!();
    println!("Voice control");
    println!("=============");
    println!("Say a command to navigate: \"go home\", \"show projects\", \"scroll down\",");
    println!("\"go to contact section\", or in Hinglish \"projects dikhao\", \"neeche jao\".");
    println!("Sections on this page: {}", SECTIONS.join(" "));
    if config.enable_wake_words {
        println!(
            "Start with a wake word, e.g. \"{} go home\".",
            config.wake_words.first().map(String::as_str).unwrap_or("hey portfolio")
        );
    }
    println!("{HELP}");
    println!();
}

async fn print_state(handle: &SessionHandle) -> Result<()> {
    let snapshot = handle.snapshot().await?;
    let state = &snapshot.state;
    println!(
        "  phase={} listening={} language={} confidence={:.0}",
        snapshot.phase, state.is_listening, state.language, state.confidence
    );
    if !state.last_transcript.is_empty() {
        println!("  last transcript: \"{}\"", state.last_transcript);
    }
    if let Some(error) = &state.error {
        println!("  error: {error}");
    }
    Ok(())
}

/// Run a session whose microphone is stdin
pub async fn listen_command(mut config: VoiceConfig, wake_words: bool, speak: bool) -> Result<()> {
    config.enable_wake_words |= wake_words;
    config.enable_speech_feedback |= speak;

    let mut onboarding = VoiceOnboarding::new(FileOnboardingStore::default(), config.onboarding.clone());
    let mut intro_pending = onboarding.should_auto_show();
    let intro_delay = tokio::time::sleep(onboarding.show_delay());
    tokio::pin!(intro_delay);

    let SpawnedSession {
        handle,
        events,
        mut notifications,
        task,
    } = spawn_session(config.clone(), console_host(), ConsoleBackend::new);
    handle.start_listening()?;

    println!("voicenav listening ({}). Type :help for help.", config.language());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut listening = false;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "" => {}
                    ":quit" | ":q" => break,
                    ":start" => handle.start_listening()?,
                    ":stop" => handle.stop_listening()?,
                    ":state" => print_state(&handle).await?,
                    ":help" => {
                        onboarding.open_modal();
                        print_intro(&config);
                        onboarding.close_modal();
                    }
                    ":reset-onboarding" => {
                        onboarding.reset_onboarding();
                        println!("  onboarding will be shown next time");
                    }
                    text if listening => events.final_result(text)?,
                    _ => println!("  not listening, type :start"),
                }
            }
            Some(notification) = notifications.recv() => match notification {
                SessionNotification::StateChanged(state) => {
                    if state.is_listening != listening {
                        listening = state.is_listening;
                        println!("  ({})", if listening { "listening" } else { "not listening" });
                    }
                }
                SessionNotification::CommandExecuted(result) => print_result(&result),
                SessionNotification::Error(message) => eprintln!("  error: {message}"),
            },
            () = &mut intro_delay, if intro_pending => {
                intro_pending = false;
                if onboarding.auto_show() {
                    print_intro(&config);
                    onboarding.mark_completed();
                }
            }
        }
    }

    handle.shutdown()?;
    task.await?;
    Ok(())
}
