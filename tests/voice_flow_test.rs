//! End-to-end voice flows through the public API
//!
//! Each test drives a `VoiceSession` the way a platform adapter would:
//! backend lifecycle events in, routes and scrolls out.

mod common;

use std::sync::{Arc, Mutex};

use voicenav::commands::CustomCallback;
use voicenav::executor::{self, ExecutionContext};
use voicenav::session::{RecognitionEvent, SessionEvent, SessionPhase};
use voicenav::{SessionHost, VoiceCommand, VoiceConfig, VoiceSession};

use common::{CountingBackend, Log, LoggingViewport, QueuedTimers, logging_navigator};

type Session = VoiceSession<CountingBackend, QueuedTimers>;

fn page_session(config: VoiceConfig) -> (Session, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let host = SessionHost::new()
        .with_navigator(logging_navigator(log.clone()))
        .with_viewport(LoggingViewport::new(log.clone()));
    let session = VoiceSession::new(config, CountingBackend::default(), QueuedTimers::default())
        .with_host(host);
    (session, log)
}

fn say(session: &mut Session, transcript: &str) {
    session.handle_event(RecognitionEvent::final_result(transcript).into());
}

fn start(session: &mut Session) {
    session.start_listening();
    session.handle_event(RecognitionEvent::Started.into());
    assert_eq!(session.phase(), SessionPhase::Listening);
}

#[test]
fn test_browse_portfolio_by_voice() {
    let (mut session, log) = page_session(VoiceConfig::default());
    start(&mut session);

    say(&mut session, "go home");
    say(&mut session, "Show projects!");
    say(&mut session, "go to contact section");
    say(&mut session, "scroll up");
    say(&mut session, "projects dikhao");

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "route /",
            "route /projects",
            "view #contact",
            "by -500",
            "route /projects",
        ]
    );
    assert_eq!(session.state().last_command, "nav-projects-hi");
    assert!(session.state().error.is_none());
}

#[test]
fn test_wake_word_flow() {
    let config = VoiceConfig {
        enable_wake_words: true,
        ..VoiceConfig::default()
    };
    let (mut session, log) = page_session(config);
    start(&mut session);

    say(&mut session, "go home");
    assert!(log.lock().unwrap().is_empty());

    say(&mut session, "hey beast developer go home");
    assert_eq!(*log.lock().unwrap(), vec!["route /"]);

    say(&mut session, "portfolio suno neeche jao");
    assert_eq!(*log.lock().unwrap(), vec!["route /", "by 500"]);
}

#[test]
fn test_missing_section_reports_target() {
    let (mut session, log) = page_session(VoiceConfig::default());
    start(&mut session);

    say(&mut session, "go to skills section");

    let result = session.state().last_result.clone().unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "Failed to scroll to #skills");
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_voice_stop_then_restart_cycle() {
    let (mut session, _) = page_session(VoiceConfig::default());
    start(&mut session);

    // Recognizer times out on its own: restart after the delay
    session.handle_event(RecognitionEvent::Ended.into());
    assert_eq!(session.phase(), SessionPhase::Restarting);
    let (id, _) = session.timers_mut().pop().unwrap();
    session.handle_event(SessionEvent::TimerFired(id));
    session.handle_event(RecognitionEvent::Started.into());
    assert_eq!(session.backend().starts, 2);

    // "stop listening" wins over the shorter "listen" keyword
    say(&mut session, "stop listening");
    assert_eq!(session.state().last_command, "stop-listening");
    session.handle_event(RecognitionEvent::Ended.into());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.timers().pending.is_empty());
    assert_eq!(session.backend().stops, 1);
}

#[test]
fn test_user_commands_from_config() {
    let toml = r#"
        [[commands]]
        id = "nav-resume"
        keywords = ["open resume", "resume dikhao"]
        action = "route"
        target = "/resume"

        [[commands]]
        id = "toggle-theme"
        keywords = ["dark mode"]
        action = "custom"
        description = "Toggle theme"
    "#;
    let config: VoiceConfig = toml::from_str(toml).unwrap();
    config.validate().unwrap();

    let toggles = Arc::new(Mutex::new(0));
    let counter = toggles.clone();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let host = SessionHost::new()
        .with_navigator(logging_navigator(log.clone()))
        .with_callback(
            "toggle-theme",
            CustomCallback::new(move || {
                *counter.lock().unwrap() += 1;
                Ok(())
            }),
        );
    let mut session = VoiceSession::new(config, CountingBackend::default(), QueuedTimers::default())
        .with_host(host);

    let result = session.execute_command("resume dikhao");
    assert!(result.success);
    assert_eq!(*log.lock().unwrap(), vec!["route /resume"]);

    let result = session.execute_command("dark mode please");
    assert!(result.success);
    assert_eq!(result.message, "Executed: Toggle theme");
    assert_eq!(*toggles.lock().unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_batch_over_plain_command_slice() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let mut navigator = logging_navigator(log.clone());
    let mut viewport = LoggingViewport::new(log.clone());
    let mut ctx = ExecutionContext::new()
        .with_navigator(&mut navigator)
        .with_viewport(&mut viewport);

    let mut commands = voicenav::commands::default_commands();
    commands.push(VoiceCommand::scroll("scroll-hero-alt", "banner", "#hero"));

    let started = tokio::time::Instant::now();
    let results = executor::execute_batch_commands(
        "go home and scroll down then banner",
        &commands,
        &mut ctx,
        0.7,
    )
    .await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.success));
    assert_eq!(*log.lock().unwrap(), vec!["route /", "by 500", "view #hero"]);
    assert!(started.elapsed() >= executor::BATCH_STEP_DELAY * 2);
}
