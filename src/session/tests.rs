use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::commands::{CustomCallback, VoiceCommand};
use crate::config::VoiceConfig;
use crate::error::RecognitionError;

/// Backend that records calls and refuses a second concurrent start
#[derive(Debug, Default)]
struct FakeBackend {
    unsupported: bool,
    fail_start: bool,
    active: bool,
    starts: usize,
    stops: usize,
    settings: Option<RecognitionSettings>,
    languages: Vec<String>,
}

impl RecognitionBackend for FakeBackend {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn configure(&mut self, settings: &RecognitionSettings) -> Result<(), RecognitionError> {
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn start(&mut self) -> Result<(), RecognitionError> {
        if self.fail_start {
            return Err(RecognitionError::Platform("microphone busy".into()));
        }
        if self.active {
            return Err(RecognitionError::AlreadyStarted);
        }
        self.active = true;
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecognitionError> {
        self.active = false;
        self.stops += 1;
        Ok(())
    }

    fn set_language(&mut self, language: &str) -> Result<(), RecognitionError> {
        self.languages.push(language.to_string());
        Ok(())
    }
}

/// Timers that only fire when the test says so
#[derive(Debug, Default)]
struct ManualTimers {
    next: u64,
    pending: BTreeMap<TimerId, Duration>,
    cancelled: Vec<TimerId>,
}

impl ManualTimers {
    fn only_pending(&self) -> (TimerId, Duration) {
        assert_eq!(self.pending.len(), 1, "pending timers: {:?}", self.pending);
        let (id, delay) = self.pending.iter().next().unwrap();
        (*id, *delay)
    }
}

impl TimerScheduler for ManualTimers {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next += 1;
        let id = TimerId(self.next);
        self.pending.insert(id, delay);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if self.pending.remove(&id).is_some() {
            self.cancelled.push(id);
        }
    }
}

type TestSession = VoiceSession<FakeBackend, ManualTimers>;

fn session_with(config: VoiceConfig) -> TestSession {
    VoiceSession::new(config, FakeBackend::default(), ManualTimers::default())
}

fn session() -> TestSession {
    session_with(VoiceConfig::default())
}

fn fire_pending(session: &mut TestSession) -> Duration {
    let (id, delay) = session.timers().only_pending();
    // Firing consumes the timer, the way a real scheduler would
    session.timers_mut().pending.remove(&id);
    session.handle_event(SessionEvent::TimerFired(id));
    delay
}

fn listening_session() -> TestSession {
    let mut session = session();
    session.start_listening();
    session.handle_event(RecognitionEvent::Started.into());
    assert_eq!(session.phase(), SessionPhase::Listening);
    session
}

/// Host whose navigator records routes
fn recording_host() -> (SessionHost, Arc<Mutex<Vec<String>>>) {
    let routes = Arc::new(Mutex::new(Vec::new()));
    let sink = routes.clone();
    let host = SessionHost::new().with_navigator(move |path: &str| -> anyhow::Result<()> {
        sink.lock().unwrap().push(path.to_string());
        Ok(())
    });
    (host, routes)
}

#[test]
fn test_initialize_configures_backend() {
    let mut session = session();
    assert!(session.initialize());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.state().is_supported);
    assert!(session.state().is_initialized);
    assert_eq!(
        session.backend().settings,
        Some(RecognitionSettings {
            continuous: true,
            interim_results: true,
            language: "en-US".to_string(),
            max_alternatives: 3,
        })
    );
    assert!(session.timers().pending.is_empty());
}

#[test]
fn test_unsupported_is_permanent() {
    let backend = FakeBackend {
        unsupported: true,
        ..Default::default()
    };
    let mut session = VoiceSession::new(VoiceConfig::default(), backend, ManualTimers::default());

    session.start_listening();
    assert_eq!(session.phase(), SessionPhase::Unsupported);
    assert!(!session.state().is_supported);
    assert!(session.state().error.as_deref().unwrap().contains("not supported"));

    session.start_listening();
    assert_eq!(session.backend().starts, 0);
    assert!(!session.initialize());
}

#[test]
fn test_double_start_keeps_one_backend_session() {
    let mut session = session();
    session.start_listening();
    session.start_listening();
    session.handle_event(RecognitionEvent::Started.into());
    session.start_listening();

    assert_eq!(session.backend().starts, 1);
    assert!(session.state().is_listening);
    assert!(session.state().error.is_none());
}

#[test]
fn test_stop_while_idle_is_noop() {
    let mut session = session();
    session.initialize();
    session.stop_listening();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.backend().stops, 0);
}

#[test]
fn test_no_restart_after_manual_stop() {
    let mut session = listening_session();
    session.stop_listening();
    assert_eq!(session.phase(), SessionPhase::Stopping);

    session.handle_event(RecognitionEvent::Ended.into());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(!session.state().is_listening);
    assert!(session.timers().pending.is_empty());
    assert_eq!(session.backend().starts, 1);
}

#[test]
fn test_unexpected_end_restarts_after_delay() {
    let mut session = listening_session();
    session.handle_event(RecognitionEvent::Ended.into());
    assert_eq!(session.phase(), SessionPhase::Restarting);
    assert!(!session.state().is_listening);

    // The recognizer stopped on its own, so a new start is allowed
    session.backend_mut().active = false;
    assert_eq!(fire_pending(&mut session), RESTART_DELAY);
    assert_eq!(session.phase(), SessionPhase::Starting);
    assert_eq!(session.backend().starts, 2);
}

#[test]
fn test_stop_cancels_pending_restart() {
    let mut session = listening_session();
    session.handle_event(RecognitionEvent::Ended.into());
    let (id, _) = session.timers().only_pending();

    session.stop_listening();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.timers().cancelled, vec![id]);

    // A late expiry of the cancelled timer changes nothing
    session.handle_event(SessionEvent::TimerFired(id));
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.backend().starts, 1);
}

#[test]
fn test_retryable_error_restarts_after_longer_delay() {
    let mut session = listening_session();
    session.handle_event(RecognitionEvent::error("no-speech").into());
    assert_eq!(
        session.state().error.as_deref(),
        Some("Speech recognition error: no-speech")
    );
    assert_eq!(session.phase(), SessionPhase::Restarting);

    // The end that follows the error does not schedule a second restart
    session.backend_mut().active = false;
    session.handle_event(RecognitionEvent::Ended.into());
    assert_eq!(fire_pending(&mut session), ERROR_RESTART_DELAY);
    assert_eq!(session.backend().starts, 2);

    session.handle_event(RecognitionEvent::Started.into());
    assert!(session.state().error.is_none());
}

#[test]
fn test_other_errors_halt_until_restarted() {
    let mut session = listening_session();
    session.handle_event(RecognitionEvent::error("network").into());
    session.backend_mut().active = false;
    session.handle_event(RecognitionEvent::Ended.into());

    assert_eq!(session.phase(), SessionPhase::Error);
    assert!(session.timers().pending.is_empty());
    assert_eq!(
        session.state().error.as_deref(),
        Some("Speech recognition error: network")
    );

    session.clear_error();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.state().error.is_none());

    session.start_listening();
    assert_eq!(session.backend().starts, 2);
}

#[test]
fn test_start_failure_sets_error() {
    let backend = FakeBackend {
        fail_start: true,
        ..Default::default()
    };
    let mut session = VoiceSession::new(VoiceConfig::default(), backend, ManualTimers::default());
    session.start_listening();

    assert_eq!(session.phase(), SessionPhase::Error);
    assert_eq!(
        session.state().error.as_deref(),
        Some("Failed to start listening: microphone busy")
    );
}

#[test]
fn test_auto_start_after_delay() {
    let config = VoiceConfig {
        auto_start: true,
        ..VoiceConfig::default()
    };
    let mut session = session_with(config);
    session.initialize();
    assert_eq!(session.backend().starts, 0);

    assert_eq!(fire_pending(&mut session), AUTO_START_DELAY);
    assert_eq!(session.backend().starts, 1);
    assert_eq!(session.phase(), SessionPhase::Starting);
}

#[test]
fn test_final_result_executes_command() {
    let (host, routes) = recording_host();
    let mut session = listening_session().with_host(host);

    session.handle_event(RecognitionEvent::final_result("  show projects ").into());

    assert_eq!(*routes.lock().unwrap(), vec!["/projects"]);
    let state = session.state();
    assert_eq!(state.last_transcript, "show projects");
    assert_eq!(state.last_command, "nav-projects");
    assert_eq!(state.confidence, 100.0);
    assert!(state.last_result.as_ref().unwrap().success);
}

#[test]
fn test_interim_results_gated_by_confidence() {
    let (host, routes) = recording_host();
    let mut session = listening_session().with_host(host);

    session.handle_event(RecognitionEvent::interim_result("go home", 0.5).into());
    assert!(routes.lock().unwrap().is_empty());
    assert_eq!(session.state().last_transcript, "go home");
    assert_eq!(session.state().confidence, 50.0);

    session.handle_event(RecognitionEvent::interim_result("go home", 0.9).into());
    assert_eq!(routes.lock().unwrap().len(), 1);

    // The final form of an utterance already acted on is not executed again
    session.handle_event(RecognitionEvent::final_result("go home").into());
    assert_eq!(routes.lock().unwrap().len(), 1);

    session.handle_event(RecognitionEvent::final_result("go home").into());
    assert_eq!(routes.lock().unwrap().len(), 2);
}

#[test]
fn test_interim_results_ignored_when_disabled() {
    let config = VoiceConfig {
        interim_results: false,
        ..VoiceConfig::default()
    };
    let mut session = session_with(config);
    session.start_listening();
    session.handle_event(RecognitionEvent::interim_result("go home", 0.99).into());
    assert!(session.state().last_transcript.is_empty());
    assert!(session.state().last_result.is_none());
}

#[test]
fn test_wake_word_gating() {
    let config = VoiceConfig {
        enable_wake_words: true,
        enable_speech_feedback: true,
        ..VoiceConfig::default()
    };
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let sink = spoken.clone();
    let (host, routes) = recording_host();
    let host = host.with_speech(move |text: &str, _lang: &str| {
        sink.lock().unwrap().push(text.to_string());
    });

    let mut session = session_with(config).with_host(host);
    session.start_listening();
    session.handle_event(RecognitionEvent::Started.into());

    session.handle_event(RecognitionEvent::final_result("go home").into());
    assert!(routes.lock().unwrap().is_empty());
    assert!(session.state().last_result.is_none());

    session.handle_event(RecognitionEvent::final_result("hey beast developer").into());
    assert!(routes.lock().unwrap().is_empty());
    assert_eq!(*spoken.lock().unwrap(), vec![WAKE_ACKNOWLEDGEMENT]);

    session.handle_event(RecognitionEvent::final_result("Hey beast developer, go home").into());
    assert_eq!(*routes.lock().unwrap(), vec!["/"]);
    assert_eq!(spoken.lock().unwrap().last().unwrap(), "Navigating to /");
}

#[test]
fn test_stop_command_stops_session() {
    let mut session = listening_session();
    let result = session.execute_command("stop listening");

    assert!(result.success);
    assert_eq!(result.command_id(), Some("stop-listening"));
    assert_eq!(session.phase(), SessionPhase::Stopping);
    assert_eq!(session.backend().stops, 1);

    session.handle_event(RecognitionEvent::Ended.into());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.timers().pending.is_empty());
}

#[test]
fn test_start_command_starts_session() {
    let mut session = session();
    session.initialize();
    let result = session.execute_command("awaz suno");
    assert_eq!(result.command_id(), Some("start-listening-hi"));
    assert_eq!(session.phase(), SessionPhase::Starting);
}

#[test]
fn test_no_match_is_not_a_session_error() {
    let mut session = listening_session();
    session.handle_event(RecognitionEvent::final_result("qwerty asdf zxcv").into());

    let result = session.state().last_result.clone().unwrap();
    assert!(!result.success);
    assert!(session.state().last_command.is_empty());
    assert!(session.state().error.is_none());
}

#[test]
fn test_add_and_remove_commands() {
    let mut session = session();
    let calls = Arc::new(Mutex::new(0));
    let counter = calls.clone();
    session.add_command(VoiceCommand::custom_with_callback("theme", "dark mode", move || {
        *counter.lock().unwrap() += 1;
        Ok(())
    }));

    assert!(session.execute_command("dark mode").success);
    assert_eq!(*calls.lock().unwrap(), 1);

    assert_eq!(session.remove_command("theme"), 1);
    assert!(!session.execute_command("dark mode").success);
}

#[test]
fn test_host_callbacks_handle_custom_commands() {
    let calls = Arc::new(Mutex::new(0));
    let counter = calls.clone();
    let host = SessionHost::new().with_callback(
        "confetti",
        CustomCallback::new(move || {
            *counter.lock().unwrap() += 1;
            Ok(())
        }),
    );
    let mut session = session().with_host(host);
    session.add_command(VoiceCommand::custom("confetti", "celebrate"));

    assert!(session.execute_command("celebrate").success);
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[test]
fn test_update_config() {
    let mut session = session();
    session.initialize();

    session
        .update_config(ConfigUpdate {
            languages: Some(vec!["hi-IN".to_string(), "en-US".to_string()]),
            commands: Some(vec![VoiceCommand::route("only", "only this", "/only")]),
            continuous: Some(false),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(session.state().language, "hi-IN");
    assert_eq!(session.backend().languages, vec!["hi-IN"]);
    assert_eq!(session.commands().len(), 1);
    let settings = session.backend().settings.clone().unwrap();
    assert!(!settings.continuous);
    assert_eq!(settings.language, "hi-IN");

    let err = session.update_config(ConfigUpdate {
        confidence: Some(2.0),
        ..Default::default()
    });
    assert!(err.is_err());
    assert_eq!(session.config().confidence, 0.7);
}

#[test]
fn test_speak_requires_feedback_enabled() {
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let sink = spoken.clone();
    let host = SessionHost::new().with_speech(move |text: &str, lang: &str| {
        sink.lock().unwrap().push(format!("{lang}:{text}"));
    });
    let mut session = session().with_host(host);

    session.speak("hello", None);
    assert!(spoken.lock().unwrap().is_empty());

    session
        .update_config(ConfigUpdate {
            enable_speech_feedback: Some(true),
            ..Default::default()
        })
        .unwrap();
    session.speak("hello", None);
    session.speak("namaste", Some("hi-IN"));
    assert_eq!(*spoken.lock().unwrap(), vec!["en-US:hello", "hi-IN:namaste"]);
}

#[test]
fn test_toggle_listening() {
    let mut session = session();
    session.toggle_listening();
    assert_eq!(session.phase(), SessionPhase::Starting);
    session.handle_event(RecognitionEvent::Started.into());
    session.toggle_listening();
    assert_eq!(session.phase(), SessionPhase::Stopping);
}

#[test]
fn test_dispose_cancels_timers_and_stops_backend() {
    let mut session = listening_session();
    session.handle_event(RecognitionEvent::Ended.into());
    let (id, _) = session.timers().only_pending();
    session.dispose();

    assert_eq!(session.phase(), SessionPhase::Disposed);
    assert!(session.timers().cancelled.contains(&id));
    assert!(session.timers().pending.is_empty());

    // Events after dispose are ignored
    session.handle_event(SessionEvent::TimerFired(id));
    session.start_listening();
    assert_eq!(session.phase(), SessionPhase::Disposed);
    assert_eq!(session.backend().starts, 1);
}

#[test]
fn test_dispose_stops_active_backend() {
    let mut session = listening_session();
    session.dispose();
    assert_eq!(session.backend().stops, 1);
    assert!(!session.backend().active);
    assert!(!session.state().is_listening);
}

#[test]
fn test_notifications_are_drained() {
    let mut session = listening_session();
    session.take_notifications();

    session.execute_command("go to top");
    let notifications = session.take_notifications();
    assert!(notifications
        .iter()
        .any(|n| matches!(n, SessionNotification::CommandExecuted(r) if r.command_id() == Some("scroll-top"))));
    assert!(notifications
        .iter()
        .any(|n| matches!(n, SessionNotification::StateChanged(_))));
    assert!(session.take_notifications().is_empty());
}
