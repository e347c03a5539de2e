//! VoiceSession - the recognition lifecycle state machine
//!
//! The session never blocks and never spawns. It reacts to calls from the
//! host (`start_listening`, `stop_listening`, ...) and to [`SessionEvent`]s
//! the host feeds in (backend lifecycle, results, timer expirations), and
//! requests side effects through its backend and timer seams.
//!
//! ```text
//!  Uninitialized -> Initializing -> Idle <-> Starting -> Listening
//!                         |           ^                      |
//!                         v           |                      v
//!                    Unsupported      +------ Stopping <-----+
//!                                     |
//!                   Restarting <------+-- (end or retryable error)
//!                   Error (halted until the caller starts again)
//! ```

use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::backend::{RecognitionBackend, RecognitionSettings, TimerId, TimerScheduler};
use super::types::{
    ConfigUpdate, RecognitionEvent, SessionEvent, SessionNotification, SessionPhase,
    VoiceControlState,
};
use crate::commands::{CommandRegistry, CustomCallback, VoiceCommand};
use crate::config::VoiceConfig;
use crate::error::VoiceError;
use crate::executor::{
    CallbackTable, ExecutionContext, ExecutionResult, ListeningControl, Navigator, SpeechOutput,
    Viewport, execute_with_registry,
};
use crate::matcher::normalize;
use crate::wake::{GateOutcome, WakeWordGate};

/// Delay before restarting after the backend ends on its own
pub const RESTART_DELAY: Duration = Duration::from_secs(1);

/// Delay before restarting after a retryable backend error
pub const ERROR_RESTART_DELAY: Duration = Duration::from_secs(2);

/// Delay between initialization and the automatic first start
pub const AUTO_START_DELAY: Duration = Duration::from_secs(1);

pub const MAX_ALTERNATIVES: u32 = 3;

/// Spoken when a wake word arrives without a command
pub const WAKE_ACKNOWLEDGEMENT: &str = "Yes, I'm listening";

const RETRYABLE_ERRORS: [&str; 2] = ["no-speech", "audio-capture"];

/// Application collaborators a session executes commands against
#[derive(Default)]
pub struct SessionHost {
    pub navigator: Option<Box<dyn Navigator + Send>>,
    pub viewport: Option<Box<dyn Viewport + Send>>,
    pub speech: Option<Box<dyn SpeechOutput + Send>>,
    pub callbacks: CallbackTable,
}

impl SessionHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_navigator(mut self, navigator: impl Navigator + Send + 'static) -> Self {
        self.navigator = Some(Box::new(navigator));
        self
    }

    pub fn with_viewport(mut self, viewport: impl Viewport + Send + 'static) -> Self {
        self.viewport = Some(Box::new(viewport));
        self
    }

    pub fn with_speech(mut self, speech: impl SpeechOutput + Send + 'static) -> Self {
        self.speech = Some(Box::new(speech));
        self
    }

    /// Register a handler for a custom command id
    pub fn with_callback(mut self, id: impl Into<String>, callback: CustomCallback) -> Self {
        self.callbacks.insert(id.into(), callback);
        self
    }
}

/// Start/stop requests raised by listening-control commands.
/// Applied once the command has finished executing.
#[derive(Debug, Default)]
struct ControlRequests {
    start: bool,
    stop: bool,
}

impl ListeningControl for ControlRequests {
    fn start_listening(&mut self) {
        self.start = true;
    }

    fn stop_listening(&mut self) {
        self.stop = true;
    }
}

/// A continuous speech-recognition session and its command pipeline
pub struct VoiceSession<B: RecognitionBackend, T: TimerScheduler> {
    backend: B,
    timers: T,
    host: SessionHost,
    registry: CommandRegistry,
    gate: WakeWordGate,
    config: VoiceConfig,
    state: VoiceControlState,
    phase: SessionPhase,
    manual_stop: bool,
    /// Set by a non-retryable error; blocks auto-restart until the next start
    halted: bool,
    restart_timer: Option<TimerId>,
    autostart_timer: Option<TimerId>,
    /// Normalized text of the last interim result that was acted on
    last_actioned_interim: Option<String>,
    notifications: Vec<SessionNotification>,
}

impl<B: RecognitionBackend, T: TimerScheduler> VoiceSession<B, T> {
    pub fn new(config: VoiceConfig, backend: B, timers: T) -> Self {
        let registry = CommandRegistry::from_commands(config.effective_commands());
        let gate = WakeWordGate::new(config.enable_wake_words, config.wake_words.clone())
            .with_threshold(config.wake_word_threshold);
        let state = VoiceControlState {
            language: config.language().to_string(),
            ..Default::default()
        };

        Self {
            backend,
            timers,
            host: SessionHost::default(),
            registry,
            gate,
            config,
            state,
            phase: SessionPhase::Uninitialized,
            manual_stop: false,
            halted: false,
            restart_timer: None,
            autostart_timer: None,
            last_actioned_interim: None,
            notifications: Vec::new(),
        }
    }

    pub fn with_host(mut self, host: SessionHost) -> Self {
        self.host = host;
        self
    }

    pub fn state(&self) -> &VoiceControlState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Drain notifications emitted since the last call
    pub fn take_notifications(&mut self) -> Vec<SessionNotification> {
        std::mem::take(&mut self.notifications)
    }

    fn settings(&self) -> RecognitionSettings {
        RecognitionSettings {
            continuous: self.config.continuous,
            interim_results: self.config.interim_results,
            language: self.state.language.clone(),
            max_alternatives: MAX_ALTERNATIVES,
        }
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            info!(from = %self.phase, to = %phase, "Voice session phase changed");
            self.phase = phase;
        }
    }

    fn publish_state(&mut self) {
        self.notifications
            .push(SessionNotification::StateChanged(self.state.clone()));
    }

    fn report_error(&mut self, message: String) {
        error!("{message}");
        self.state.error = Some(message.clone());
        self.notifications.push(SessionNotification::Error(message));
    }

    fn cancel_restart(&mut self) {
        if let Some(id) = self.restart_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn cancel_autostart(&mut self) {
        if let Some(id) = self.autostart_timer.take() {
            self.timers.cancel(id);
        }
    }

    /// Probe and configure the backend. Returns whether the session is usable.
    ///
    /// Runs once; later calls report the outcome of the first one.
    pub fn initialize(&mut self) -> bool {
        match self.phase {
            SessionPhase::Uninitialized => {}
            SessionPhase::Unsupported | SessionPhase::Disposed => return false,
            _ => return true,
        }
        self.set_phase(SessionPhase::Initializing);

        if !self.backend.is_supported() {
            self.state.is_supported = false;
            self.set_phase(SessionPhase::Unsupported);
            self.report_error("Speech recognition not supported in this environment".to_string());
            self.publish_state();
            return false;
        }

        let settings = self.settings();
        if let Err(e) = self.backend.configure(&settings) {
            self.state.is_supported = false;
            self.set_phase(SessionPhase::Unsupported);
            self.report_error(format!("Failed to initialize speech recognition: {e}"));
            self.publish_state();
            return false;
        }

        self.state.is_supported = true;
        self.state.is_initialized = true;
        self.set_phase(SessionPhase::Idle);
        self.publish_state();

        if self.config.auto_start {
            self.autostart_timer = Some(self.timers.schedule(AUTO_START_DELAY));
        }
        true
    }

    /// Begin listening. No-op while already starting or listening.
    pub fn start_listening(&mut self) {
        if self.phase == SessionPhase::Uninitialized && !self.initialize() {
            return;
        }

        match self.phase {
            SessionPhase::Idle | SessionPhase::Error | SessionPhase::Restarting => {}
            SessionPhase::Stopping => {
                // Let the pending end restart the backend instead of stopping
                self.manual_stop = false;
                return;
            }
            phase => {
                debug!(%phase, "Start ignored");
                return;
            }
        }

        self.manual_stop = false;
        self.halted = false;
        self.cancel_restart();
        self.cancel_autostart();

        match self.backend.start() {
            Ok(()) => self.set_phase(SessionPhase::Starting),
            Err(e) => {
                self.halted = true;
                self.set_phase(SessionPhase::Error);
                self.report_error(format!("Failed to start listening: {e}"));
                self.publish_state();
            }
        }
    }

    /// Stop listening and cancel any pending restart. No-op while idle.
    pub fn stop_listening(&mut self) {
        self.cancel_autostart();

        match self.phase {
            SessionPhase::Starting | SessionPhase::Listening => {
                self.manual_stop = true;
                self.cancel_restart();
                match self.backend.stop() {
                    Ok(()) => self.set_phase(SessionPhase::Stopping),
                    Err(e) => {
                        self.state.is_listening = false;
                        self.set_phase(SessionPhase::Idle);
                        self.report_error(format!("Failed to stop listening: {e}"));
                        self.publish_state();
                    }
                }
            }
            SessionPhase::Restarting => {
                self.manual_stop = true;
                self.cancel_restart();
                self.set_phase(SessionPhase::Idle);
                self.publish_state();
            }
            SessionPhase::Stopping => self.manual_stop = true,
            phase => debug!(%phase, "Stop ignored"),
        }
    }

    pub fn toggle_listening(&mut self) {
        match self.phase {
            SessionPhase::Starting | SessionPhase::Listening | SessionPhase::Restarting => {
                self.stop_listening()
            }
            _ => self.start_listening(),
        }
    }

    /// Feed one backend or timer event into the session
    pub fn handle_event(&mut self, event: SessionEvent) {
        if self.phase == SessionPhase::Disposed {
            debug!(?event, "Event after dispose ignored");
            return;
        }

        match event {
            SessionEvent::Recognition(RecognitionEvent::Started) => self.on_started(),
            SessionEvent::Recognition(RecognitionEvent::Ended) => self.on_ended(),
            SessionEvent::Recognition(RecognitionEvent::Result {
                transcript,
                is_final,
                confidence,
            }) => self.on_result(&transcript, is_final, confidence),
            SessionEvent::Recognition(RecognitionEvent::Error { code }) => self.on_error(&code),
            SessionEvent::TimerFired(id) => self.on_timer(id),
        }
    }

    fn on_started(&mut self) {
        self.state.is_listening = true;
        self.state.error = None;
        if self.phase != SessionPhase::Stopping {
            self.set_phase(SessionPhase::Listening);
        }
        self.publish_state();
    }

    fn on_ended(&mut self) {
        self.state.is_listening = false;

        if self.manual_stop {
            self.set_phase(SessionPhase::Idle);
        } else if self.halted || self.restart_timer.is_some() {
            // Error already decided what happens next
        } else if self.phase.is_active() {
            debug!("Recognition ended unexpectedly, scheduling restart");
            self.restart_timer = Some(self.timers.schedule(RESTART_DELAY));
            self.set_phase(SessionPhase::Restarting);
        }
        self.publish_state();
    }

    fn on_error(&mut self, code: &str) {
        self.state.is_listening = false;
        self.report_error(format!("Speech recognition error: {code}"));

        let running = self.phase.is_active() || self.phase == SessionPhase::Restarting;
        if self.manual_stop || !running {
            // Nothing to restart; a pending end settles the session in Idle
        } else if RETRYABLE_ERRORS.contains(&code) {
            self.cancel_restart();
            self.restart_timer = Some(self.timers.schedule(ERROR_RESTART_DELAY));
            self.set_phase(SessionPhase::Restarting);
        } else {
            self.halted = true;
            self.set_phase(SessionPhase::Error);
        }
        self.publish_state();
    }

    fn on_timer(&mut self, id: TimerId) {
        if self.restart_timer == Some(id) {
            self.restart_timer = None;
            if self.manual_stop || self.halted {
                return;
            }
            debug!("Restarting recognition");
            self.start_listening();
        } else if self.autostart_timer == Some(id) {
            self.autostart_timer = None;
            self.start_listening();
        } else {
            debug!(?id, "Stale timer ignored");
        }
    }

    fn on_result(&mut self, transcript: &str, is_final: bool, confidence: f64) {
        if !is_final && !self.config.interim_results {
            return;
        }

        let transcript = transcript.trim();
        self.state.last_transcript = transcript.to_string();
        self.state.confidence = confidence * 100.0;

        let actionable = is_final || confidence > self.config.confidence;
        if actionable && !transcript.is_empty() && !self.is_repeat(transcript, is_final) {
            self.handle_voice_input(transcript);
        }
        self.publish_state();
    }

    /// Whether this result repeats an interim result that was already acted on
    fn is_repeat(&mut self, transcript: &str, is_final: bool) -> bool {
        let normalized = normalize(transcript);
        if is_final {
            return self.last_actioned_interim.take().as_deref() == Some(normalized.as_str());
        }
        if self.last_actioned_interim.as_deref() == Some(normalized.as_str()) {
            return true;
        }
        self.last_actioned_interim = Some(normalized);
        false
    }

    fn handle_voice_input(&mut self, transcript: &str) {
        match self.gate.evaluate(transcript) {
            GateOutcome::Dropped => {}
            GateOutcome::WakeOnly => self.speak(WAKE_ACKNOWLEDGEMENT, None),
            GateOutcome::Command(text) => {
                self.execute_command(&text);
            }
        }
    }

    /// Match and execute a transcript, bypassing the wake-word gate
    pub fn execute_command(&mut self, transcript: &str) -> ExecutionResult {
        let mut requests = ControlRequests::default();
        let language = self.state.language.clone();

        let result = {
            let host = &mut self.host;
            let mut ctx = ExecutionContext::new()
                .with_language(&language)
                .with_callbacks(&host.callbacks)
                .with_listening(&mut requests);
            if let Some(navigator) = host.navigator.as_deref_mut() {
                ctx = ctx.with_navigator(navigator);
            }
            if let Some(viewport) = host.viewport.as_deref_mut() {
                ctx = ctx.with_viewport(viewport);
            }
            if self.config.enable_speech_feedback {
                if let Some(speech) = host.speech.as_deref_mut() {
                    ctx = ctx.with_speech(speech);
                }
            }
            execute_with_registry(transcript, &self.registry, &mut ctx, self.config.confidence)
        };

        self.state.last_command = result.command_id().unwrap_or_default().to_string();
        self.state.last_result = Some(result.clone());
        self.notifications
            .push(SessionNotification::CommandExecuted(result.clone()));
        self.publish_state();

        if requests.stop {
            self.stop_listening();
        }
        if requests.start {
            self.start_listening();
        }
        result
    }

    /// Speak `text` when speech feedback is enabled
    pub fn speak(&mut self, text: &str, lang: Option<&str>) {
        if !self.config.enable_speech_feedback {
            return;
        }
        let lang = lang.unwrap_or(&self.state.language);
        match self.host.speech.as_mut() {
            Some(speech) => speech.speak(text, lang),
            None => debug!(text, "No speech output attached"),
        }
    }

    pub fn add_command(&mut self, command: VoiceCommand) {
        self.registry.add(command);
    }

    /// Remove every command with `id`
    pub fn remove_command(&mut self, id: &str) -> usize {
        self.registry.remove(id)
    }

    /// Apply a partial configuration change
    ///
    /// Values are checked before anything is applied. Recognition settings
    /// are pushed to an initialized backend and take effect on its next start.
    pub fn update_config(&mut self, update: ConfigUpdate) -> Result<(), VoiceError> {
        if let Some(confidence) = update.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(VoiceError::InvalidConfig(format!(
                    "confidence must be between 0.0 and 1.0, got {confidence}"
                )));
            }
        }
        if let Some(languages) = &update.languages {
            if languages.is_empty() {
                return Err(VoiceError::InvalidConfig(
                    "languages must contain at least one locale".to_string(),
                ));
            }
        }

        if let Some(commands) = update.commands {
            self.registry.replace_all(commands);
        }
        if let Some(wake_words) = update.wake_words {
            self.gate.wake_words = wake_words.clone();
            self.config.wake_words = wake_words;
        }
        if let Some(enabled) = update.enable_wake_words {
            self.gate.enabled = enabled;
            self.config.enable_wake_words = enabled;
        }
        if let Some(enabled) = update.enable_speech_feedback {
            self.config.enable_speech_feedback = enabled;
        }
        if let Some(confidence) = update.confidence {
            self.config.confidence = confidence;
        }

        let mut reconfigure = false;
        if let Some(continuous) = update.continuous {
            reconfigure |= self.config.continuous != continuous;
            self.config.continuous = continuous;
        }
        if let Some(interim_results) = update.interim_results {
            reconfigure |= self.config.interim_results != interim_results;
            self.config.interim_results = interim_results;
        }
        if let Some(languages) = update.languages {
            self.config.languages = languages;
            let language = self.config.language().to_string();
            if self.state.is_initialized && language != self.state.language {
                if let Err(e) = self.backend.set_language(&language) {
                    warn!(%language, "Failed to switch recognition language: {e}");
                }
            }
            self.state.language = language;
        }
        if reconfigure && self.state.is_initialized {
            let settings = self.settings();
            if let Err(e) = self.backend.configure(&settings) {
                warn!("Failed to reconfigure speech recognition: {e}");
            }
        }

        self.publish_state();
        Ok(())
    }

    /// Clear the error message; a halted session returns to Idle
    pub fn clear_error(&mut self) {
        self.state.error = None;
        if self.phase == SessionPhase::Error {
            self.halted = false;
            self.set_phase(SessionPhase::Idle);
        }
        self.publish_state();
    }

    /// Cancel timers, stop an active backend session and disable the session
    pub fn dispose(&mut self) {
        if self.phase == SessionPhase::Disposed {
            return;
        }

        self.cancel_restart();
        self.cancel_autostart();
        if self.phase.is_active() {
            if let Err(e) = self.backend.stop() {
                warn!("Failed to stop recognition during dispose: {e}");
            }
        }

        self.manual_stop = true;
        self.state.is_listening = false;
        self.set_phase(SessionPhase::Disposed);
        self.publish_state();
    }
}

impl<B: RecognitionBackend, T: TimerScheduler> Drop for VoiceSession<B, T> {
    fn drop(&mut self) {
        self.dispose();
    }
}
