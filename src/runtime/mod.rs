//! Tokio driver for a [`VoiceSession`]
//!
//! One task owns the session. Everything that touches it (UI control calls,
//! backend events, timer expirations) arrives over a single unbounded channel,
//! so the session sees a strictly ordered event stream and needs no locks.

mod timers;

pub use timers::TokioTimers;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::commands::VoiceCommand;
use crate::config::VoiceConfig;
use crate::error::VoiceError;
use crate::executor::ExecutionResult;
use crate::session::{
    ConfigUpdate, RecognitionBackend, RecognitionEvent, SessionEvent, SessionHost,
    SessionNotification, SessionPhase, VoiceControlState, VoiceSession,
};

/// Requests from UI adapters
pub(crate) enum ControlMessage {
    Start,
    Stop,
    Toggle,
    Execute {
        transcript: String,
        reply: oneshot::Sender<ExecutionResult>,
    },
    AddCommand(VoiceCommand),
    RemoveCommand(String),
    UpdateConfig {
        update: ConfigUpdate,
        reply: oneshot::Sender<Result<(), VoiceError>>,
    },
    ClearError,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

pub(crate) enum DriverMessage {
    Control(ControlMessage),
    Session(SessionEvent),
}

/// Point-in-time copy of the session state
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub state: VoiceControlState,
}

/// Cloneable handle used by UI adapters to control a running session
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<DriverMessage>,
}

impl SessionHandle {
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, message: ControlMessage) -> Result<(), VoiceError> {
        self.tx
            .send(DriverMessage::Control(message))
            .map_err(|_| VoiceError::RuntimeStopped)
    }

    pub fn start_listening(&self) -> Result<(), VoiceError> {
        self.send(ControlMessage::Start)
    }

    pub fn stop_listening(&self) -> Result<(), VoiceError> {
        self.send(ControlMessage::Stop)
    }

    pub fn toggle_listening(&self) -> Result<(), VoiceError> {
        self.send(ControlMessage::Toggle)
    }

    pub fn add_command(&self, command: VoiceCommand) -> Result<(), VoiceError> {
        self.send(ControlMessage::AddCommand(command))
    }

    pub fn remove_command(&self, id: impl Into<String>) -> Result<(), VoiceError> {
        self.send(ControlMessage::RemoveCommand(id.into()))
    }

    pub fn clear_error(&self) -> Result<(), VoiceError> {
        self.send(ControlMessage::ClearError)
    }

    /// Stop the session and end the driver task
    pub fn shutdown(&self) -> Result<(), VoiceError> {
        self.send(ControlMessage::Shutdown)
    }

    /// Match and execute a transcript, bypassing the wake-word gate
    pub async fn execute(&self, transcript: impl Into<String>) -> Result<ExecutionResult, VoiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(ControlMessage::Execute {
            transcript: transcript.into(),
            reply,
        })?;
        rx.await.map_err(|_| VoiceError::RuntimeStopped)
    }

    pub async fn update_config(&self, update: ConfigUpdate) -> Result<(), VoiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(ControlMessage::UpdateConfig { update, reply })?;
        rx.await.map_err(|_| VoiceError::RuntimeStopped)?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, VoiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(ControlMessage::Snapshot(reply))?;
        rx.await.map_err(|_| VoiceError::RuntimeStopped)
    }
}

/// Where a recognition backend reports what happened
///
/// The sink does not keep the runtime alive: once every [`SessionHandle`] is
/// dropped the driver disposes the session and sends start failing with
/// [`VoiceError::RuntimeStopped`].
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::WeakUnboundedSender<DriverMessage>,
}

impl EventSink {
    pub fn send(&self, event: RecognitionEvent) -> Result<(), VoiceError> {
        let tx = self.tx.upgrade().ok_or(VoiceError::RuntimeStopped)?;
        tx.send(DriverMessage::Session(SessionEvent::Recognition(event)))
            .map_err(|_| VoiceError::RuntimeStopped)
    }

    pub fn started(&self) -> Result<(), VoiceError> {
        self.send(RecognitionEvent::Started)
    }

    pub fn ended(&self) -> Result<(), VoiceError> {
        self.send(RecognitionEvent::Ended)
    }

    pub fn final_result(&self, transcript: impl Into<String>) -> Result<(), VoiceError> {
        self.send(RecognitionEvent::final_result(transcript))
    }

    pub fn error(&self, code: impl Into<String>) -> Result<(), VoiceError> {
        self.send(RecognitionEvent::error(code))
    }
}

/// A session running on its own task
///
/// The task ends after [`SessionHandle::shutdown`] or when the last
/// `SessionHandle` clone is dropped; either way the session is disposed.
pub struct SpawnedSession {
    pub handle: SessionHandle,
    /// Same channel the backend was given; useful for hosts that feed events themselves
    pub events: EventSink,
    pub notifications: mpsc::UnboundedReceiver<SessionNotification>,
    pub task: JoinHandle<()>,
}

/// Spawn a session on the current tokio runtime
///
/// `make_backend` receives the [`EventSink`] the backend must report its
/// lifecycle and results through.
pub fn spawn_session<B, F>(config: VoiceConfig, host: SessionHost, make_backend: F) -> SpawnedSession
where
    B: RecognitionBackend + Send + 'static,
    F: FnOnce(EventSink) -> B,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let (notify_tx, notify_rx) = mpsc::unbounded_channel();

    let events = EventSink { tx: tx.downgrade() };
    let backend = make_backend(events.clone());
    let timers = TokioTimers::new(tx.downgrade());
    let session = VoiceSession::new(config, backend, timers).with_host(host);

    let task = tokio::spawn(drive(session, rx, notify_tx));

    SpawnedSession {
        handle: SessionHandle { tx },
        events,
        notifications: notify_rx,
        task,
    }
}

async fn drive<B: RecognitionBackend>(
    mut session: VoiceSession<B, TokioTimers>,
    mut rx: mpsc::UnboundedReceiver<DriverMessage>,
    notify_tx: mpsc::UnboundedSender<SessionNotification>,
) {
    info!("Voice session runtime started");
    session.initialize();
    forward(&mut session, &notify_tx);

    while let Some(message) = rx.recv().await {
        let keep_running = match message {
            DriverMessage::Session(event) => {
                session.handle_event(event);
                true
            }
            DriverMessage::Control(control) => apply(&mut session, control),
        };
        forward(&mut session, &notify_tx);
        if !keep_running {
            break;
        }
    }

    session.dispose();
    forward(&mut session, &notify_tx);
    info!("Voice session runtime stopped");
}

fn apply<B: RecognitionBackend>(session: &mut VoiceSession<B, TokioTimers>, control: ControlMessage) -> bool {
    match control {
        ControlMessage::Start => session.start_listening(),
        ControlMessage::Stop => session.stop_listening(),
        ControlMessage::Toggle => session.toggle_listening(),
        ControlMessage::Execute { transcript, reply } => {
            let result = session.execute_command(&transcript);
            let _ = reply.send(result);
        }
        ControlMessage::AddCommand(command) => session.add_command(command),
        ControlMessage::RemoveCommand(id) => {
            session.remove_command(&id);
        }
        ControlMessage::UpdateConfig { update, reply } => {
            let _ = reply.send(session.update_config(update));
        }
        ControlMessage::ClearError => session.clear_error(),
        ControlMessage::Snapshot(reply) => {
            let _ = reply.send(SessionSnapshot {
                phase: session.phase(),
                state: session.state().clone(),
            });
        }
        ControlMessage::Shutdown => {
            debug!("Voice session shutdown requested");
            return false;
        }
    }
    true
}

fn forward<B: RecognitionBackend>(
    session: &mut VoiceSession<B, TokioTimers>,
    notify_tx: &mpsc::UnboundedSender<SessionNotification>,
) {
    for notification in session.take_notifications() {
        // Nobody listening is fine; the state is still queryable via snapshots
        let _ = notify_tx.send(notification);
    }
}
