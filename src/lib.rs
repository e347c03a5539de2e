//! voicenav - voice command recognition and dispatch
//!
//! voicenav turns free-form speech transcripts (English, Hindi and mixed
//! "Hinglish") into application actions: route navigation, scrolling and
//! custom callbacks.
//!
//! ## Pipeline
//!
//! A platform recognizer feeds events into a [`VoiceSession`]. Each actionable
//! transcript passes the wake-word gate, is matched against the
//! [`CommandRegistry`] and executed against the host's collaborators. The
//! session can be driven directly (sans-IO) or on a tokio task through
//! [`runtime::spawn_session`].

pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod matcher;
pub mod onboarding;
pub mod runtime;
pub mod session;
pub mod wake;

pub use commands::{CommandAction, CommandLanguage, CommandRegistry, ScrollTarget, VoiceCommand};
pub use config::VoiceConfig;
pub use error::{RecognitionError, VoiceError};
pub use executor::{ExecutionContext, ExecutionResult};
pub use session::{SessionHost, SessionPhase, VoiceControlState, VoiceSession};
