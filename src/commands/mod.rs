//! Voice commands - what can be said and what it does
//!
//! A [`VoiceCommand`] binds a list of spoken keywords to a [`CommandAction`].
//! Commands live in a [`CommandRegistry`] owned by whoever drives matching
//! (usually a [`VoiceSession`](crate::session::VoiceSession)).
//!
//! Example commands:
//! - "go home" -> route to `/`
//! - "scroll down" -> scroll by 500px
//! - "projects dikhao" -> route to `/projects` (Hinglish)

pub mod defaults;
mod registry;
mod voice_command;

pub use defaults::{default_commands, default_wake_words};
pub use registry::CommandRegistry;
pub use voice_command::{
    ActionKind, CommandAction, CommandLanguage, CustomCallback, ScrollTarget, VoiceCommand,
};
