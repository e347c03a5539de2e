//! Collaborators a command is executed against
//!
//! The executor never touches a real router, document or speaker. It talks to
//! these traits, and the hosting application supplies implementations.

use std::collections::HashMap;

use crate::commands::CustomCallback;

/// Application router
pub trait Navigator {
    fn navigate(&mut self, path: &str) -> anyhow::Result<()>;
}

impl<F> Navigator for F
where
    F: FnMut(&str) -> anyhow::Result<()>,
{
    fn navigate(&mut self, path: &str) -> anyhow::Result<()> {
        self(path)
    }
}

/// Scroll primitive of the rendered document
pub trait Viewport {
    fn scroll_to_top(&mut self) -> anyhow::Result<()>;

    fn scroll_to_bottom(&mut self) -> anyhow::Result<()>;

    /// Scroll the single element matching `selector` into view.
    /// Returns `Ok(false)` when no element matches.
    fn scroll_into_view(&mut self, selector: &str) -> anyhow::Result<bool>;

    /// Relative scroll; negative values move toward the start of the content
    fn scroll_by(&mut self, delta: i32) -> anyhow::Result<()>;
}

/// Fire-and-forget speech synthesis
pub trait SpeechOutput {
    fn speak(&mut self, text: &str, lang: &str);
}

impl<F> SpeechOutput for F
where
    F: FnMut(&str, &str),
{
    fn speak(&mut self, text: &str, lang: &str) {
        self(text, lang)
    }
}

/// Start/stop hooks of the recognition session
pub trait ListeningControl {
    fn start_listening(&mut self);
    fn stop_listening(&mut self);
}

/// Custom command handlers keyed by command id
pub type CallbackTable = HashMap<String, CustomCallback>;

/// Everything a command may act on. All collaborators are optional.
pub struct ExecutionContext<'a> {
    pub navigator: Option<&'a mut dyn Navigator>,
    pub viewport: Option<&'a mut dyn Viewport>,
    pub speech: Option<&'a mut dyn SpeechOutput>,
    pub listening: Option<&'a mut dyn ListeningControl>,
    pub custom_callbacks: Option<&'a CallbackTable>,
    /// Locale used for spoken feedback
    pub language: &'a str,
}

impl Default for ExecutionContext<'_> {
    fn default() -> Self {
        Self {
            navigator: None,
            viewport: None,
            speech: None,
            listening: None,
            custom_callbacks: None,
            language: "en-US",
        }
    }
}

impl<'a> ExecutionContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_navigator(mut self, navigator: &'a mut dyn Navigator) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn with_viewport(mut self, viewport: &'a mut dyn Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_speech(mut self, speech: &'a mut dyn SpeechOutput) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_listening(mut self, listening: &'a mut dyn ListeningControl) -> Self {
        self.listening = Some(listening);
        self
    }

    pub fn with_callbacks(mut self, callbacks: &'a CallbackTable) -> Self {
        self.custom_callbacks = Some(callbacks);
        self
    }

    pub fn with_language(mut self, language: &'a str) -> Self {
        self.language = language;
        self
    }
}
