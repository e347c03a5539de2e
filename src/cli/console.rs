//! Terminal stand-ins for the router, the page and the recognizer

use std::collections::HashSet;

use tracing::debug;

use voicenav::error::RecognitionError;
use voicenav::executor::{ListeningControl, Navigator, SpeechOutput, Viewport};
use voicenav::runtime::EventSink;
use voicenav::session::{RecognitionBackend, RecognitionSettings};
use voicenav::SessionHost;

/// Page sections the console viewport knows about
pub const SECTIONS: [&str; 5] = ["#hero", "#about", "#projects", "#skills", "#contact"];

/// Prints route changes and remembers the current path
pub struct ConsoleNavigator {
    pub current: String,
}

impl Default for ConsoleNavigator {
    fn default() -> Self {
        Self {
            current: "/".to_string(),
        }
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&mut self, path: &str) -> anyhow::Result<()> {
        if !path.starts_with('/') {
            anyhow::bail!("not an absolute path");
        }
        println!("  -> navigate {} => {}", self.current, path);
        self.current = path.to_string();
        Ok(())
    }
}

/// A page of fixed height with a handful of sections
pub struct ConsoleViewport {
    offset: i64,
    height: i64,
    sections: HashSet<String>,
}

impl Default for ConsoleViewport {
    fn default() -> Self {
        Self {
            offset: 0,
            height: 4000,
            sections: SECTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Viewport for ConsoleViewport {
    fn scroll_to_top(&mut self) -> anyhow::Result<()> {
        self.offset = 0;
        println!("  -> scroll offset 0");
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> anyhow::Result<()> {
        self.offset = self.height;
        println!("  -> scroll offset {}", self.offset);
        Ok(())
    }

    fn scroll_into_view(&mut self, selector: &str) -> anyhow::Result<bool> {
        if !self.sections.contains(selector) {
            return Ok(false);
        }
        println!("  -> scroll {selector} into view");
        Ok(true)
    }

    fn scroll_by(&mut self, delta: i32) -> anyhow::Result<()> {
        self.offset = (self.offset + i64::from(delta)).clamp(0, self.height);
        println!("  -> scroll offset {}", self.offset);
        Ok(())
    }
}

/// Prints what would be spoken
#[derive(Default)]
pub struct ConsoleSpeech;

impl SpeechOutput for ConsoleSpeech {
    fn speak(&mut self, text: &str, lang: &str) {
        println!("  [{lang}] \"{text}\"");
    }
}

/// Listening hooks for one-shot runs, where there is no session to control
#[derive(Default)]
pub struct ConsoleListening;

impl ListeningControl for ConsoleListening {
    fn start_listening(&mut self) {
        println!("  -> listening started");
    }

    fn stop_listening(&mut self) {
        println!("  -> listening stopped");
    }
}

/// Host wired to the console collaborators
pub fn console_host() -> SessionHost {
    SessionHost::new()
        .with_navigator(ConsoleNavigator::default())
        .with_viewport(ConsoleViewport::default())
        .with_speech(ConsoleSpeech)
}

/// Recognizer whose "microphone" is the terminal
///
/// Start and stop are acknowledged immediately; typed lines are delivered as
/// final results by the listen loop.
pub struct ConsoleBackend {
    sink: EventSink,
    language: String,
    active: bool,
}

impl ConsoleBackend {
    pub fn new(sink: EventSink) -> Self {
        Self {
            sink,
            language: String::new(),
            active: false,
        }
    }
}

impl RecognitionBackend for ConsoleBackend {
    fn is_supported(&self) -> bool {
        true
    }

    fn configure(&mut self, settings: &RecognitionSettings) -> Result<(), RecognitionError> {
        debug!(?settings, "Configuring console recognizer");
        self.language = settings.language.clone();
        Ok(())
    }

    fn start(&mut self) -> Result<(), RecognitionError> {
        if self.active {
            return Err(RecognitionError::AlreadyStarted);
        }
        self.sink
            .started()
            .map_err(|e| RecognitionError::Platform(e.to_string()))?;
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecognitionError> {
        if !self.active {
            return Err(RecognitionError::NotStarted);
        }
        self.active = false;
        self.sink
            .ended()
            .map_err(|e| RecognitionError::Platform(e.to_string()))
    }

    fn set_language(&mut self, language: &str) -> Result<(), RecognitionError> {
        debug!(from = %self.language, to = language, "Switching console recognizer language");
        self.language = language.to_string();
        Ok(())
    }
}
