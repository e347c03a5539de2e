//! Shared fakes for integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use voicenav::error::RecognitionError;
use voicenav::executor::Viewport;
use voicenav::session::{RecognitionBackend, RecognitionSettings, TimerId, TimerScheduler};

/// Backend that accepts everything and counts calls
#[derive(Debug, Default)]
pub struct CountingBackend {
    pub starts: usize,
    pub stops: usize,
    pub language: Option<String>,
}

impl RecognitionBackend for CountingBackend {
    fn is_supported(&self) -> bool {
        true
    }

    fn configure(&mut self, settings: &RecognitionSettings) -> Result<(), RecognitionError> {
        self.language = Some(settings.language.clone());
        Ok(())
    }

    fn start(&mut self) -> Result<(), RecognitionError> {
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecognitionError> {
        self.stops += 1;
        Ok(())
    }

    fn set_language(&mut self, language: &str) -> Result<(), RecognitionError> {
        self.language = Some(language.to_string());
        Ok(())
    }
}

/// Timers collected for the test to fire by hand
#[derive(Debug, Default)]
pub struct QueuedTimers {
    next: u64,
    pub pending: BTreeMap<TimerId, Duration>,
}

impl QueuedTimers {
    /// Remove and return the earliest pending timer
    pub fn pop(&mut self) -> Option<(TimerId, Duration)> {
        self.pending.pop_first()
    }
}

impl TimerScheduler for QueuedTimers {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next += 1;
        let id = TimerId(self.next);
        self.pending.insert(id, delay);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.remove(&id);
    }
}

/// Everything the page was asked to do, in order
pub type Log = Arc<Mutex<Vec<String>>>;

/// Viewport that logs calls and knows a fixed set of sections
pub struct LoggingViewport {
    pub log: Log,
    pub sections: Vec<&'static str>,
}

impl LoggingViewport {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            sections: vec!["#hero", "#about", "#contact"],
        }
    }
}

impl Viewport for LoggingViewport {
    fn scroll_to_top(&mut self) -> anyhow::Result<()> {
        self.log.lock().unwrap().push("top".to_string());
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> anyhow::Result<()> {
        self.log.lock().unwrap().push("bottom".to_string());
        Ok(())
    }

    fn scroll_into_view(&mut self, selector: &str) -> anyhow::Result<bool> {
        if !self.sections.contains(&selector) {
            return Ok(false);
        }
        self.log.lock().unwrap().push(format!("view {selector}"));
        Ok(true)
    }

    fn scroll_by(&mut self, delta: i32) -> anyhow::Result<()> {
        self.log.lock().unwrap().push(format!("by {delta}"));
        Ok(())
    }
}

/// Navigator closure that appends `route <path>` to `log`
pub fn logging_navigator(log: Log) -> impl FnMut(&str) -> anyhow::Result<()> + Send + 'static {
    move |path: &str| {
        log.lock().unwrap().push(format!("route {path}"));
        Ok(())
    }
}
