//! VoiceCommand and its action types
//!
//! This module defines the command record, the tagged action union and the
//! small value types (scroll targets, language tags) carried by commands.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::VoiceError;

/// Language a command is surfaced for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandLanguage {
    En,
    Hi,
    #[default]
    Both,
}

impl CommandLanguage {
    /// Map a locale tag such as "en-US" or "hi-IN" to a command language
    pub fn from_locale(locale: &str) -> Self {
        let primary = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Self::En,
            "hi" => Self::Hi,
            _ => Self::Both,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for CommandLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommandLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "hi" => Ok(Self::Hi),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown command language '{other}' (expected en, hi or both)")),
        }
    }
}

/// Plain discriminant of a [`CommandAction`], echoed in execution results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Route,
    Scroll,
    ScrollBy,
    Custom,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Route => "route",
            Self::Scroll => "scroll",
            Self::ScrollBy => "scrollBy",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Where an absolute scroll should land
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScrollTarget {
    Top,
    Bottom,
    /// A document selector such as `#projects`
    Selector(String),
}

impl From<String> for ScrollTarget {
    fn from(value: String) -> Self {
        match value.as_str() {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => Self::Selector(value),
        }
    }
}

impl From<&str> for ScrollTarget {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ScrollTarget> for String {
    fn from(value: ScrollTarget) -> Self {
        match value {
            ScrollTarget::Top => "top".to_string(),
            ScrollTarget::Bottom => "bottom".to_string(),
            ScrollTarget::Selector(selector) => selector,
        }
    }
}

impl fmt::Display for ScrollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Bottom => f.write_str("bottom"),
            Self::Selector(selector) => f.write_str(selector),
        }
    }
}

/// Shared zero-argument procedure attached to a custom command
#[derive(Clone)]
pub struct CustomCallback(Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>);

impl CustomCallback {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    pub fn invoke(&self) -> anyhow::Result<()> {
        (self.0)()
    }
}

impl fmt::Debug for CustomCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCallback(..)")
    }
}

/// What a command does once matched
///
/// Each variant carries only the data its action needs. Serialized with an
/// `action` tag so a command reads naturally in TOML:
///
/// ```toml
/// [[commands]]
/// id = "nav-blog"
/// keywords = ["open blog"]
/// action = "route"
/// target = "/blog"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CommandAction {
    Route {
        target: String,
    },
    Scroll {
        target: ScrollTarget,
    },
    ScrollBy {
        amount: i32,
    },
    Custom {
        #[serde(skip)]
        callback: Option<CustomCallback>,
    },
}

impl CommandAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Route { .. } => ActionKind::Route,
            Self::Scroll { .. } => ActionKind::Scroll,
            Self::ScrollBy { .. } => ActionKind::ScrollBy,
            Self::Custom { .. } => ActionKind::Custom,
        }
    }
}

/// A spoken command: keywords that trigger it and the action it performs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCommand {
    /// Unique identifier, used for removal and custom callback lookup
    pub id: String,

    /// Trigger phrases; the first one is shown to users
    pub keywords: Vec<String>,

    #[serde(flatten)]
    pub action: CommandAction,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub language: CommandLanguage,
}

impl VoiceCommand {
    fn with_action(id: impl Into<String>, keyword: impl Into<String>, action: CommandAction) -> Self {
        Self {
            id: id.into(),
            keywords: vec![keyword.into()],
            action,
            description: String::new(),
            language: CommandLanguage::default(),
        }
    }

    /// Create a command that navigates to `path`
    pub fn route(id: impl Into<String>, keyword: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_action(id, keyword, CommandAction::Route { target: path.into() })
    }

    /// Create a command that scrolls to the top, the bottom or a selector
    pub fn scroll(
        id: impl Into<String>,
        keyword: impl Into<String>,
        target: impl Into<ScrollTarget>,
    ) -> Self {
        Self::with_action(id, keyword, CommandAction::Scroll { target: target.into() })
    }

    /// Create a command that scrolls by `amount` pixels
    pub fn scroll_by(id: impl Into<String>, keyword: impl Into<String>, amount: i32) -> Self {
        Self::with_action(id, keyword, CommandAction::ScrollBy { amount })
    }

    /// Create a custom command resolved through the callback table
    pub fn custom(id: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self::with_action(id, keyword, CommandAction::Custom { callback: None })
    }

    /// Create a custom command carrying its own callback
    pub fn custom_with_callback<F>(id: impl Into<String>, keyword: impl Into<String>, callback: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::with_action(
            id,
            keyword,
            CommandAction::Custom {
                callback: Some(CustomCallback::new(callback)),
            },
        )
    }

    /// Add an additional keyword
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_language(mut self, language: CommandLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }

    /// The canonical phrase shown in command lists
    pub fn display_phrase(&self) -> &str {
        self.keywords.first().map(String::as_str).unwrap_or(&self.id)
    }

    /// Check that the command can ever be matched and executed
    pub fn validate(&self) -> Result<(), VoiceError> {
        let invalid = |reason: &str| VoiceError::InvalidCommand {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(invalid("at least one non-empty keyword is required"));
        }
        match &self.action {
            CommandAction::Route { target } if target.trim().is_empty() => {
                Err(invalid("route target must not be empty"))
            }
            CommandAction::Scroll {
                target: ScrollTarget::Selector(selector),
            } if selector.trim().is_empty() => Err(invalid("scroll selector must not be empty")),
            CommandAction::ScrollBy { amount: 0 } => Err(invalid("scroll amount must not be zero")),
            _ => Ok(()),
        }
    }
}
