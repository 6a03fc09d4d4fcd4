//! Persisted chat session data model
//!
//! Wire field names (`chat_id`, `created_at`, `time`, lowercase roles)
//! match the chat file format used by earlier releases, so existing
//! files load unchanged.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Sentinel title given to a session until its first user message
pub const NEW_CHAT_TITLE: &str = "New chat";

/// Maximum number of characters kept when deriving a title from a prompt
pub const TITLE_MAX_CHARS: usize = 40;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A prompt typed by the user
    User,
    /// A generated reply
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message within a chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author
    pub role: Role,

    /// Message text
    pub content: String,

    /// Wall-clock generation duration in seconds
    ///
    /// `Some` only for assistant messages that completed generation;
    /// `None` for user messages and for cancelled turns.
    #[serde(rename = "time")]
    pub elapsed_seconds: Option<f64>,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            elapsed_seconds: None,
        }
    }

    /// Create a completed assistant message with its generation duration
    pub fn assistant(content: impl Into<String>, elapsed_seconds: f64) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            elapsed_seconds: Some(elapsed_seconds),
        }
    }
}

/// One independent, titled conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique identifier, assigned at creation and never reused
    #[serde(rename = "chat_id")]
    pub id: String,

    /// Display title; starts as [`NEW_CHAT_TITLE`] and is set once from
    /// the first user message
    pub title: String,

    /// Creation timestamp at minute granularity (`%Y-%m-%d %H:%M`)
    pub created_at: String,

    /// Conversation messages in insertion order (append-only)
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Construct a fresh, empty session
    ///
    /// Pure constructor; does not persist anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use companion::store::ChatSession;
    ///
    /// let session = ChatSession::new();
    /// assert_eq!(session.title, "New chat");
    /// assert!(session.messages.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: NEW_CHAT_TITLE.to_string(),
            created_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            messages: Vec::new(),
        }
    }

    /// Whether the session still carries the sentinel title
    pub fn is_untitled(&self) -> bool {
        self.title == NEW_CHAT_TITLE
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a session title from its first user prompt
///
/// Takes the first line of the trimmed prompt, truncated to
/// [`TITLE_MAX_CHARS`] characters.
pub fn title_from_prompt(prompt: &str) -> String {
    prompt
        .trim()
        .lines()
        .next()
        .unwrap_or("")
        .chars()
        .take(TITLE_MAX_CHARS)
        .collect()
}
