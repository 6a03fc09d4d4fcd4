//! Chat session persistence
//!
//! Durable mapping between process runs and the full set of chat
//! sessions: a single JSON file holding an array of sessions, rewritten
//! wholesale after every mutation. Saves go through a temp file plus
//! rename so a crash mid-write never corrupts the previous state.

use crate::error::{CompanionError, Result};
use anyhow::Context;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub mod types;
pub use types::{title_from_prompt, ChatMessage, ChatSession, Role, NEW_CHAT_TITLE};

/// File-backed store for the full session collection
pub struct SessionStore {
    chat_file: PathBuf,
}

impl SessionStore {
    /// Create a store at the default chat file location
    ///
    /// The file lives in the user's data directory. Set
    /// `COMPANION_CHAT_FILE` to point the binary at a different file
    /// (useful for tests or alternate histories).
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("COMPANION_CHAT_FILE") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "companion-chat", "companion")
            .ok_or_else(|| CompanionError::Storage("Could not determine data directory".into()))?;

        let chat_file = proj_dirs.data_dir().join("chats.json");
        Self::new_with_path(chat_file)
    }

    /// Create a store that uses the specified chat file path
    ///
    /// # Examples
    ///
    /// ```
    /// use companion::store::SessionStore;
    ///
    /// let store = SessionStore::new_with_path("/tmp/companion_chats.json").unwrap();
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(chat_file: P) -> Result<Self> {
        let chat_file = chat_file.into();

        // Ensure the parent directory exists so the first save succeeds.
        if let Some(parent) = chat_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create chat file directory")
                    .map_err(|e| CompanionError::Storage(e.to_string()))?;
            }
        }

        Ok(Self { chat_file })
    }

    /// Path of the backing chat file
    pub fn path(&self) -> &Path {
        &self.chat_file
    }

    /// Load the persisted session collection
    ///
    /// A missing file means no sessions yet and loads as an empty
    /// collection. A present-but-malformed file is a hard error: chat
    /// history is never silently discarded.
    pub fn load(&self) -> Result<Vec<ChatSession>> {
        if !self.chat_file.exists() {
            tracing::debug!("No chat file at {}, starting empty", self.chat_file.display());
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.chat_file)
            .map_err(|e| CompanionError::Storage(format!("Failed to read chat file: {}", e)))?;

        let sessions: Vec<ChatSession> = serde_json::from_str(&contents).map_err(|e| {
            CompanionError::Storage(format!(
                "Chat file {} is malformed: {}",
                self.chat_file.display(),
                e
            ))
        })?;

        tracing::debug!("Loaded {} sessions from {}", sessions.len(), self.chat_file.display());
        Ok(sessions)
    }

    /// Persist the full session collection, replacing prior state
    ///
    /// Writes to a temp file in the same directory and renames it over
    /// the target, so readers always observe either the old or the new
    /// collection.
    pub fn save(&self, sessions: &[ChatSession]) -> Result<()> {
        let json = serde_json::to_string_pretty(sessions)
            .map_err(|e| CompanionError::Storage(format!("Serialization failed: {}", e)))?;

        let tmp_path = self.chat_file.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .map_err(|e| CompanionError::Storage(format!("Failed to write chat file: {}", e)))?;

        std::fs::rename(&tmp_path, &self.chat_file)
            .map_err(|e| CompanionError::Storage(format!("Failed to replace chat file: {}", e)))?;

        tracing::debug!("Saved {} sessions to {}", sessions.len(), self.chat_file.display());
        Ok(())
    }
}
