//! Companion - local chat CLI library
//!
//! This library provides the core functionality for the Companion chat
//! front-end: persisted chat sessions, the generation client for a
//! local Ollama server, reply post-processing, and the session
//! controller that ties them together.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `store`: chat session data model and JSON-file persistence
//! - `backend`: generation backend trait and the Ollama client
//! - `latex`: display-math cleanup applied to generated replies
//! - `session`: session collection invariants and the turn cycle
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use companion::session::SessionManager;
//! use companion::store::SessionStore;
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = SessionStore::new_with_path("/tmp/chats.json")?;
//! let manager = SessionManager::open(store, "qwen2.5:3b")?;
//! assert!(!manager.sessions().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod latex;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use backend::{GenerationBackend, OllamaClient};
pub use config::Config;
pub use error::{CompanionError, Result};
pub use session::{SessionManager, TurnOutcome};
pub use store::{ChatMessage, ChatSession, SessionStore};
