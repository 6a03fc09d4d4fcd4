//! Chat session controller
//!
//! Owns the session collection, the active-session pointer, and the
//! prompt/reply turn cycle. Every mutation is followed by a full
//! persist, so the on-disk state always reflects the last completed
//! operation.
//!
//! Collection invariants:
//! - at least one session exists at all times
//! - exactly one session is active and its id is always present
//! - sessions are ordered most-recently-created first

use crate::backend::GenerationBackend;
use crate::error::{CompanionError, Result};
use crate::latex::fix_latex;
use crate::store::{title_from_prompt, ChatMessage, ChatSession, SessionStore};

use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Result of a single prompt/reply turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The backend produced a reply, which was recorded
    Completed {
        /// Post-processed reply text, as recorded in the session
        reply: String,
        /// Wall-clock duration of the generation call
        elapsed_seconds: f64,
    },

    /// The turn was stopped; the reply (if any) was discarded
    ///
    /// The user message remains recorded.
    Cancelled,
}

/// Controller for the session collection and the turn cycle
pub struct SessionManager {
    sessions: Vec<ChatSession>,
    active_id: String,
    model: String,
    store: SessionStore,
}

impl SessionManager {
    /// Load the persisted collection and establish the active session
    ///
    /// A first run (empty store) creates the initial session
    /// implicitly and persists it.
    pub fn open(store: SessionStore, model: impl Into<String>) -> Result<Self> {
        let mut sessions = store.load()?;

        if sessions.is_empty() {
            tracing::info!("No persisted sessions, creating the first one");
            sessions.push(ChatSession::new());
            store.save(&sessions)?;
        }

        let active_id = sessions[0].id.clone();
        Ok(Self {
            sessions,
            active_id,
            model: model.into(),
            store,
        })
    }

    /// All sessions, most-recently-created first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Id of the active session
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// The active session
    pub fn active_session(&self) -> Result<&ChatSession> {
        self.sessions
            .iter()
            .find(|s| s.id == self.active_id)
            .ok_or_else(|| CompanionError::UnknownSession(self.active_id.clone()).into())
    }

    fn active_session_mut(&mut self) -> Result<&mut ChatSession> {
        let active_id = self.active_id.clone();
        self.sessions
            .iter_mut()
            .find(|s| s.id == active_id)
            .ok_or_else(|| CompanionError::UnknownSession(active_id).into())
    }

    /// Currently selected model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Select the model used for subsequent turns
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    /// Create a new session, make it active, and persist
    ///
    /// Returns the id of the new session.
    pub fn new_session(&mut self) -> Result<String> {
        let session = ChatSession::new();
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.active_id = id.clone();
        self.persist()?;
        tracing::info!("Created session {}", id);
        Ok(id)
    }

    /// Make an existing session the active one
    ///
    /// # Errors
    ///
    /// Returns `CompanionError::UnknownSession` for an id not in the
    /// collection.
    pub fn select(&mut self, id: &str) -> Result<()> {
        if !self.sessions.iter().any(|s| s.id == id) {
            return Err(CompanionError::UnknownSession(id.to_string()).into());
        }
        self.active_id = id.to_string();
        self.persist()?;
        Ok(())
    }

    /// Delete a session
    ///
    /// Deleting the last remaining session is rejected as a no-op and
    /// returns `Ok(false)`. If the deleted session was active, the new
    /// front session becomes active. Returns `Ok(true)` on deletion.
    ///
    /// # Errors
    ///
    /// Returns `CompanionError::UnknownSession` for an id not in the
    /// collection.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if self.sessions.len() <= 1 {
            tracing::debug!("Refusing to delete the last remaining session");
            return Ok(false);
        }

        let idx = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CompanionError::UnknownSession(id.to_string()))?;

        self.sessions.remove(idx);
        if self.active_id == id {
            self.active_id = self.sessions[0].id.clone();
        }
        self.persist()?;
        tracing::info!("Deleted session {}", id);
        Ok(true)
    }

    /// Resolve an exact id or a unique id prefix to a full session id
    pub fn resolve_id(&self, needle: &str) -> Result<String> {
        if let Some(session) = self.sessions.iter().find(|s| s.id == needle) {
            return Ok(session.id.clone());
        }

        let matches: Vec<&ChatSession> = self
            .sessions
            .iter()
            .filter(|s| s.id.starts_with(needle))
            .collect();

        match matches.as_slice() {
            [one] => Ok(one.id.clone()),
            [] => Err(CompanionError::UnknownSession(needle.to_string()).into()),
            _ => Err(CompanionError::UnknownSession(format!(
                "{} (ambiguous prefix, {} matches)",
                needle,
                matches.len()
            ))
            .into()),
        }
    }

    /// Run one prompt/reply turn against the active session
    ///
    /// Appends the user message (setting the session title on the first
    /// message) and persists immediately, then races the generation
    /// call against `cancel`. Cancellation drops the in-flight request;
    /// a stop observed after completion still discards the reply. On
    /// completion the reply is post-processed, recorded with its
    /// elapsed time, and persisted.
    ///
    /// # Errors
    ///
    /// Backend failures abort the turn and propagate; the user message
    /// stays recorded and no assistant message is appended.
    pub async fn submit(
        &mut self,
        prompt: &str,
        backend: &dyn GenerationBackend,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome> {
        let model = self.model.clone();

        {
            let session = self.active_session_mut()?;
            session.messages.push(ChatMessage::user(prompt));
            if session.is_untitled() {
                session.title = title_from_prompt(prompt);
            }
        }
        self.persist()?;

        let start = Instant::now();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            r = backend.generate(prompt, &model) => Some(r),
        };
        let elapsed_seconds = start.elapsed().as_secs_f64();

        match result {
            None => {
                tracing::info!("Turn cancelled after {:.2}s", elapsed_seconds);
                Ok(TurnOutcome::Cancelled)
            }
            Some(Ok(reply)) => {
                if cancel.is_cancelled() {
                    tracing::info!("Stop observed after completion, discarding reply");
                    return Ok(TurnOutcome::Cancelled);
                }

                let reply = fix_latex(&reply);
                let session = self.active_session_mut()?;
                session
                    .messages
                    .push(ChatMessage::assistant(reply.clone(), elapsed_seconds));
                self.persist()?;

                Ok(TurnOutcome::Completed {
                    reply,
                    elapsed_seconds,
                })
            }
            Some(Err(e)) => {
                tracing::warn!("Generation failed after {:.2}s: {}", elapsed_seconds, e);
                Err(e)
            }
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.sessions)
    }
}
