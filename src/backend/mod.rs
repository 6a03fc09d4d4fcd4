//! Generation backend abstraction
//!
//! The chat controller talks to the inference server through the
//! [`GenerationBackend`] trait so tests can substitute a stub backend.
//! The production implementation is [`OllamaClient`].

use crate::error::Result;
use async_trait::async_trait;

pub mod ollama;
pub use ollama::{aggregate_response, OllamaClient};

/// A backend that turns a (prompt, model) pair into generated text
///
/// One call is one turn: the implementation blocks until the full reply
/// is available and returns it as a single string. No retry is
/// performed; a failed call fails the turn.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use companion::backend::GenerationBackend;
/// use companion::error::Result;
///
/// struct Echo;
///
/// #[async_trait]
/// impl GenerationBackend for Echo {
///     async fn generate(&self, prompt: &str, _model: &str) -> Result<String> {
///         Ok(prompt.to_string())
///     }
/// }
///
/// let reply = tokio_test::block_on(Echo.generate("hi", "any-model"));
/// assert_eq!(reply.unwrap(), "hi");
/// ```
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate a reply for `prompt` using `model`
    ///
    /// # Errors
    ///
    /// Returns `CompanionError::BackendUnavailable` when the server
    /// cannot be reached and `CompanionError::BackendStatus` when it
    /// answers with a non-success status.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String>;
}
