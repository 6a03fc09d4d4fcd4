//! Ollama generation client
//!
//! Sends prompts to an Ollama server's `/api/generate` endpoint and
//! aggregates its newline-delimited JSON response into a single reply.
//! The request asks for streaming, but the client waits for the whole
//! body and decodes it line by line; lines that fail to parse are
//! skipped with a debug log rather than failing the turn.

use crate::backend::GenerationBackend;
use crate::config::{BackendConfig, ModelParams};
use crate::error::{CompanionError, Result};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// HTTP client for the Ollama generate endpoint
pub struct OllamaClient {
    client: Client,
    host: String,
    models: BTreeMap<String, ModelParams>,
}

/// Request body for `/api/generate`
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    temperature: f32,
    num_predict: u32,
    num_ctx: u32,
}

/// One line of the generate response; fields other than `response` are
/// ignored
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    /// Create a new Ollama client
    ///
    /// # Arguments
    ///
    /// * `backend` - Host and timeout settings; `timeout_seconds = 0`
    ///   disables the request timeout
    /// * `models` - Per-model generation parameters; unknown models fall
    ///   back to [`ModelParams::fallback`]
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails
    pub fn new(backend: &BackendConfig, models: BTreeMap<String, ModelParams>) -> Result<Self> {
        let mut builder = Client::builder().user_agent("companion/0.2.0");
        if backend.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(backend.timeout_seconds));
        }
        let client = builder.build().map_err(|e| {
            CompanionError::BackendUnavailable(format!("Failed to create HTTP client: {}", e))
        })?;

        tracing::info!(
            "Initialized Ollama client: host={}, timeout_seconds={}",
            backend.host,
            backend.timeout_seconds
        );

        Ok(Self {
            client,
            host: backend.host.clone(),
            models,
        })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolve generation parameters for a model name
    pub fn params_for(&self, model: &str) -> ModelParams {
        self.models
            .get(model)
            .copied()
            .unwrap_or_else(ModelParams::fallback)
    }
}

/// Concatenate the `response` fields of a newline-delimited JSON body
///
/// Each line is decoded independently; lines that are not valid JSON
/// are skipped. This tolerates partial corruption of a streamed body
/// without dropping the rest of the reply.
///
/// # Examples
///
/// ```
/// use companion::backend::aggregate_response;
///
/// let body = "{\"response\":\"Hel\"}\n{\"response\":\"lo\"}\nnot-json\n{\"response\":\"!\"}";
/// assert_eq!(aggregate_response(body), "Hello!");
/// ```
pub fn aggregate_response(body: &str) -> String {
    let mut text = String::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<GenerateChunk>(line) {
            Ok(chunk) => text.push_str(&chunk.response),
            Err(e) => {
                tracing::debug!("Skipping unparsable response line: {}", e);
            }
        }
    }
    text
}

#[async_trait]
impl GenerationBackend for OllamaClient {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let params = self.params_for(model);
        let url = format!("{}/api/generate", self.host);

        let request = GenerateRequest {
            model,
            prompt,
            stream: true,
            temperature: params.temperature,
            num_predict: params.num_predict,
            num_ctx: params.num_ctx,
        };

        tracing::debug!(
            "Sending generate request: model={}, num_predict={}, num_ctx={}",
            model,
            params.num_predict,
            params.num_ctx
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Generate request failed: {}", e);
                CompanionError::BackendUnavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Backend returned error {}: {}", status, message);
            return Err(CompanionError::BackendStatus {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read generate response body: {}", e);
            CompanionError::BackendUnavailable(e.to_string())
        })?;

        Ok(aggregate_response(&body))
    }
}
