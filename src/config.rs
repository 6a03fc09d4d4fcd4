//! Configuration management for Companion
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{CompanionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Main configuration structure for Companion
///
/// This structure holds everything the chat front-end needs: the
/// generation backend settings, the per-model parameter table, chat
/// defaults, and the session storage location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Generation backend configuration (Ollama)
    #[serde(default)]
    pub backend: BackendConfig,

    /// Chat defaults (active model)
    #[serde(default)]
    pub chat: ChatConfig,

    /// Session storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-model generation parameters, keyed by model name
    ///
    /// Models not present in this table use [`ModelParams::fallback`].
    #[serde(default = "default_models")]
    pub models: BTreeMap<String, ModelParams>,
}

/// Generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the Ollama server
    #[serde(default = "default_host")]
    pub host: String,

    /// Request timeout in seconds; 0 disables the timeout
    #[serde(default)]
    pub timeout_seconds: u64,
}

fn default_host() -> String {
    "http://localhost:11434".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            timeout_seconds: 0,
        }
    }
}

/// Chat defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model selected at startup
    #[serde(default = "default_model")]
    pub default_model: String,
}

fn default_model() -> String {
    "qwen2.5:3b".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the chat session file
    ///
    /// When unset, the platform data directory is used (see
    /// `SessionStore::new`).
    #[serde(default)]
    pub chat_file: Option<String>,
}

/// Generation parameters for a single model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Sampling temperature
    pub temperature: f32,

    /// Maximum number of tokens to generate (`num_predict` on the wire)
    pub num_predict: u32,

    /// Context window size in tokens (`num_ctx` on the wire)
    pub num_ctx: u32,
}

impl ModelParams {
    /// Parameters applied when a model name is absent from the table
    pub fn fallback() -> Self {
        Self {
            temperature: 0.2,
            num_predict: 120,
            num_ctx: 2048,
        }
    }
}

/// The stock model table shipped with the application
fn default_models() -> BTreeMap<String, ModelParams> {
    BTreeMap::from([
        (
            "qwen2.5:3b".to_string(),
            ModelParams {
                temperature: 0.2,
                num_predict: 120,
                num_ctx: 2048,
            },
        ),
        (
            "llama3.2:3b".to_string(),
            ModelParams {
                temperature: 0.2,
                num_predict: 150,
                num_ctx: 2048,
            },
        ),
        (
            "llama3:8b".to_string(),
            ModelParams {
                temperature: 0.3,
                num_predict: 200,
                num_ctx: 4096,
            },
        ),
        (
            "deepseek-r1:7b".to_string(),
            ModelParams {
                temperature: 0.1,
                num_predict: 200,
                num_ctx: 4096,
            },
        ),
    ])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            chat: ChatConfig::default(),
            storage: StorageConfig::default(),
            models: default_models(),
        }
    }
}

impl Config {
    /// Load configuration from a file with env var and CLI overrides
    ///
    /// Missing config files are not an error; defaults are used instead.
    /// Precedence: file < environment variables < CLI flags.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed CLI arguments whose flags override file values
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CompanionError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| CompanionError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("COMPANION_OLLAMA_HOST") {
            self.backend.host = host;
        }

        if let Ok(model) = std::env::var("COMPANION_MODEL") {
            self.chat.default_model = model;
        }

        if let Ok(timeout) = std::env::var("COMPANION_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.backend.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid COMPANION_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(chat_file) = std::env::var("COMPANION_CHAT_FILE") {
            self.storage.chat_file = Some(chat_file);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(chat_file) = &cli.chat_file {
            self.storage.chat_file = Some(chat_file.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `CompanionError::Config` when a value is out of range or
    /// structurally invalid.
    pub fn validate(&self) -> Result<()> {
        if self.backend.host.is_empty() {
            return Err(CompanionError::Config("backend.host must not be empty".to_string()).into());
        }

        if !self.backend.host.starts_with("http://") && !self.backend.host.starts_with("https://") {
            return Err(CompanionError::Config(format!(
                "backend.host must be an http(s) URL, got: {}",
                self.backend.host
            ))
            .into());
        }

        if self.chat.default_model.is_empty() {
            return Err(
                CompanionError::Config("chat.default_model must not be empty".to_string()).into(),
            );
        }

        for (name, params) in &self.models {
            if !(0.0..=2.0).contains(&params.temperature) {
                return Err(CompanionError::Config(format!(
                    "models.{}: temperature must be within [0.0, 2.0], got {}",
                    name, params.temperature
                ))
                .into());
            }
            if params.num_predict == 0 {
                return Err(CompanionError::Config(format!(
                    "models.{}: num_predict must be positive",
                    name
                ))
                .into());
            }
            if params.num_ctx == 0 {
                return Err(CompanionError::Config(format!(
                    "models.{}: num_ctx must be positive",
                    name
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Look up generation parameters for a model
    ///
    /// Unknown model names fall back to [`ModelParams::fallback`].
    pub fn params_for(&self, model: &str) -> ModelParams {
        self.models
            .get(model)
            .copied()
            .unwrap_or_else(ModelParams::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_backend() {
        let backend = BackendConfig::default();
        assert_eq!(backend.host, "http://localhost:11434");
        assert_eq!(backend.timeout_seconds, 0);
    }

    #[test]
    fn test_default_models_table() {
        let models = default_models();
        assert_eq!(models.len(), 4);
        assert!(models.contains_key("qwen2.5:3b"));
        assert!(models.contains_key("llama3.2:3b"));
        assert!(models.contains_key("llama3:8b"));
        assert!(models.contains_key("deepseek-r1:7b"));
    }

    #[test]
    fn test_params_for_known_model() {
        let config = Config::default();
        let params = config.params_for("llama3:8b");
        assert_eq!(params.temperature, 0.3);
        assert_eq!(params.num_predict, 200);
        assert_eq!(params.num_ctx, 4096);
    }

    #[test]
    fn test_params_for_unknown_model_uses_fallback() {
        let config = Config::default();
        let params = config.params_for("unknown-model");
        assert_eq!(params, ModelParams::fallback());
        assert_eq!(params.temperature, 0.2);
        assert_eq!(params.num_predict, 120);
        assert_eq!(params.num_ctx, 2048);
    }

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r#"
backend:
  host: "http://127.0.0.1:11434"
  timeout_seconds: 30
chat:
  default_model: "llama3:8b"
models:
  tiny:latest:
    temperature: 0.5
    num_predict: 64
    num_ctx: 1024
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.backend.host, "http://127.0.0.1:11434");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.chat.default_model, "llama3:8b");
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.params_for("tiny:latest").num_predict, 64);
    }

    #[test]
    fn test_parse_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.backend.host, "http://localhost:11434");
        assert_eq!(config.models.len(), 4);
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let mut config = Config::default();
        config.backend.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_host() {
        let mut config = Config::default();
        config.backend.host = "localhost:11434".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = Config::default();
        config.models.insert(
            "hot:latest".to_string(),
            ModelParams {
                temperature: 3.0,
                num_predict: 100,
                num_ctx: 2048,
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_num_predict() {
        let mut config = Config::default();
        config.models.insert(
            "empty:latest".to_string(),
            ModelParams {
                temperature: 0.2,
                num_predict: 0,
                num_ctx: 2048,
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrip_serialization() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.backend.host, config.backend.host);
        assert_eq!(parsed.models.len(), config.models.len());
    }
}
