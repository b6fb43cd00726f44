//! Configuration management
//!
//! The whole process works from one immutable `ScoutConfig` value constructed
//! at startup and passed by `Arc` into each component. Credentials are never
//! stored here; they are resolved from the environment by the components that
//! need them.

use crate::error::{ErrorContext, ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Top-level configuration for the Scout system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Language model configuration
    pub llm: LlmSettings,
    /// Web search configuration
    pub search: SearchSettings,
    /// Research history configuration
    pub history: HistorySettings,
}

/// Language model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Default model identifier used when a request does not name one
    pub model: String,
    /// Default sampling temperature, in [0.0, 2.0]
    pub temperature: f32,
    /// Ordered list of model identifiers tried after the primary model fails
    pub fallback_models: Vec<String>,
    /// Allow-list mapping request-supplied aliases to model identifiers
    pub model_aliases: HashMap<String, String>,
}

/// Web search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Maximum number of ranked results kept per query
    pub max_results: usize,
}

/// Research history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Path of the append-only research log; history is disabled when unset
    pub log_path: Option<String>,
    /// Default number of records returned by history reads
    pub default_limit: usize,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        let mut model_aliases = HashMap::new();
        model_aliases.insert("default".to_string(), "gpt-4o-mini".to_string());
        model_aliases.insert("gpt-4o-mini".to_string(), "gpt-4o-mini".to_string());
        model_aliases.insert("gpt-4o".to_string(), "gpt-4o".to_string());
        model_aliases.insert(
            "deepseek-free".to_string(),
            "deepseek/deepseek-chat-v3-0324:free".to_string(),
        );
        model_aliases.insert(
            "llama-free".to_string(),
            "meta-llama/llama-3.3-70b-instruct:free".to_string(),
        );

        Self {
            llm: LlmSettings {
                model: "gpt-4o-mini".to_string(),
                temperature: 0.2,
                fallback_models: vec![
                    "deepseek/deepseek-chat-v3-0324:free".to_string(),
                    "gpt-4o-mini".to_string(),
                ],
                model_aliases,
            },
            search: SearchSettings { max_results: 5 },
            history: HistorySettings {
                log_path: None,
                default_limit: 20,
            },
        }
    }
}

impl ScoutConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ScoutResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScoutError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: ScoutConfig = toml::from_str(&content).map_err(|e| ScoutError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ScoutResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ScoutError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| ScoutError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Apply environment variable overrides on top of the loaded values
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("SCOUT_MODEL") {
            if !model.trim().is_empty() {
                self.llm.model = model;
            }
        }
        if let Ok(temperature) = std::env::var("SCOUT_TEMPERATURE") {
            if let Ok(value) = temperature.parse::<f32>() {
                self.llm.temperature = value;
            }
        }
        if let Ok(fallbacks) = std::env::var("SCOUT_FALLBACK_MODELS") {
            let models: Vec<String> = fallbacks
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            if !models.is_empty() {
                self.llm.fallback_models = models;
            }
        }
        if let Ok(limit) = std::env::var("SCOUT_SEARCH_LIMIT") {
            if let Ok(value) = limit.parse::<usize>() {
                self.search.max_results = value;
            }
        }
        if let Ok(path) = std::env::var("SCOUT_HISTORY_PATH") {
            if !path.trim().is_empty() {
                self.history.log_path = Some(path);
            }
        }
        self
    }

    /// Resolve a request-supplied model alias through the allow-list
    ///
    /// Returns `None` for aliases that are not in the allow-list; callers
    /// treat that as a request validation error, not a pipeline error.
    pub fn resolve_model_alias(&self, alias: &str) -> Option<&str> {
        self.llm.model_aliases.get(alias).map(String::as_str)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ScoutResult<()> {
        if self.llm.model.trim().is_empty() {
            return Err(ScoutError::Config {
                message: "llm.model must not be empty".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set llm.model to a model identifier"),
            });
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ScoutError::Config {
                message: format!(
                    "llm.temperature must be within [0.0, 2.0], got {}",
                    self.llm.temperature
                ),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set llm.temperature to a value between 0.0 and 2.0"),
            });
        }

        if self.search.max_results == 0 {
            return Err(ScoutError::Config {
                message: "search.max_results must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set search.max_results to a positive value"),
            });
        }

        if self.llm.model_aliases.values().any(|m| m.trim().is_empty()) {
            return Err(ScoutError::Config {
                message: "llm.model_aliases must not map to empty identifiers".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Remove or fix empty alias targets"),
            });
        }

        Ok(())
    }
}
