//! Type definitions for the research pipeline
//!
//! This module defines the core types flowing through the search → prompt →
//! summarize → parse sequence.

use serde::{Deserialize, Serialize};

/// A single ranked web search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title, `"No title"` when the provider omits one
    pub title: String,
    /// Result URL
    pub url: String,
    /// Short excerpt of the page content
    pub snippet: String,
}

/// A cited source extracted from model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// Structured fields extracted from raw model output
///
/// Derived deterministically from the text; only ever persisted as part of a
/// [`ResearchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContent {
    /// Markdown summary body
    pub summary_md: String,
    /// Cited sources in document order, duplicates preserved
    pub sources: Vec<Source>,
}

/// A single research request
#[derive(Debug, Clone, Default)]
pub struct ResearchRequest {
    /// The natural-language query, expected non-empty
    pub query: String,
    /// Model identifier override; the configured default applies when unset
    pub model_name: Option<String>,
    /// Sampling temperature override, in [0.0, 2.0]
    pub temperature: Option<f32>,
}

impl ResearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            model_name: None,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Terminal artifact of a research run
///
/// Failures never escape the pipeline as errors; they are reported as a
/// sentinel result whose summary starts with `"Error:"` and whose source
/// list is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub query: String,
    pub final_summary: String,
    pub sources: Vec<Source>,
}

impl ResearchResult {
    /// Build a sentinel result carrying a failure summary
    pub(crate) fn failure(query: impl Into<String>, summary: &str) -> Self {
        Self {
            query: query.into(),
            final_summary: summary.to_string(),
            sources: Vec::new(),
        }
    }

    /// Whether this result is a failure sentinel
    pub fn is_failure(&self) -> bool {
        self.final_summary.starts_with("Error:")
    }
}

/// Error types for the research pipeline
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Search error: {0}")]
    Search(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for pipeline operations
pub type AgentResult<T> = Result<T, AgentError>;
