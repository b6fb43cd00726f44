//! Research history storage
//!
//! Successful research results are appended to a JSONL log, one record per
//! line, and read back most-recent-first. Persistence is decoupled from the
//! response path: the [`ResearchRecorder`] dispatches appends as
//! fire-and-forget tasks whose failures are logged and never surfaced.

use crate::types::{AgentError, AgentResult, ResearchResult, Source};
use chrono::{DateTime, Utc};
use scout_core::log_operation_error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// One row of the append-only research log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRecord {
    /// Timestamp the record was created
    pub created_at: DateTime<Utc>,
    /// The researched query
    pub query: String,
    /// Markdown summary body
    pub final_summary: String,
    /// Cited sources, JSON-encoded
    pub sources_json: String,
}

impl ResearchRecord {
    /// Build a record from a research result, stamping the current time
    pub fn from_result(result: &ResearchResult) -> Self {
        let sources_json =
            serde_json::to_string(&result.sources).unwrap_or_else(|_| "[]".to_string());
        Self {
            created_at: Utc::now(),
            query: result.query.clone(),
            final_summary: result.final_summary.clone(),
            sources_json,
        }
    }

    /// Decode the stored sources, degrading to an empty list
    pub fn sources(&self) -> Vec<Source> {
        serde_json::from_str(&self.sources_json).unwrap_or_default()
    }
}

/// Research history storage interface
#[allow(async_fn_in_trait)]
pub trait ResearchLogStore: Send + Sync {
    /// Append one record to the log
    async fn append(&self, record: &ResearchRecord) -> AgentResult<()>;

    /// Read the most recent records, newest first; `limit` is clamped to
    /// [1, 100].
    async fn read_recent(&self, limit: usize) -> AgentResult<Vec<ResearchRecord>>;
}

/// File-backed research log, one JSON record per line
#[derive(Debug, Clone)]
pub struct FileResearchLog {
    path: PathBuf,
}

impl FileResearchLog {
    /// Create a log at the given path, creating parent directories
    pub fn new<P: AsRef<Path>>(path: P) -> AgentResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResearchLogStore for FileResearchLog {
    async fn append(&self, record: &ResearchRecord) -> AgentResult<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AgentError::Storage(format!("Failed to open research log: {}", e)))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| AgentError::Storage(format!("Failed to append to research log: {}", e)))?;

        debug!("Appended research record for query: {}", record.query);
        Ok(())
    }

    async fn read_recent(&self, limit: usize) -> AgentResult<Vec<ResearchRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AgentError::Storage(format!("Failed to read research log: {}", e)))?;

        let records: Vec<ResearchRecord> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed research log line: {}", e);
                    None
                }
            })
            .collect();

        let take = limit.clamp(1, 100);
        Ok(records.into_iter().rev().take(take).collect())
    }
}

/// Fire-and-forget persistence of research results
///
/// `record` returns immediately; the append runs on a spawned task and its
/// failure never alters or delays the response that triggered it.
#[derive(Clone)]
pub struct ResearchRecorder {
    log: Arc<FileResearchLog>,
}

impl ResearchRecorder {
    pub fn new(log: Arc<FileResearchLog>) -> Self {
        Self { log }
    }

    /// Dispatch an append for this result without waiting for it
    pub fn record(&self, result: &ResearchResult) {
        let record = ResearchRecord::from_result(result);
        let log = Arc::clone(&self.log);
        tokio::spawn(async move {
            if let Err(e) = log.append(&record).await {
                log_operation_error!("record_research_result", e, query = %record.query);
            }
        });
    }
}
