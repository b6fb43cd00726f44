//! Application state for the Scout web server

use crate::{WebConfig, WebError, WebResult};
use scout_agent::{FileResearchLog, ResearchPipeline, ResearchRecorder};
use scout_core::ScoutConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    /// Web server configuration
    pub config: WebConfig,
    /// Immutable process-wide research configuration
    pub scout: Arc<ScoutConfig>,
    /// The research pipeline
    pub pipeline: Arc<ResearchPipeline>,
    /// Research log reader, present when history is configured
    pub history: Option<Arc<FileResearchLog>>,
    /// Fire-and-forget persistence of successful results
    pub recorder: Option<ResearchRecorder>,
}

impl AppState {
    /// Create application state from validated configuration
    pub fn new(config: WebConfig, scout: ScoutConfig) -> WebResult<Self> {
        scout
            .validate()
            .map_err(|e| WebError::Config(format!("Invalid configuration: {}", e)))?;

        let scout = Arc::new(scout);
        let pipeline = Arc::new(ResearchPipeline::new(Arc::clone(&scout)));

        Self::with_pipeline(config, scout, pipeline)
    }

    /// Create application state around an existing pipeline
    ///
    /// Used by tests to inject a pipeline with mock providers.
    pub fn with_pipeline(
        config: WebConfig,
        scout: Arc<ScoutConfig>,
        pipeline: Arc<ResearchPipeline>,
    ) -> WebResult<Self> {
        // History is best-effort: a log that cannot be opened disables
        // persistence instead of failing startup.
        let history = match scout.history.log_path.as_deref() {
            Some(path) => match FileResearchLog::new(path) {
                Ok(log) => {
                    info!("Research history enabled at {}", path);
                    Some(Arc::new(log))
                }
                Err(e) => {
                    warn!("Failed to open research log, history disabled: {}", e);
                    None
                }
            },
            None => {
                info!("Research history path not configured; history disabled");
                None
            }
        };

        let recorder = history.as_ref().map(|log| ResearchRecorder::new(Arc::clone(log)));

        Ok(Self {
            config,
            scout,
            pipeline,
            history,
            recorder,
        })
    }
}
