//! Research pipeline orchestration
//!
//! Runs the search → prompt → summarize → parse sequence for a single
//! request, with bounded fallback across alternative model providers when
//! the summarization call fails. The pipeline never returns an error: every
//! failure path produces a sentinel result whose summary starts with
//! `"Error:"` and whose source list is empty.

use crate::llm_client::{SiumaiSummarizerFactory, SummarizerFactory};
use crate::parser::parse_response;
use crate::prompt::build_research_prompt;
use crate::search::{SearchFactory, TavilySearchFactory};
use crate::types::{ResearchRequest, ResearchResult};
use scout_core::logging::performance;
use scout_core::{log_operation_start, log_operation_success, ScoutConfig};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Sentinel summaries for the terminal failure states
pub const SEARCH_INIT_FAILED: &str = "Error: Failed to initialize search tool.";
pub const LLM_INIT_FAILED: &str = "Error: Failed to initialize language model.";
pub const SEARCH_FAILED: &str = "Error: Search invocation failed.";
pub const LLM_FAILED: &str = "Error: Language model invocation failed.";

/// Orchestrates one research pass per request
///
/// The pipeline itself is stateless across requests; provider clients are
/// constructed per run through the factories and reused only within that
/// run.
pub struct ResearchPipeline {
    config: Arc<ScoutConfig>,
    search_factory: Box<dyn SearchFactory>,
    summarizer_factory: Box<dyn SummarizerFactory>,
}

impl ResearchPipeline {
    /// Create a pipeline with the default provider factories
    pub fn new(config: Arc<ScoutConfig>) -> Self {
        Self::with_factories(
            config,
            Box::new(TavilySearchFactory),
            Box::new(SiumaiSummarizerFactory),
        )
    }

    /// Create a pipeline with explicit provider factories
    pub fn with_factories(
        config: Arc<ScoutConfig>,
        search_factory: Box<dyn SearchFactory>,
        summarizer_factory: Box<dyn SummarizerFactory>,
    ) -> Self {
        Self {
            config,
            search_factory,
            summarizer_factory,
        }
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    /// Run one research pass and always return a result
    ///
    /// Sequence: construct clients, search once, build the prompt once,
    /// summarize with the requested or default model, fall back across the
    /// configured model order on provider failure, parse the first
    /// successful response.
    pub async fn run_research(&self, request: ResearchRequest) -> ResearchResult {
        let query = request.query;
        log_operation_start!("run_research", query = %query);

        let model = request
            .model_name
            .unwrap_or_else(|| self.config.llm.model.clone());
        let temperature = request.temperature.unwrap_or(self.config.llm.temperature);

        // Construct provider clients for this run.
        let search = match self.search_factory.create() {
            Ok(search) => search,
            Err(e) => {
                error!("Failed to initialize search client: {}", e);
                return ResearchResult::failure(query, SEARCH_INIT_FAILED);
            }
        };

        let summarizer = match self.summarizer_factory.create(&model, temperature) {
            Ok(summarizer) => summarizer,
            Err(e) => {
                error!("Failed to initialize language model '{}': {}", model, e);
                return ResearchResult::failure(query, LLM_INIT_FAILED);
            }
        };

        // One search pass; search failures are terminal, fallback only
        // covers the summarization stage.
        let (results, _raw) = match performance::measure_async(
            "web_search",
            search.search(&query, self.config.search.max_results),
        )
        .await
        {
            Ok(found) => found,
            Err(e) => {
                error!("Error during search invocation: {}", e);
                return ResearchResult::failure(query, SEARCH_FAILED);
            }
        };

        // The prompt is built once and reused verbatim across the primary
        // attempt and every fallback attempt.
        let prompt = build_research_prompt(&query, &results);

        let content = match summarizer.summarize(&prompt).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Primary model '{}' failed: {}", model, e);
                match self.run_fallbacks(&model, temperature, &prompt).await {
                    Some(content) => content,
                    None => {
                        error!("All configured models failed for query: {}", query);
                        return ResearchResult::failure(query, LLM_FAILED);
                    }
                }
            }
        };

        let parsed = parse_response(&content);
        log_operation_success!("run_research", sources = parsed.sources.len());

        ResearchResult {
            query,
            final_summary: parsed.summary_md,
            sources: parsed.sources,
        }
    }

    /// Try the configured fallback models in order, stopping at the first
    /// success
    ///
    /// The identifier that just failed is excluded from the candidate list;
    /// candidates are tried strictly one at a time and their failures are
    /// swallowed.
    async fn run_fallbacks(
        &self,
        failed_model: &str,
        temperature: f32,
        prompt: &str,
    ) -> Option<String> {
        let candidates = self
            .config
            .llm
            .fallback_models
            .iter()
            .filter(|candidate| candidate.as_str() != failed_model);

        for candidate in candidates {
            info!("Falling back to model: {}", candidate);

            let summarizer = match self.summarizer_factory.create(candidate, temperature) {
                Ok(summarizer) => summarizer,
                Err(e) => {
                    warn!("Fallback model '{}' unavailable: {}", candidate, e);
                    continue;
                }
            };

            match summarizer.summarize(prompt).await {
                Ok(content) => {
                    info!("Fallback model '{}' succeeded", candidate);
                    return Some(content);
                }
                Err(e) => {
                    warn!("Fallback model '{}' failed: {}", candidate, e);
                }
            }
        }

        None
    }
}
