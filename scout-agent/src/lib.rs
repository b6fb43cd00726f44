//! Scout Agent - Web research pipeline
//!
//! This crate implements the core research flow: web search, prompt
//! construction, model summarization with provider fallback, and parsing of
//! the cited Markdown output into a structured result.

pub mod history;
pub mod llm_client;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod search;
pub mod types;

pub use history::{FileResearchLog, ResearchLogStore, ResearchRecord, ResearchRecorder};
pub use llm_client::{
    ModelRoute, SiumaiSummarizerFactory, Summarize, SummarizerClient, SummarizerFactory,
};
pub use parser::parse_response;
pub use pipeline::ResearchPipeline;
pub use prompt::{build_context, build_research_prompt};
pub use search::{SearchFactory, SearchProvider, TavilySearchClient, TavilySearchFactory};
pub use types::{
    AgentError, AgentResult, ParsedContent, ResearchRequest, ResearchResult, SearchResult, Source,
};

// Re-export commonly used types from siumai
pub use siumai::prelude::LlmClient;
