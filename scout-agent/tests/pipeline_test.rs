//! Integration tests for the research pipeline's fallback protocol

use async_trait::async_trait;
use scout_agent::pipeline::{LLM_FAILED, LLM_INIT_FAILED, SEARCH_FAILED, SEARCH_INIT_FAILED};
use scout_agent::{
    AgentError, AgentResult, ResearchPipeline, ResearchRequest, SearchFactory, SearchProvider,
    SearchResult, Summarize, SummarizerFactory,
};
use scout_core::ScoutConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock search provider serving canned results
struct MockSearch {
    results: Vec<SearchResult>,
    fail: bool,
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(
        &self,
        _query: &str,
        limit: usize,
    ) -> AgentResult<(Vec<SearchResult>, serde_json::Value)> {
        if self.fail {
            return Err(AgentError::Search("Search down".to_string()));
        }
        let results: Vec<SearchResult> = self.results.iter().take(limit).cloned().collect();
        Ok((results, serde_json::json!({})))
    }
}

struct MockSearchFactory {
    results: Vec<SearchResult>,
    fail_create: bool,
    fail_search: bool,
}

impl MockSearchFactory {
    fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            fail_create: false,
            fail_search: false,
        }
    }
}

impl SearchFactory for MockSearchFactory {
    fn create(&self) -> AgentResult<Box<dyn SearchProvider>> {
        if self.fail_create {
            return Err(AgentError::Config("TAVILY_API_KEY is not set".to_string()));
        }
        Ok(Box::new(MockSearch {
            results: self.results.clone(),
            fail: self.fail_search,
        }))
    }
}

/// Per-model behavior of the scripted summarizer factory
#[derive(Clone)]
enum Script {
    Succeed(String),
    Fail,
    Unavailable,
}

/// Summarizer factory driven by a per-model script, recording every
/// construction and every summarize attempt
struct ScriptedSummarizerFactory {
    scripts: HashMap<String, Script>,
    created: Arc<Mutex<Vec<(String, f32)>>>,
    attempts: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedSummarizerFactory {
    fn new(scripts: Vec<(&str, Script)>) -> Self {
        Self {
            scripts: scripts
                .into_iter()
                .map(|(model, script)| (model.to_string(), script))
                .collect(),
            created: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

}

struct ScriptedSummarizer {
    model: String,
    script: Script,
    attempts: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl Summarize for ScriptedSummarizer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn summarize(&self, prompt: &str) -> AgentResult<String> {
        self.attempts
            .lock()
            .unwrap()
            .push((self.model.clone(), prompt.to_string()));
        match &self.script {
            Script::Succeed(content) => Ok(content.clone()),
            _ => Err(AgentError::Provider(format!(
                "model '{}' is down",
                self.model
            ))),
        }
    }
}

impl SummarizerFactory for ScriptedSummarizerFactory {
    fn create(&self, model: &str, temperature: f32) -> AgentResult<Box<dyn Summarize>> {
        let script = self
            .scripts
            .get(model)
            .cloned()
            .unwrap_or(Script::Unavailable);
        if matches!(script, Script::Unavailable) {
            return Err(AgentError::Config(format!("no credentials for '{}'", model)));
        }
        self.created
            .lock()
            .unwrap()
            .push((model.to_string(), temperature));
        Ok(Box::new(ScriptedSummarizer {
            model: model.to_string(),
            script,
            attempts: Arc::clone(&self.attempts),
        }))
    }
}

fn test_config() -> Arc<ScoutConfig> {
    let mut config = ScoutConfig::default();
    config.llm.model = "primary-model".to_string();
    config.llm.temperature = 0.2;
    config.llm.fallback_models = vec!["fallback-one".to_string(), "fallback-two".to_string()];
    Arc::new(config)
}

fn example_search_results() -> Vec<SearchResult> {
    vec![SearchResult {
        title: "Example".to_string(),
        url: "http://example.com".to_string(),
        snippet: "Some content".to_string(),
    }]
}

const MOCK_OUTPUT: &str = "# Summary\nMock summary\n\n# Sources\n- [Example](http://example.com)";

fn pipeline_with(
    search: MockSearchFactory,
    scripts: Vec<(&str, Script)>,
) -> (ResearchPipeline, Arc<Mutex<Vec<(String, String)>>>, Arc<Mutex<Vec<(String, f32)>>>) {
    let factory = ScriptedSummarizerFactory::new(scripts);
    let attempts = Arc::clone(&factory.attempts);
    let created = Arc::clone(&factory.created);
    let pipeline =
        ResearchPipeline::with_factories(test_config(), Box::new(search), Box::new(factory));
    (pipeline, attempts, created)
}

fn models_of(attempts: &Arc<Mutex<Vec<(String, String)>>>) -> Vec<String> {
    attempts
        .lock()
        .unwrap()
        .iter()
        .map(|(model, _)| model.clone())
        .collect()
}

#[tokio::test]
async fn run_research_success_end_to_end() {
    let (pipeline, _, _) = pipeline_with(
        MockSearchFactory::with_results(example_search_results()),
        vec![("primary-model", Script::Succeed(MOCK_OUTPUT.to_string()))],
    );

    let result = pipeline
        .run_research(ResearchRequest::new("test query"))
        .await;

    assert_eq!(result.query, "test query");
    assert_eq!(result.final_summary, "Mock summary");
    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.sources[0].title, "Example");
    assert_eq!(result.sources[0].url, "http://example.com");
    assert!(!result.is_failure());
}

#[tokio::test]
async fn search_failure_short_circuits_before_summarization() {
    let search = MockSearchFactory {
        results: Vec::new(),
        fail_create: false,
        fail_search: true,
    };
    let (pipeline, attempts, _) = pipeline_with(
        search,
        vec![("primary-model", Script::Succeed(MOCK_OUTPUT.to_string()))],
    );

    let result = pipeline
        .run_research(ResearchRequest::new("test query"))
        .await;

    assert_eq!(result.final_summary, SEARCH_FAILED);
    assert!(result.sources.is_empty());
    assert!(result.is_failure());
    assert!(models_of(&attempts).is_empty(), "no summarization attempted");
}

#[tokio::test]
async fn search_client_construction_failure_is_terminal() {
    let search = MockSearchFactory {
        results: Vec::new(),
        fail_create: true,
        fail_search: false,
    };
    let (pipeline, attempts, _) = pipeline_with(
        search,
        vec![("primary-model", Script::Succeed(MOCK_OUTPUT.to_string()))],
    );

    let result = pipeline.run_research(ResearchRequest::new("q")).await;

    assert_eq!(result.final_summary, SEARCH_INIT_FAILED);
    assert!(result.sources.is_empty());
    assert!(models_of(&attempts).is_empty());
}

#[tokio::test]
async fn summarizer_construction_failure_is_terminal_without_fallback() {
    let (pipeline, attempts, _) = pipeline_with(
        MockSearchFactory::with_results(example_search_results()),
        vec![
            ("primary-model", Script::Unavailable),
            ("fallback-one", Script::Succeed(MOCK_OUTPUT.to_string())),
        ],
    );

    let result = pipeline.run_research(ResearchRequest::new("q")).await;

    assert_eq!(result.final_summary, LLM_INIT_FAILED);
    assert!(result.sources.is_empty());
    assert!(
        models_of(&attempts).is_empty(),
        "initialization failure must not enter the fallback loop"
    );
}

#[tokio::test]
async fn fallback_succeeds_after_primary_failure() {
    let fallback_output = "# Summary\nFallback summary\n\n# Sources\n- [F](http://f.com)";
    let (pipeline, attempts, _) = pipeline_with(
        MockSearchFactory::with_results(example_search_results()),
        vec![
            ("primary-model", Script::Fail),
            ("fallback-one", Script::Succeed(fallback_output.to_string())),
            ("fallback-two", Script::Succeed(MOCK_OUTPUT.to_string())),
        ],
    );

    let result = pipeline.run_research(ResearchRequest::new("q")).await;

    assert_eq!(result.final_summary, "Fallback summary");
    assert_eq!(result.sources[0].url, "http://f.com");
    // Primary attempted exactly once, then the first fallback; the loop
    // stops at first success.
    assert_eq!(
        models_of(&attempts),
        vec!["primary-model".to_string(), "fallback-one".to_string()]
    );
}

#[tokio::test]
async fn fallback_exhaustion_yields_sentinel() {
    let (pipeline, attempts, _) = pipeline_with(
        MockSearchFactory::with_results(example_search_results()),
        vec![
            ("primary-model", Script::Fail),
            ("fallback-one", Script::Fail),
            ("fallback-two", Script::Fail),
        ],
    );

    let result = pipeline.run_research(ResearchRequest::new("q")).await;

    assert_eq!(result.final_summary, LLM_FAILED);
    assert!(result.sources.is_empty());
    // 1 primary attempt + every configured fallback.
    assert_eq!(models_of(&attempts).len(), 3);
}

#[tokio::test]
async fn fallback_excludes_the_identifier_that_just_failed() {
    let mut config = ScoutConfig::default();
    config.llm.model = "primary-model".to_string();
    config.llm.fallback_models = vec![
        "primary-model".to_string(),
        "fallback-one".to_string(),
    ];
    let factory = ScriptedSummarizerFactory::new(vec![
        ("primary-model", Script::Fail),
        ("fallback-one", Script::Succeed(MOCK_OUTPUT.to_string())),
    ]);
    let attempts = Arc::clone(&factory.attempts);
    let pipeline = ResearchPipeline::with_factories(
        Arc::new(config),
        Box::new(MockSearchFactory::with_results(example_search_results())),
        Box::new(factory),
    );

    let result = pipeline.run_research(ResearchRequest::new("q")).await;

    assert!(!result.is_failure());
    let models: Vec<String> = attempts
        .lock()
        .unwrap()
        .iter()
        .map(|(model, _)| model.clone())
        .collect();
    assert_eq!(
        models,
        vec!["primary-model".to_string(), "fallback-one".to_string()],
        "the failed primary must not be retried from the fallback order"
    );
}

#[tokio::test]
async fn unavailable_fallback_candidate_is_skipped() {
    let (pipeline, attempts, _) = pipeline_with(
        MockSearchFactory::with_results(example_search_results()),
        vec![
            ("primary-model", Script::Fail),
            ("fallback-one", Script::Unavailable),
            ("fallback-two", Script::Succeed(MOCK_OUTPUT.to_string())),
        ],
    );

    let result = pipeline.run_research(ResearchRequest::new("q")).await;

    assert!(!result.is_failure());
    assert_eq!(
        models_of(&attempts),
        vec!["primary-model".to_string(), "fallback-two".to_string()]
    );
}

#[tokio::test]
async fn prompt_is_identical_across_all_attempts() {
    let (pipeline, attempts, _) = pipeline_with(
        MockSearchFactory::with_results(example_search_results()),
        vec![
            ("primary-model", Script::Fail),
            ("fallback-one", Script::Fail),
            ("fallback-two", Script::Fail),
        ],
    );

    pipeline
        .run_research(ResearchRequest::new("stable prompt query"))
        .await;

    let prompts: Vec<String> = attempts
        .lock()
        .unwrap()
        .iter()
        .map(|(_, prompt)| prompt.clone())
        .collect();
    assert_eq!(prompts.len(), 3);
    assert!(prompts.iter().all(|p| p == &prompts[0]));
    assert!(prompts[0].contains("stable prompt query"));
    assert!(prompts[0].contains("[Example](http://example.com)"));
}

#[tokio::test]
async fn request_overrides_model_and_temperature() {
    let (pipeline, _, created) = pipeline_with(
        MockSearchFactory::with_results(example_search_results()),
        vec![
            ("requested-model", Script::Fail),
            ("fallback-one", Script::Succeed(MOCK_OUTPUT.to_string())),
            ("fallback-two", Script::Succeed(MOCK_OUTPUT.to_string())),
        ],
    );

    let request = ResearchRequest::new("q")
        .with_model("requested-model")
        .with_temperature(1.5);
    let result = pipeline.run_research(request).await;

    assert!(!result.is_failure());
    let created = created.lock().unwrap().clone();
    assert_eq!(created[0], ("requested-model".to_string(), 1.5));
    // Fallback clients share the request temperature.
    assert!(created[1..].iter().all(|(_, t)| *t == 1.5));
}
