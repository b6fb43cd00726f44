//! Language model client integration using siumai
//!
//! A model identifier selects one of two routing families: identifiers with a
//! provider namespace (`vendor/model`) or a free-tier suffix go through the
//! OpenRouter gateway, everything else goes directly to the provider. The
//! decision is made once per client; the underlying siumai client is built
//! lazily on the first `summarize` call and cached.

use crate::types::{AgentError, AgentResult};
use async_trait::async_trait;
use siumai::prelude::*;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const GATEWAY_BASE_URL: &str = "https://openrouter.ai/api/v1";
const FREE_TIER_SUFFIX: &str = ":free";

/// Routing family of a model identifier, decided once from its shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRoute {
    /// Direct provider call using the provider's own API
    Direct { model: String },
    /// Call through the OpenRouter gateway's OpenAI-compatible API
    Gateway { model: String },
}

impl ModelRoute {
    /// Classify a model identifier
    ///
    /// Namespaced identifiers (`vendor/model`) and free-tier identifiers
    /// (`...:free`) only exist on the gateway; everything else is a direct
    /// provider model name.
    pub fn from_identifier(identifier: &str) -> Self {
        if identifier.contains('/') || identifier.ends_with(FREE_TIER_SUFFIX) {
            ModelRoute::Gateway {
                model: identifier.to_string(),
            }
        } else {
            ModelRoute::Direct {
                model: identifier.to_string(),
            }
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ModelRoute::Direct { model } | ModelRoute::Gateway { model } => model,
        }
    }

    pub fn is_gateway(&self) -> bool {
        matches!(self, ModelRoute::Gateway { .. })
    }
}

/// Credentials resolved for a route at construction time
#[derive(Debug, Clone)]
enum Credentials {
    /// Gateway calls always need an explicit gateway key
    Gateway { api_key: String },
    /// Direct calls use the configured key when present, otherwise rely on
    /// ambient environment configuration and may fail at call time
    Direct { api_key: Option<String> },
}

/// Produces raw text from a prompt via a language model
#[async_trait]
pub trait Summarize: Send + Sync {
    /// The model identifier this summarizer is bound to
    fn model(&self) -> &str;

    /// Send the prompt as a single user message and return the response text
    /// verbatim.
    async fn summarize(&self, prompt: &str) -> AgentResult<String>;
}

/// Summarizer backed by a lazily constructed siumai client
pub struct SummarizerClient {
    route: ModelRoute,
    temperature: f32,
    credentials: Credentials,
    client: OnceCell<Box<dyn LlmClient>>,
}

impl SummarizerClient {
    /// Create a summarizer resolving credentials from the environment
    pub fn new(identifier: &str, temperature: f32) -> AgentResult<Self> {
        Self::with_credentials(
            identifier,
            temperature,
            std::env::var("OPENROUTER_API_KEY").ok(),
            std::env::var("OPENAI_API_KEY").ok(),
        )
    }

    /// Create a summarizer from explicit credentials
    ///
    /// Fails with a configuration error when the identifier routes through
    /// the gateway and no gateway key is available.
    pub fn with_credentials(
        identifier: &str,
        temperature: f32,
        gateway_key: Option<String>,
        direct_key: Option<String>,
    ) -> AgentResult<Self> {
        let route = ModelRoute::from_identifier(identifier);
        let credentials = match &route {
            ModelRoute::Gateway { model } => {
                let api_key = gateway_key.ok_or_else(|| {
                    AgentError::Config(format!(
                        "OPENROUTER_API_KEY is required for gateway-routed model '{}'",
                        model
                    ))
                })?;
                Credentials::Gateway { api_key }
            }
            ModelRoute::Direct { .. } => Credentials::Direct {
                api_key: direct_key,
            },
        };

        Ok(Self {
            route,
            temperature,
            credentials,
            client: OnceCell::new(),
        })
    }

    pub fn route(&self) -> &ModelRoute {
        &self.route
    }

    async fn ensure_client(&self) -> AgentResult<&Box<dyn LlmClient>> {
        self.client
            .get_or_try_init(|| async { self.build_client().await })
            .await
    }

    /// Build the siumai client for the resolved route
    async fn build_client(&self) -> AgentResult<Box<dyn LlmClient>> {
        let model = self.route.model();
        debug!(
            "Building LLM client for model: {} (gateway: {})",
            model,
            self.route.is_gateway()
        );

        match &self.credentials {
            Credentials::Gateway { api_key } => {
                let client = LlmBuilder::new()
                    .openai()
                    .api_key(api_key)
                    .base_url(GATEWAY_BASE_URL)
                    .model(model)
                    .temperature(self.temperature)
                    .build()
                    .await
                    .map_err(|e| {
                        AgentError::Provider(format!("Failed to build gateway client: {}", e))
                    })?;
                Ok(Box::new(client))
            }
            Credentials::Direct { api_key: Some(key) } => {
                let client = LlmBuilder::new()
                    .openai()
                    .api_key(key)
                    .model(model)
                    .temperature(self.temperature)
                    .build()
                    .await
                    .map_err(|e| {
                        AgentError::Provider(format!("Failed to build provider client: {}", e))
                    })?;
                Ok(Box::new(client))
            }
            Credentials::Direct { api_key: None } => {
                // No configured key; the builder falls back to ambient
                // environment configuration and may fail here.
                let client = LlmBuilder::new()
                    .openai()
                    .model(model)
                    .temperature(self.temperature)
                    .build()
                    .await
                    .map_err(|e| {
                        AgentError::Provider(format!("Failed to build provider client: {}", e))
                    })?;
                Ok(Box::new(client))
            }
        }
    }
}

#[async_trait]
impl Summarize for SummarizerClient {
    fn model(&self) -> &str {
        self.route.model()
    }

    async fn summarize(&self, prompt: &str) -> AgentResult<String> {
        let client = self.ensure_client().await?;
        let start = Instant::now();

        let messages = vec![user!(prompt)];
        let response = client
            .chat(messages)
            .await
            .map_err(|e| AgentError::Provider(format!("LLM invocation failed: {}", e)))?;

        if let Some(content) = response.content_text() {
            info!(
                "Generated response in {:?} ({} chars)",
                start.elapsed(),
                content.len()
            );
            Ok(content.to_string())
        } else {
            Err(AgentError::Provider(
                "No text content in LLM response".to_string(),
            ))
        }
    }
}

/// Constructs summarizers, one per model attempt
pub trait SummarizerFactory: Send + Sync {
    fn create(&self, model: &str, temperature: f32) -> AgentResult<Box<dyn Summarize>>;
}

/// Default factory creating siumai-backed summarizers from the environment
pub struct SiumaiSummarizerFactory;

impl SummarizerFactory for SiumaiSummarizerFactory {
    fn create(&self, model: &str, temperature: f32) -> AgentResult<Box<dyn Summarize>> {
        Ok(Box::new(SummarizerClient::new(model, temperature)?))
    }
}
