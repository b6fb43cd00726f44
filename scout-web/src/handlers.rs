//! HTTP request handlers for the Scout web server

use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    Json as JsonExtractor,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    #[schema(value_type = String)]
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Research request payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResearchPayload {
    /// The natural-language query to research
    pub query: String,
    /// Model alias from the configured allow-list
    pub model: Option<String>,
    /// Sampling temperature, in [0.0, 2.0]
    pub temperature: Option<f32>,
}

/// A cited source
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Source {
    pub title: String,
    pub url: String,
}

impl From<scout_agent::Source> for Source {
    fn from(source: scout_agent::Source) -> Self {
        Self {
            title: source.title,
            url: source.url,
        }
    }
}

/// Research response
#[derive(Debug, Serialize, ToSchema)]
pub struct ResearchResponse {
    pub query: String,
    pub final_summary: String,
    pub sources: Vec<Source>,
}

impl From<scout_agent::ResearchResult> for ResearchResponse {
    fn from(result: scout_agent::ResearchResult) -> Self {
        Self {
            query: result.query,
            final_summary: result.final_summary,
            sources: result.sources.into_iter().map(Source::from).collect(),
        }
    }
}

/// One persisted research record
#[derive(Debug, Serialize, ToSchema)]
pub struct ResearchRecord {
    pub query: String,
    pub final_summary: String,
    pub sources: Vec<Source>,
    #[schema(value_type = String)]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Research history response
#[derive(Debug, Serialize, ToSchema)]
pub struct ResearchHistoryResponse {
    pub items: Vec<ResearchRecord>,
}

/// Query parameters for history reads
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

/// One selectable model alias
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelAlias {
    pub alias: String,
    pub model: String,
}

/// Selectable model aliases response
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelsResponse {
    pub models: Vec<ModelAlias>,
}

/// Error body returned for request validation failures
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn unprocessable(message: impl Into<String>) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Run one research pass for a query
///
/// Request validation failures yield 422. A pipeline failure does not: the
/// pipeline reports it as a well-formed result whose summary starts with
/// `"Error:"`, returned with status 200.
#[utoipa::path(
    post,
    path = "/api/research",
    tag = "Research",
    request_body = ResearchPayload,
    responses(
        (status = 200, description = "Research completed", body = ResearchResponse),
        (status = 422, description = "Invalid request", body = ErrorBody)
    )
)]
pub async fn research(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<ResearchPayload>,
) -> Result<Json<ResearchResponse>, ApiError> {
    let query = payload.query.trim().to_string();
    if query.is_empty() {
        return Err(unprocessable("query must not be empty"));
    }

    if let Some(temperature) = payload.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(unprocessable(format!(
                "temperature must be within [0.0, 2.0], got {}",
                temperature
            )));
        }
    }

    // Request-supplied models are aliases that must map through the
    // allow-list; an unknown alias is a request error, not a pipeline error.
    let model_name = match payload.model.as_deref() {
        Some(alias) => match state.scout.resolve_model_alias(alias) {
            Some(model) => Some(model.to_string()),
            None => {
                return Err(unprocessable(format!("unknown model alias: {}", alias)));
            }
        },
        None => None,
    };

    info!("Research request: {}", query);

    let mut request = scout_agent::ResearchRequest::new(query);
    request.model_name = model_name;
    request.temperature = payload.temperature;

    let result = state.pipeline.run_research(request).await;

    // Persist successful results out of band; failures never delay or alter
    // the response.
    if !result.is_failure() {
        if let Some(recorder) = &state.recorder {
            recorder.record(&result);
        }
    }

    Ok(Json(ResearchResponse::from(result)))
}

/// Read recent research records, newest first
#[utoipa::path(
    get,
    path = "/api/research/history",
    tag = "Research",
    params(
        ("limit" = Option<usize>, Query, description = "Maximum records to return")
    ),
    responses(
        (status = 200, description = "Recent research records", body = ResearchHistoryResponse)
    )
)]
pub async fn research_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<ResearchHistoryResponse> {
    let limit = params.limit.unwrap_or(state.scout.history.default_limit);

    let items = match &state.history {
        Some(log) => {
            use scout_agent::ResearchLogStore;
            match log.read_recent(limit).await {
                Ok(records) => records
                    .into_iter()
                    .map(|record| ResearchRecord {
                        query: record.query.clone(),
                        final_summary: record.final_summary.clone(),
                        sources: record.sources().into_iter().map(Source::from).collect(),
                        created_at: record.created_at,
                    })
                    .collect(),
                Err(e) => {
                    error!("Failed to read research history: {}", e);
                    Vec::new()
                }
            }
        }
        None => Vec::new(),
    };

    Json(ResearchHistoryResponse { items })
}

/// List the configured model aliases
#[utoipa::path(
    get,
    path = "/api/research/models",
    tag = "Research",
    responses(
        (status = 200, description = "Selectable model aliases", body = ModelsResponse)
    )
)]
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let mut models: Vec<ModelAlias> = state
        .scout
        .llm
        .model_aliases
        .iter()
        .map(|(alias, model)| ModelAlias {
            alias: alias.clone(),
            model: model.clone(),
        })
        .collect();
    models.sort_by(|a, b| a.alias.cmp(&b.alias));

    Json(ModelsResponse { models })
}
