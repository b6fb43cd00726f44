//! OpenAPI documentation for the Scout web API

use crate::handlers;
use axum::response::Json;
use utoipa::OpenApi;

/// API documentation root
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scout API",
        version = "0.1.0",
        description = "Web research agent: search, summarize and cite"
    ),
    paths(
        handlers::health_check,
        handlers::research,
        handlers::research_history,
        handlers::list_models,
    ),
    components(schemas(
        handlers::HealthResponse,
        handlers::ResearchPayload,
        handlers::Source,
        handlers::ResearchResponse,
        handlers::ResearchRecord,
        handlers::ResearchHistoryResponse,
        handlers::ModelAlias,
        handlers::ModelsResponse,
        handlers::ErrorBody,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Research", description = "Research pipeline endpoints")
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI specification
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
