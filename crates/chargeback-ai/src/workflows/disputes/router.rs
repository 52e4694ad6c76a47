use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{DisputeCategory, DisputeId};
use super::repository::DisputeRepository;
use super::service::{DisputeAnalysisService, DisputeServiceError};

const DEFAULT_BATCH_LIMIT: usize = 50;

/// Batch body: explicit ids, or every open case of one category.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BatchRequest {
    Disputes {
        dispute_ids: Vec<DisputeId>,
    },
    Category {
        category: DisputeCategory,
        #[serde(default = "default_batch_limit")]
        limit: usize,
    },
}

fn default_batch_limit() -> usize {
    DEFAULT_BATCH_LIMIT
}

/// Router builder exposing HTTP endpoints for dispute analysis.
pub fn dispute_router<R>(service: Arc<DisputeAnalysisService<R>>) -> Router
where
    R: DisputeRepository + 'static,
{
    Router::new()
        .route("/api/v1/disputes/analyze", post(batch_handler::<R>))
        .route(
            "/api/v1/disputes/:dispute_id/analyze",
            post(analyze_handler::<R>),
        )
        .route(
            "/api/v1/disputes/:dispute_id/analysis",
            get(analysis_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn analyze_handler<R>(
    State(service): State<Arc<DisputeAnalysisService<R>>>,
    Path(dispute_id): Path<String>,
) -> Response
where
    R: DisputeRepository + 'static,
{
    let id = DisputeId(dispute_id);
    match off_executor(move || service.analyze(&id)).await {
        Ok(decision) => (StatusCode::OK, axum::Json(decision)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn batch_handler<R>(
    State(service): State<Arc<DisputeAnalysisService<R>>>,
    axum::Json(request): axum::Json<BatchRequest>,
) -> Response
where
    R: DisputeRepository + 'static,
{
    let outcome = off_executor(move || match request {
        BatchRequest::Disputes { dispute_ids } => Ok(service.analyze_batch(&dispute_ids)),
        BatchRequest::Category { category, limit } => service.analyze_category(category, limit),
    })
    .await;

    match outcome {
        Ok(decisions) => {
            let payload = json!({
                "analyzed": decisions.len(),
                "decisions": decisions,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn analysis_handler<R>(
    State(service): State<Arc<DisputeAnalysisService<R>>>,
    Path(dispute_id): Path<String>,
) -> Response
where
    R: DisputeRepository + 'static,
{
    let id = DisputeId(dispute_id);
    let lookup_id = id.clone();
    match off_executor(move || service.latest_analysis(&lookup_id)).await {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record.summary_view())).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("dispute {id} has not been analysed"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

/// Repository reads and scoring are synchronous; run them on the blocking pool.
async fn off_executor<T, F>(work: F) -> Result<T, Response>
where
    F: FnOnce() -> Result<T, DisputeServiceError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(err)),
        Err(join_error) => {
            let payload = json!({
                "error": join_error.to_string(),
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response())
        }
    }
}

fn error_response(err: DisputeServiceError) -> Response {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if matches!(err, DisputeServiceError::InvalidInput(_)) {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
