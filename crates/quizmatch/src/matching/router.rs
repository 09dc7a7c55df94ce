use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Answer, TestId};
use super::repository::{RepositoryError, ResultRepository};
use super::service::{ResultService, ResultServiceError, ResultSubmission};

/// Router builder exposing result resolution over HTTP.
pub fn result_router<R>(service: Arc<ResultService<R>>) -> Router
where
    R: ResultRepository + 'static,
{
    Router::new()
        .route("/api/v1/tests/:test_id/result", post(resolve_handler::<R>))
        .route("/api/v1/tests/:test_id/summary", post(summary_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryRequest {
    pub(crate) answers: Vec<Answer>,
}

impl ResultServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResultServiceError::NotFound(_)
            | ResultServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            ResultServiceError::Answer(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ResultServiceError::NoOutcomes(_) => StatusCode::CONFLICT,
            ResultServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn error_response(test_id: &TestId, error: ResultServiceError) -> Response {
    let payload = json!({
        "test_id": test_id.0,
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}

pub(crate) async fn resolve_handler<R>(
    State(service): State<Arc<ResultService<R>>>,
    Path(test_id): Path<String>,
    axum::Json(submission): axum::Json<ResultSubmission>,
) -> Response
where
    R: ResultRepository + 'static,
{
    let test_id = TestId(test_id);
    match service.resolve(&test_id, submission) {
        Ok(resolved) => (StatusCode::OK, axum::Json(resolved.view())).into_response(),
        Err(error) => error_response(&test_id, error),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<ResultService<R>>>,
    Path(test_id): Path<String>,
    axum::Json(request): axum::Json<SummaryRequest>,
) -> Response
where
    R: ResultRepository + 'static,
{
    let test_id = TestId(test_id);
    match service.summarize(&test_id, request.answers) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(&test_id, error),
    }
}
