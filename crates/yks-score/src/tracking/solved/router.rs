use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::{SolvedEntryId, SolvedSubmission};
use super::repository::SolvedEntryRepository;
use super::service::{SolvedProblemService, SolvedTrackingError};
use crate::persistence::{RepositoryError, UserId};

/// Router builder exposing today's solved-question entries and their totals.
pub fn solved_router<R>(service: Arc<SolvedProblemService<R>>) -> Router
where
    R: SolvedEntryRepository + 'static,
{
    Router::new()
        .route("/api/v1/solved/:user_id/entries", put(save_handler::<R>))
        .route(
            "/api/v1/solved/:user_id/entries/:entry_id",
            delete(delete_handler::<R>),
        )
        .route("/api/v1/solved/:user_id/today", get(today_handler::<R>))
        .with_state(service)
}

pub(crate) async fn save_handler<R>(
    State(service): State<Arc<SolvedProblemService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(submission): axum::Json<SolvedSubmission>,
) -> Response
where
    R: SolvedEntryRepository + 'static,
{
    match service.save(&UserId(user_id), submission) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<SolvedProblemService<R>>>,
    Path((user_id, entry_id)): Path<(String, String)>,
) -> Response
where
    R: SolvedEntryRepository + 'static,
{
    let entry_id = SolvedEntryId(entry_id);
    match service.delete(&UserId(user_id), &entry_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(SolvedTrackingError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "solved entry not found",
                "entry_id": entry_id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn today_handler<R>(
    State(service): State<Arc<SolvedProblemService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: SolvedEntryRepository + 'static,
{
    match service.today(&UserId(user_id)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: SolvedTrackingError) -> Response {
    let status = if error.is_user_correctable() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        warn!(%error, "solved question request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
