use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::warn;

use super::repository::ScoreSheetRepository;
use super::service::{EstimateRequest, ScoreService, ScoreServiceError};
use crate::persistence::{RepositoryError, UserId};

/// Router builder exposing HTTP endpoints for score estimation and saved sheets.
pub fn score_router<R>(service: Arc<ScoreService<R>>) -> Router
where
    R: ScoreSheetRepository + 'static,
{
    Router::new()
        .route("/api/v1/scores/estimate", post(estimate_handler::<R>))
        .route(
            "/api/v1/scores/sheets/:user_id",
            get(latest_handler::<R>).put(save_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn estimate_handler<R>(
    State(service): State<Arc<ScoreService<R>>>,
    axum::Json(request): axum::Json<EstimateRequest>,
) -> Response
where
    R: ScoreSheetRepository + 'static,
{
    match service.estimate(request) {
        Ok(estimate) => (StatusCode::OK, axum::Json(estimate)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_handler<R>(
    State(service): State<Arc<ScoreService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<EstimateRequest>,
) -> Response
where
    R: ScoreSheetRepository + 'static,
{
    match service.save(UserId(user_id), request) {
        Ok(estimate) => (StatusCode::OK, axum::Json(estimate)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn latest_handler<R>(
    State(service): State<Arc<ScoreService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ScoreSheetRepository + 'static,
{
    let id = UserId(user_id);
    match service.latest(&id) {
        Ok(saved) => (StatusCode::OK, axum::Json(saved)).into_response(),
        Err(ScoreServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "no saved score sheet",
                "user_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

fn error_response(error: ScoreServiceError) -> Response {
    let status = if error.is_user_correctable() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        warn!(%error, "score request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
