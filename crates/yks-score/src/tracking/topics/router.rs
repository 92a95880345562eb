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

use super::domain::{ReviewToggle, TopicStateUpdate};
use super::repository::TopicBoardRepository;
use super::service::{TopicProgressService, TopicTrackingError};
use crate::persistence::UserId;

/// Router builder exposing the topic catalog, topic boards, and completion figures.
pub fn topic_router<R>(service: Arc<TopicProgressService<R>>) -> Router
where
    R: TopicBoardRepository + 'static,
{
    Router::new()
        .route("/api/v1/topics/catalog", get(catalog_handler::<R>))
        .route(
            "/api/v1/topics/:user_id/states",
            get(board_handler::<R>).put(update_handler::<R>),
        )
        .route("/api/v1/topics/:user_id/review", post(review_handler::<R>))
        .route("/api/v1/topics/:user_id/progress", get(progress_handler::<R>))
        .with_state(service)
}

pub(crate) async fn catalog_handler<R>(
    State(service): State<Arc<TopicProgressService<R>>>,
) -> Response
where
    R: TopicBoardRepository + 'static,
{
    (StatusCode::OK, axum::Json(service.catalog().clone())).into_response()
}

pub(crate) async fn board_handler<R>(
    State(service): State<Arc<TopicProgressService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: TopicBoardRepository + 'static,
{
    match service.board(&UserId(user_id)) {
        Ok(board) => (StatusCode::OK, axum::Json(board)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<TopicProgressService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(updates): axum::Json<Vec<TopicStateUpdate>>,
) -> Response
where
    R: TopicBoardRepository + 'static,
{
    match service.update(&UserId(user_id), updates) {
        Ok(board) => (StatusCode::OK, axum::Json(board)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R>(
    State(service): State<Arc<TopicProgressService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(toggle): axum::Json<ReviewToggle>,
) -> Response
where
    R: TopicBoardRepository + 'static,
{
    match service.toggle_review(&UserId(user_id), toggle) {
        Ok(board) => (StatusCode::OK, axum::Json(board)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<R>(
    State(service): State<Arc<TopicProgressService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: TopicBoardRepository + 'static,
{
    match service.progress(&UserId(user_id)) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: TopicTrackingError) -> Response {
    let status = if error.is_user_correctable() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        warn!(%error, "topic tracking request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
