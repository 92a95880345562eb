use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::{NetRecordSubmission, RecordId};
use super::repository::NetRecordRepository;
use super::service::{NetTrackingError, NetTrackingService};
use crate::persistence::{RepositoryError, UserId};

/// Router builder exposing practice-exam net records and progress series.
pub fn net_router<R>(service: Arc<NetTrackingService<R>>) -> Router
where
    R: NetRecordRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/nets/:user_id/records",
            get(list_handler::<R>).post(record_handler::<R>),
        )
        .route(
            "/api/v1/nets/:user_id/records/:record_id",
            delete(delete_handler::<R>),
        )
        .route("/api/v1/nets/:user_id/progress", get(progress_handler::<R>))
        .with_state(service)
}

pub(crate) async fn record_handler<R>(
    State(service): State<Arc<NetTrackingService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(submission): axum::Json<NetRecordSubmission>,
) -> Response
where
    R: NetRecordRepository + 'static,
{
    match service.record(&UserId(user_id), submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<NetTrackingService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: NetRecordRepository + 'static,
{
    match service.list(&UserId(user_id)) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<NetTrackingService<R>>>,
    Path((user_id, record_id)): Path<(String, String)>,
) -> Response
where
    R: NetRecordRepository + 'static,
{
    let record_id = RecordId(record_id);
    match service.delete(&UserId(user_id), &record_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(NetTrackingError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "net record not found",
                "record_id": record_id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn progress_handler<R>(
    State(service): State<Arc<NetTrackingService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: NetRecordRepository + 'static,
{
    match service.progress(&UserId(user_id)) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: NetTrackingError) -> Response {
    let status = if error.is_user_correctable() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        warn!(%error, "net tracking request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
