use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use yks_score::scoring::{score_router, ScoreService, ScoreSheetRepository};
use yks_score::tracking::{
    net_router, solved_router, topic_router, NetRecordRepository, NetTrackingService,
    SolvedEntryRepository, SolvedProblemService, TopicBoardRepository, TopicProgressService,
};

pub(crate) struct ApiServices<S, N, T, P> {
    pub(crate) scores: Arc<ScoreService<S>>,
    pub(crate) nets: Arc<NetTrackingService<N>>,
    pub(crate) topics: Arc<TopicProgressService<T>>,
    pub(crate) solved: Arc<SolvedProblemService<P>>,
}

pub(crate) fn with_api_routes<S, N, T, P>(services: ApiServices<S, N, T, P>) -> axum::Router
where
    S: ScoreSheetRepository + 'static,
    N: NetRecordRepository + 'static,
    T: TopicBoardRepository + 'static,
    P: SolvedEntryRepository + 'static,
{
    score_router(services.scores)
        .merge(net_router(services.nets))
        .merge(topic_router(services.topics))
        .merge(solved_router(services.solved))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
