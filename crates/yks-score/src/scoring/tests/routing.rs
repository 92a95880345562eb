use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::scoring::domain::{Track, TrackSelection};
use crate::scoring::profile::ScoringProfile;
use crate::scoring::router::{estimate_handler, latest_handler, save_handler, score_router};
use crate::scoring::service::ScoreService;
use crate::scoring::FirstStageAnswers;

#[tokio::test]
async fn estimate_handler_returns_results_per_track() {
    let (service, _) = build_service();

    let response = estimate_handler::<MemorySheets>(
        State(Arc::new(service)),
        axum::Json(request(TrackSelection::All)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["selection"], json!("all"));
    for track in Track::ALL {
        assert!(body["results"][track.key()]["estimated_rank"].is_u64());
    }
}

#[tokio::test]
async fn estimate_handler_returns_unprocessable_without_first_stage() {
    let (service, _) = build_service();
    let mut empty = request(TrackSelection::All);
    empty.sheet.first_stage = FirstStageAnswers::new();

    let response =
        estimate_handler::<MemorySheets>(State(Arc::new(service)), axum::Json(empty)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("first-stage"));
}

#[tokio::test]
async fn latest_handler_returns_not_found_for_unknown_user() {
    let (service, _) = build_service();

    let response = latest_handler::<MemorySheets>(
        State(Arc::new(service)),
        Path("student-404".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["user_id"], json!("student-404"));
}

#[tokio::test]
async fn save_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(ScoreService::new(
        Arc::new(UnavailableSheets),
        Arc::new(ScoringProfile::standard().clone()),
    ));

    let response = save_handler::<UnavailableSheets>(
        State(service),
        Path("student-1".to_string()),
        axum::Json(request(TrackSelection::Single(Track::Quantitative))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn router_saves_and_returns_latest_sheet() {
    let (service, _) = build_service();
    let app = score_router(Arc::new(service));

    let payload = serde_json::to_vec(&request(TrackSelection::Single(Track::Verbal)))
        .expect("serialize request");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/scores/sheets/student-7")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/scores/sheets/student-7")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["user_id"], json!("student-7"));
    assert_eq!(body["selection"], json!("verbal"));
    assert_eq!(body["sheet"]["diploma"], json!(80.0));
}

#[tokio::test]
async fn router_accepts_form_style_json() {
    let (service, _) = build_service();
    let app = score_router(Arc::new(service));

    let payload = json!({
        "track": "ea",
        "first_stage": {
            "turkish": { "correct": 30, "incorrect": 4 },
            "basic_mathematics": { "correct": 20, "incorrect": 8, "unanswered": 12 }
        }
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/scores/estimate")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["warnings"], json!(["missing_second_stage_data"]));
    assert_eq!(
        body["results"]["equal_weight"]["composite"]["basis"],
        json!("first_stage_only")
    );
}
