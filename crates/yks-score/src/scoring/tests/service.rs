use super::common::*;
use crate::persistence::{RepositoryError, UserId};
use crate::scoring::domain::{Track, TrackSelection};
use crate::scoring::engine::EstimateError;
use crate::scoring::guard::SheetViolation;
use crate::scoring::profile::ScoringProfile;
use crate::scoring::repository::ScoreSheetRepository;
use crate::scoring::service::{ScoreService, ScoreServiceError};
use crate::scoring::FirstStageAnswers;
use std::sync::Arc;

#[test]
fn estimate_does_not_touch_storage() {
    let (service, repository) = build_service();

    let estimate = service
        .estimate(request(TrackSelection::Single(Track::EqualWeight)))
        .expect("estimate succeeds");

    assert_eq!(estimate.results.len(), 1);
    assert!(estimate.get(Track::EqualWeight).is_some());
    assert!(repository.sheets.lock().expect("lock").is_empty());
}

#[test]
fn save_stores_latest_sheet_for_user() {
    let (service, repository) = build_service();
    let user = UserId("student-1".to_string());

    let first = service
        .save(user.clone(), request(TrackSelection::All))
        .expect("first save");
    assert_eq!(first.results.len(), 3);

    let mut second_request = request(TrackSelection::Single(Track::Verbal));
    second_request.sheet.diploma = Some(95.0);
    service
        .save(user.clone(), second_request)
        .expect("second save");

    let latest = service.latest(&user).expect("latest sheet");
    assert_eq!(latest.selection, TrackSelection::Single(Track::Verbal));
    assert_eq!(latest.sheet.diploma, Some(95.0));
    assert_eq!(
        repository.latest(&user).expect("read").map(|saved| saved.user_id),
        Some(user)
    );
}

#[test]
fn latest_reports_not_found_for_unknown_user() {
    let (service, _) = build_service();

    match service.latest(&UserId("nobody".to_string())) {
        Err(ScoreServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn invalid_sheets_are_not_saved() {
    let (service, repository) = build_service();
    let mut bad = request(TrackSelection::All);
    bad.sheet.diploma = Some(120.0);

    let err = service
        .save(UserId("student-2".to_string()), bad)
        .expect_err("diploma out of range");

    assert!(matches!(
        err,
        ScoreServiceError::Sheet(SheetViolation::DiplomaOutOfRange { .. })
    ));
    assert!(err.is_user_correctable());
    assert!(repository.sheets.lock().expect("lock").is_empty());
}

#[test]
fn missing_first_stage_is_user_correctable() {
    let (service, _) = build_service();
    let mut empty = request(TrackSelection::All);
    empty.sheet.first_stage = FirstStageAnswers::new();

    let err = service.estimate(empty).expect_err("no first stage");
    assert!(matches!(
        err,
        ScoreServiceError::Estimate(EstimateError::MissingFirstStageData)
    ));
    assert!(err.is_user_correctable());
}

#[test]
fn repository_outage_is_not_user_correctable() {
    let service = ScoreService::new(
        Arc::new(UnavailableSheets),
        Arc::new(ScoringProfile::standard().clone()),
    );

    let err = service
        .save(UserId("student-3".to_string()), request(TrackSelection::All))
        .expect_err("repository offline");

    assert!(matches!(
        err,
        ScoreServiceError::Repository(RepositoryError::Unavailable(_))
    ));
    assert!(!err.is_user_correctable());
}
