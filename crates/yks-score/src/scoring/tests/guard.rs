use super::common::*;
use crate::scoring::domain::{AnswerCount, FirstStageSubject, SecondStageSubject};
use crate::scoring::guard::{DiplomaPolicy, ScoreSheetSubmission, SheetGuard, SheetViolation};

fn submission() -> ScoreSheetSubmission {
    ScoreSheetSubmission {
        first_stage: first_stage(),
        second_stage: second_stage(),
        diploma: Some(80.0),
    }
}

#[test]
fn accepts_sheets_within_question_limits() {
    let sheet = SheetGuard::default()
        .sheet_from_submission(submission())
        .expect("valid sheet");

    assert_eq!(sheet.first_stage, first_stage());
    assert_eq!(sheet.second_stage, second_stage());
    assert_eq!(sheet.diploma, Some(80.0));
}

#[test]
fn rejects_more_answers_than_questions() {
    let mut bad = submission();
    bad.first_stage.insert(
        FirstStageSubject::SocialSciences,
        AnswerCount::new(15, 4).with_unanswered(2),
    );

    match SheetGuard::default().sheet_from_submission(bad) {
        Err(SheetViolation::TooManyAnswers {
            subject,
            answered,
            limit,
        }) => {
            assert_eq!(subject, "social_sciences");
            assert_eq!(answered, 21);
            assert_eq!(limit, 20);
        }
        other => panic!("expected question limit violation, got {other:?}"),
    }
}

#[test]
fn second_stage_limits_are_per_subject() {
    let mut bad = submission();
    bad.second_stage
        .insert(SecondStageSubject::Geography1, AnswerCount::new(5, 2));

    let err = SheetGuard::default()
        .sheet_from_submission(bad)
        .expect_err("geography 1 has six questions");
    assert_eq!(err.to_string(), "geography_1 has 7 answers but only 6 questions");
}

#[test]
fn zero_diploma_is_treated_as_blank() {
    let mut blank = submission();
    blank.diploma = Some(0.0);

    let sheet = SheetGuard::default()
        .sheet_from_submission(blank)
        .expect("blank diploma accepted");
    assert_eq!(sheet.diploma, None);
}

#[test]
fn diploma_outside_policy_is_rejected() {
    let mut low = submission();
    low.diploma = Some(42.5);

    assert_eq!(
        SheetGuard::default().sheet_from_submission(low),
        Err(SheetViolation::DiplomaOutOfRange {
            found: 42.5,
            min: 50.0,
            max: 100.0,
        })
    );
}

#[test]
fn custom_policy_widens_accepted_diplomas() {
    let guard = SheetGuard::with_policy(DiplomaPolicy::new(0.0, 100.0));
    let mut low = submission();
    low.diploma = Some(42.5);

    let sheet = guard.sheet_from_submission(low).expect("within custom policy");
    assert_eq!(sheet.diploma, Some(42.5));
}

#[test]
fn inverted_policy_falls_back_to_defaults() {
    assert_eq!(DiplomaPolicy::new(90.0, 10.0).bounds(), (50.0, 100.0));
    assert_eq!(DiplomaPolicy::new(f64::NAN, 10.0).bounds(), (50.0, 100.0));
}
