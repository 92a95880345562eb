use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::persistence::{RepositoryError, UserId};
use crate::scoring::domain::{
    AnswerCount, FirstStageAnswers, FirstStageSubject, SecondStageAnswers, SecondStageSubject,
    TrackSelection,
};
use crate::scoring::guard::ScoreSheetSubmission;
use crate::scoring::profile::ScoringProfile;
use crate::scoring::repository::{SavedSheet, ScoreSheetRepository};
use crate::scoring::service::{EstimateRequest, ScoreService};

pub(super) fn first_stage() -> FirstStageAnswers {
    FirstStageAnswers::from([
        (FirstStageSubject::Turkish, AnswerCount::new(31, 0).with_unanswered(9)),
        (FirstStageSubject::SocialSciences, AnswerCount::new(11, 0)),
        (FirstStageSubject::BasicMathematics, AnswerCount::new(11, 0)),
        (FirstStageSubject::Science, AnswerCount::new(11, 0)),
    ])
}

pub(super) fn zero_first_stage() -> FirstStageAnswers {
    FirstStageSubject::ordered()
        .into_iter()
        .map(|subject| (subject, AnswerCount::default()))
        .collect()
}

pub(super) fn second_stage() -> SecondStageAnswers {
    SecondStageAnswers::from([
        (SecondStageSubject::Mathematics, AnswerCount::new(11, 0)),
        (SecondStageSubject::Physics, AnswerCount::new(7, 4)),
        (SecondStageSubject::Literature, AnswerCount::new(16, 0)),
        (SecondStageSubject::History1, AnswerCount::new(6, 0)),
        (SecondStageSubject::Geography1, AnswerCount::new(6, 0)),
        (SecondStageSubject::Philosophy, AnswerCount::new(8, 2)),
    ])
}

pub(super) fn request(track: TrackSelection) -> EstimateRequest {
    EstimateRequest {
        track,
        sheet: ScoreSheetSubmission {
            first_stage: first_stage(),
            second_stage: second_stage(),
            diploma: Some(80.0),
        },
    }
}

pub(super) fn build_service() -> (ScoreService<MemorySheets>, Arc<MemorySheets>) {
    let repository = Arc::new(MemorySheets::default());
    let service = ScoreService::new(
        repository.clone(),
        Arc::new(ScoringProfile::standard().clone()),
    );
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemorySheets {
    pub(super) sheets: Arc<Mutex<HashMap<UserId, SavedSheet>>>,
}

impl ScoreSheetRepository for MemorySheets {
    fn save(&self, sheet: SavedSheet) -> Result<(), RepositoryError> {
        self.sheets
            .lock()
            .expect("repository mutex poisoned")
            .insert(sheet.user_id.clone(), sheet);
        Ok(())
    }

    fn latest(&self, user_id: &UserId) -> Result<Option<SavedSheet>, RepositoryError> {
        let guard = self.sheets.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }
}

pub(super) struct UnavailableSheets;

impl ScoreSheetRepository for UnavailableSheets {
    fn save(&self, _sheet: SavedSheet) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest(&self, _user_id: &UserId) -> Result<Option<SavedSheet>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn close(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}
