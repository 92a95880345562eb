use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::TrackSelection;
use super::engine::{Estimate, EstimateError, ScoreEstimator};
use super::guard::{ScoreSheet, ScoreSheetSubmission, SheetGuard, SheetViolation};
use super::profile::ScoringProfile;
use super::repository::{SavedSheet, ScoreSheetRepository};
use crate::persistence::{RepositoryError, UserId};

/// Request body for estimates: which tracks to score plus the raw sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub track: TrackSelection,
    #[serde(flatten)]
    pub sheet: ScoreSheetSubmission,
}

/// Service composing the sheet guard, the estimator, and sheet storage.
pub struct ScoreService<R> {
    guard: Arc<SheetGuard>,
    estimator: Arc<ScoreEstimator>,
    repository: Arc<R>,
}

impl<R> ScoreService<R>
where
    R: ScoreSheetRepository + 'static,
{
    pub fn new(repository: Arc<R>, profile: Arc<ScoringProfile>) -> Self {
        Self::with_guard(SheetGuard::default(), repository, profile)
    }

    pub fn with_guard(guard: SheetGuard, repository: Arc<R>, profile: Arc<ScoringProfile>) -> Self {
        Self {
            guard: Arc::new(guard),
            estimator: Arc::new(ScoreEstimator::new(profile)),
            repository,
        }
    }

    pub fn estimator(&self) -> &ScoreEstimator {
        &self.estimator
    }

    /// Validate and score a sheet without storing it.
    pub fn estimate(&self, request: EstimateRequest) -> Result<Estimate, ScoreServiceError> {
        let sheet = self.guard.sheet_from_submission(request.sheet)?;
        self.score(request.track, &sheet)
    }

    /// Score a sheet and keep it as the user's latest.
    pub fn save(
        &self,
        user_id: UserId,
        request: EstimateRequest,
    ) -> Result<Estimate, ScoreServiceError> {
        let sheet = self.guard.sheet_from_submission(request.sheet)?;
        let estimate = self.score(request.track, &sheet)?;

        self.repository.save(SavedSheet {
            user_id: user_id.clone(),
            selection: request.track,
            sheet,
            saved_at: Utc::now(),
        })?;
        info!(user = %user_id, tracks = estimate.results.len(), "score sheet saved");

        Ok(estimate)
    }

    /// Latest saved sheet for pre-filling a form.
    pub fn latest(&self, user_id: &UserId) -> Result<SavedSheet, ScoreServiceError> {
        let saved = self
            .repository
            .latest(user_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(saved)
    }

    fn score(
        &self,
        selection: TrackSelection,
        sheet: &ScoreSheet,
    ) -> Result<Estimate, ScoreServiceError> {
        let estimate = self.estimator.estimate(
            selection,
            &sheet.first_stage,
            &sheet.second_stage,
            sheet.diploma,
        )?;

        for (track, result) in &estimate.results {
            debug!(
                %track,
                placement = result.composite.placement_score,
                rank = result.estimated_rank,
                "track scored"
            );
        }

        Ok(estimate)
    }
}

/// Error raised by the score service.
#[derive(Debug, thiserror::Error)]
pub enum ScoreServiceError {
    #[error(transparent)]
    Sheet(#[from] SheetViolation),
    #[error(transparent)]
    Estimate(#[from] EstimateError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ScoreServiceError {
    /// True when the caller can fix the request and retry.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Sheet(_) | Self::Estimate(_))
    }
}
