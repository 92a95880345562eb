pub(crate) mod composer;
pub(crate) mod net;
pub(crate) mod rank;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{
    CompositeScore, FirstStageAnswers, NetBreakdown, SecondStageAnswers, Track, TrackSelection,
};
use super::profile::ScoringProfile;
use composer::compose_score;
use rank::rank_for;

/// Stateless estimator that runs the net, composite, and rank stages for each requested track.
#[derive(Debug, Clone)]
pub struct ScoreEstimator {
    profile: Arc<ScoringProfile>,
}

impl ScoreEstimator {
    pub fn new(profile: Arc<ScoringProfile>) -> Self {
        Self { profile }
    }

    pub fn standard() -> Self {
        Self::new(Arc::new(ScoringProfile::standard().clone()))
    }

    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    pub fn estimate(
        &self,
        selection: TrackSelection,
        first_stage: &FirstStageAnswers,
        second_stage: &SecondStageAnswers,
        diploma: Option<f64>,
    ) -> Result<Estimate, EstimateError> {
        let mut results = BTreeMap::new();
        for track in selection.tracks() {
            let composite = compose_score(&self.profile, track, first_stage, second_stage, diploma)?;
            let estimated_rank = rank_for(&self.profile, &composite);
            results.insert(
                track,
                TrackEstimate {
                    composite,
                    estimated_rank,
                },
            );
        }

        let warnings = if second_stage.is_empty() {
            vec![EstimateWarning::MissingSecondStageData]
        } else {
            Vec::new()
        };

        Ok(Estimate {
            selection,
            results,
            nets: NetBreakdown::from_answers(first_stage, second_stage),
            warnings,
        })
    }
}

/// Composite score and rank for one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEstimate {
    pub composite: CompositeScore,
    pub estimated_rank: u32,
}

/// Output of one estimate request, keyed by track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub selection: TrackSelection,
    pub results: BTreeMap<Track, TrackEstimate>,
    pub nets: NetBreakdown,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<EstimateWarning>,
}

impl Estimate {
    pub fn get(&self, track: Track) -> Option<&TrackEstimate> {
        self.results.get(&track)
    }
}

/// The one hard failure of the estimator; callers should ask the user for first-stage answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EstimateError {
    #[error("first-stage (TYT) answers are required to estimate a score")]
    MissingFirstStageData,
}

/// Soft conditions reported next to a successful estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateWarning {
    MissingSecondStageData,
}

impl EstimateWarning {
    pub fn summary(&self) -> &'static str {
        match self {
            EstimateWarning::MissingSecondStageData => {
                "no second-stage (AYT) answers; scores use the first-stage-only formula"
            }
        }
    }
}
