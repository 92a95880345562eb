//! Net, composite score, and rank estimation for YKS answer sheets.
//!
//! The engine is pure: answer counts become nets, nets become a composite score per track,
//! and composite scores become an estimated rank. The guard, repository, service, and router
//! wrap the engine for form validation, sheet storage, and HTTP access.

pub mod domain;
pub(crate) mod engine;
pub mod guard;
pub mod profile;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswerCount, CompositeScore, ExamSubject, FirstStageAnswers, FirstStageSubject,
    InvalidAnswerCount, NetBreakdown, ScoreBasis, SecondStageAnswers, SecondStageSubject, Track,
    TrackSelection, UnknownSubject, UnknownTrack,
};
pub use engine::composer::{compose_score, diploma_contribution, first_stage_score};
pub use engine::net::compute_net;
pub use engine::rank::{
    estimate_rank, rank_for, RankAnchor, RankTable, RankTableError, OPTIMISTIC_RANK_FLOOR,
};
pub use engine::{Estimate, EstimateError, EstimateWarning, ScoreEstimator, TrackEstimate};
pub use guard::{DiplomaPolicy, ScoreSheet, ScoreSheetSubmission, SheetGuard, SheetViolation};
pub use profile::{FirstStageProfile, ProfileError, ScoringProfile, TrackProfile, TrackProfiles};
pub use repository::{SavedSheet, ScoreSheetRepository};
pub use router::score_router;
pub use service::{EstimateRequest, ScoreService, ScoreServiceError};
