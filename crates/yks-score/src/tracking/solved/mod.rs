//! Questions solved per topic during the current study day.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    DailySummary, SolvedCounts, SolvedEntry, SolvedEntryId, SolvedSubmission, StudyDay,
    SubjectSolved, TopicSolved, STUDY_DAY_START_HOUR, TURKEY_UTC_OFFSET_SECONDS,
};
pub use repository::SolvedEntryRepository;
pub use router::solved_router;
pub use service::{SolvedOutcome, SolvedProblemService, SolvedTrackingError};
