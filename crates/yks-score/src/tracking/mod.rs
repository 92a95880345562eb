//! Study tracking: practice-exam nets with CSV import, topic completion, and the questions
//! solved each study day.

pub mod catalog;
pub mod domain;
pub mod import;
pub mod progress;
pub mod repository;
pub mod router;
pub mod service;
pub mod solved;
pub mod topics;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, CatalogSubject, TopicCatalog, UnknownTopic};
pub use domain::{
    ExamStage, NetRecord, NetRecordSubmission, RecordId, RecordSubject, UnknownRecordSubject,
    RECORD_RETENTION_MONTHS,
};
pub use import::{parse_exam_date, NetImportError, NetRecordImporter};
pub use progress::{summarize, NetPoint, SubjectProgress};
pub use repository::NetRecordRepository;
pub use router::net_router;
pub use service::{NetTrackingError, NetTrackingService, RecordViolation};
pub use solved::{
    solved_router, DailySummary, SolvedEntry, SolvedEntryId, SolvedEntryRepository, SolvedOutcome,
    SolvedProblemService, SolvedSubmission, SolvedTrackingError, StudyDay,
};
pub use topics::{
    topic_router, SubjectCompletion, TopicBoard, TopicBoardRepository, TopicProgressService,
    TopicState, TopicStateUpdate, TopicTrackingError,
};
