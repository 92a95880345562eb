//! Per-topic study states and subject completion percentages.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    completion, ReviewToggle, SubjectCompletion, TopicBoard, TopicState, TopicStateUpdate,
};
pub use repository::TopicBoardRepository;
pub use router::topic_router;
pub use service::{TopicProgressService, TopicTrackingError};
