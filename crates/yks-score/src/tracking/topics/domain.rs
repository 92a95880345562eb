use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::UserId;
use crate::tracking::catalog::TopicCatalog;

/// Where a student stands on one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicState {
    #[default]
    NotStarted,
    Completed,
    NeedsReview,
    CompletedNeedsReview,
}

impl TopicState {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed | Self::CompletedNeedsReview)
    }

    pub fn needs_review(self) -> bool {
        matches!(self, Self::NeedsReview | Self::CompletedNeedsReview)
    }

    fn from_flags(completed: bool, review: bool) -> Self {
        match (completed, review) {
            (false, false) => Self::NotStarted,
            (true, false) => Self::Completed,
            (false, true) => Self::NeedsReview,
            (true, true) => Self::CompletedNeedsReview,
        }
    }

    /// Sets or clears the review flag; completion is kept.
    pub fn with_review(self, review: bool) -> Self {
        Self::from_flags(self.is_completed(), review)
    }

    /// Sets or clears completion; the review flag is kept.
    pub fn with_completion(self, completed: bool) -> Self {
        Self::from_flags(completed, self.needs_review())
    }
}

/// Every topic state a student has recorded, keyed by subject then topic.
///
/// Topics left at [`TopicState::NotStarted`] are not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicBoard {
    pub user_id: UserId,
    pub states: BTreeMap<String, BTreeMap<String, TopicState>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TopicBoard {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            states: BTreeMap::new(),
            updated_at: None,
        }
    }

    pub fn state(&self, subject: &str, topic: &str) -> TopicState {
        self.states
            .get(subject)
            .and_then(|topics| topics.get(topic))
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn set(&mut self, subject: &str, topic: &str, state: TopicState) {
        if state == TopicState::NotStarted {
            if let Some(topics) = self.states.get_mut(subject) {
                topics.remove(topic);
                if topics.is_empty() {
                    self.states.remove(subject);
                }
            }
            return;
        }
        self.states
            .entry(subject.to_string())
            .or_default()
            .insert(topic.to_string(), state);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStateUpdate {
    pub subject: String,
    pub topic: String,
    pub state: TopicState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewToggle {
    pub subject: String,
    pub topic: String,
    pub review: bool,
}

/// Completion figures for one catalog subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectCompletion {
    pub subject: String,
    pub label: String,
    pub completed: u32,
    pub needs_review: u32,
    pub total: u32,
    /// `completed / total * 100`, or 0 for a subject without topics.
    pub percentage: f64,
}

/// Completion per catalog subject, in catalog order.
///
/// States for topics the catalog no longer lists are ignored.
pub fn completion(catalog: &TopicCatalog, board: &TopicBoard) -> Vec<SubjectCompletion> {
    catalog
        .subjects()
        .iter()
        .map(|subject| {
            let states = subject
                .topics
                .iter()
                .map(|topic| board.state(&subject.key, topic));
            let (completed, needs_review) =
                states.fold((0u32, 0u32), |(completed, review), state| {
                    (
                        completed + u32::from(state.is_completed()),
                        review + u32::from(state.needs_review()),
                    )
                });
            let total = subject.topics.len() as u32;
            let percentage = if total > 0 {
                f64::from(completed) / f64::from(total) * 100.0
            } else {
                0.0
            };

            SubjectCompletion {
                subject: subject.key.clone(),
                label: subject.label.clone(),
                completed,
                needs_review,
                total,
                percentage,
            }
        })
        .collect()
}
