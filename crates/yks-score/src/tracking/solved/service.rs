use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{
    DailySummary, SolvedCounts, SolvedEntry, SolvedEntryId, SolvedSubmission, StudyDay,
    SubjectSolved, TopicSolved,
};
use super::repository::SolvedEntryRepository;
use crate::persistence::{RepositoryError, UserId};
use crate::tracking::catalog::{TopicCatalog, UnknownTopic};

#[derive(Debug, thiserror::Error)]
pub enum SolvedTrackingError {
    #[error(transparent)]
    Topic(#[from] UnknownTopic),
    #[error("enter at least one solved question")]
    NothingSolved,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SolvedTrackingError {
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Topic(_) | Self::NothingSolved)
    }
}

/// Result of saving a topic's counts for the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "entry", rename_all = "snake_case")]
pub enum SolvedOutcome {
    Saved(SolvedEntry),
    /// All-zero counts cleared the topic's entry for the day.
    Removed(SolvedEntry),
}

static ENTRY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_entry_id() -> SolvedEntryId {
    let id = ENTRY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SolvedEntryId(format!("solved-{id:06}"))
}

/// Service keeping one entry per topic per study day and summing the day's work.
pub struct SolvedProblemService<R> {
    catalog: Arc<TopicCatalog>,
    repository: Arc<R>,
    day: StudyDay,
}

impl<R> SolvedProblemService<R>
where
    R: SolvedEntryRepository + 'static,
{
    pub fn new(repository: Arc<R>, catalog: Arc<TopicCatalog>) -> Self {
        Self {
            catalog,
            repository,
            day: StudyDay::default(),
        }
    }

    pub fn with_study_day(mut self, day: StudyDay) -> Self {
        self.day = day;
        self
    }

    pub fn save(
        &self,
        user_id: &UserId,
        submission: SolvedSubmission,
    ) -> Result<SolvedOutcome, SolvedTrackingError> {
        self.save_at(user_id, submission, Utc::now())
    }

    /// Record today's counts for a topic, replacing any earlier entry from the same study day.
    pub fn save_at(
        &self,
        user_id: &UserId,
        submission: SolvedSubmission,
        now: DateTime<Utc>,
    ) -> Result<SolvedOutcome, SolvedTrackingError> {
        let subject = self.catalog.resolve(&submission.subject, &submission.topic)?;
        let topic = submission.topic.trim();
        let existing = self
            .todays_entries(user_id, now)?
            .into_iter()
            .filter(|entry| entry.subject == subject.key && entry.topic == topic)
            .max_by_key(|entry| entry.solved_at);

        if submission.answers.answered_total() == 0 {
            let entry = existing.ok_or(SolvedTrackingError::NothingSolved)?;
            let removed = self.repository.remove(user_id, &entry.id)?;
            info!(user = %user_id, entry = %removed.id, "solved entry cleared");
            return Ok(SolvedOutcome::Removed(removed));
        }

        let entry = SolvedEntry {
            id: existing.map(|entry| entry.id).unwrap_or_else(next_entry_id),
            user_id: user_id.clone(),
            subject: subject.key.clone(),
            topic: topic.to_string(),
            answers: submission.answers,
            solved_at: now,
        };
        self.repository.save(entry.clone())?;
        info!(
            user = %user_id,
            entry = %entry.id,
            subject = %entry.subject,
            total = entry.answers.answered_total(),
            "solved entry saved"
        );
        Ok(SolvedOutcome::Saved(entry))
    }

    pub fn delete(
        &self,
        user_id: &UserId,
        entry_id: &SolvedEntryId,
    ) -> Result<(), SolvedTrackingError> {
        let removed = self.repository.remove(user_id, entry_id)?;
        info!(user = %user_id, entry = %removed.id, "solved entry deleted");
        Ok(())
    }

    pub fn today(&self, user_id: &UserId) -> Result<DailySummary, SolvedTrackingError> {
        self.today_at(user_id, Utc::now())
    }

    /// Per-subject and per-topic counts for the study day containing `now`.
    ///
    /// Subjects and topics follow catalog order; entries for topics the catalog no longer
    /// lists are left out.
    pub fn today_at(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<DailySummary, SolvedTrackingError> {
        let entries = self.todays_entries(user_id, now)?;

        let subjects = self
            .catalog
            .subjects()
            .iter()
            .filter_map(|subject| {
                let topics: Vec<TopicSolved> = subject
                    .topics
                    .iter()
                    .filter_map(|topic| {
                        entries
                            .iter()
                            .filter(|entry| {
                                entry.subject == subject.key && &entry.topic == topic
                            })
                            .max_by_key(|entry| entry.solved_at)
                            .map(|entry| TopicSolved {
                                topic: topic.clone(),
                                entry_id: entry.id.clone(),
                                solved_at: entry.solved_at,
                                counts: SolvedCounts::from_answers(&entry.answers),
                            })
                    })
                    .collect();
                if topics.is_empty() {
                    None
                } else {
                    Some(SubjectSolved::new(
                        subject.key.clone(),
                        subject.label.clone(),
                        topics,
                    ))
                }
            })
            .collect();

        Ok(DailySummary::new(self.day.start_of(now), subjects))
    }

    fn todays_entries(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<SolvedEntry>, SolvedTrackingError> {
        let day_start = self.day.start_of(now);
        Ok(self
            .repository
            .for_user(user_id)?
            .into_iter()
            .filter(|entry| self.day.start_of(entry.solved_at) == day_start)
            .collect())
    }
}
