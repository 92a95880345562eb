use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{expiry_for, NetRecord, NetRecordSubmission, RecordId, RecordSubject};
use super::progress::{summarize, SubjectProgress};
use super::repository::NetRecordRepository;
use crate::persistence::{RepositoryError, UserId};

/// Validation errors for practice-exam records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordViolation {
    #[error("exam name must not be blank")]
    BlankExamName,
    #[error("{subject} has {answered} answers but only {limit} questions")]
    TooManyAnswers {
        subject: RecordSubject,
        answered: u32,
        limit: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum NetTrackingError {
    #[error(transparent)]
    Record(#[from] RecordViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl NetTrackingError {
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Record(_))
    }
}

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_record_id() -> RecordId {
    let id = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RecordId(format!("net-{id:06}"))
}

/// Service storing practice-exam nets and deriving progress charts from them.
pub struct NetTrackingService<R> {
    repository: Arc<R>,
}

impl<R> NetTrackingService<R>
where
    R: NetRecordRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn record(
        &self,
        user_id: &UserId,
        submission: NetRecordSubmission,
    ) -> Result<NetRecord, NetTrackingError> {
        self.record_at(user_id, submission, Utc::now())
    }

    pub fn record_at(
        &self,
        user_id: &UserId,
        submission: NetRecordSubmission,
        now: DateTime<Utc>,
    ) -> Result<NetRecord, NetTrackingError> {
        let record = build_record(user_id, submission, now)?;
        self.repository.insert(record.clone())?;
        info!(user = %user_id, record = %record.id, subject = %record.subject, "net record stored");
        Ok(record)
    }

    /// Store a batch, rejecting all of it when any submission is invalid.
    ///
    /// A storage failure part way through removes the records already inserted.
    pub fn record_many(
        &self,
        user_id: &UserId,
        submissions: Vec<NetRecordSubmission>,
        now: DateTime<Utc>,
    ) -> Result<Vec<NetRecord>, NetTrackingError> {
        let records = submissions
            .into_iter()
            .map(|submission| build_record(user_id, submission, now))
            .collect::<Result<Vec<_>, _>>()?;

        for (index, record) in records.iter().enumerate() {
            if let Err(error) = self.repository.insert(record.clone()) {
                self.roll_back(user_id, &records[..index]);
                return Err(error.into());
            }
        }
        info!(user = %user_id, count = records.len(), "net records imported");
        Ok(records)
    }

    fn roll_back(&self, user_id: &UserId, stored: &[NetRecord]) {
        for record in stored {
            if let Err(error) = self.repository.remove(user_id, &record.id) {
                warn!(user = %user_id, record = %record.id, %error, "net record rollback failed");
            }
        }
    }

    pub fn list(&self, user_id: &UserId) -> Result<Vec<NetRecord>, NetTrackingError> {
        self.list_at(user_id, Utc::now())
    }

    /// Unexpired records, newest exam first.
    pub fn list_at(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<NetRecord>, NetTrackingError> {
        let mut records: Vec<NetRecord> = self
            .repository
            .for_user(user_id)?
            .into_iter()
            .filter(|record| !record.is_expired(now))
            .collect();
        records.sort_by(|a, b| {
            b.taken_on
                .cmp(&a.taken_on)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(records)
    }

    pub fn delete(&self, user_id: &UserId, record_id: &RecordId) -> Result<(), NetTrackingError> {
        let removed = self.repository.remove(user_id, record_id)?;
        info!(user = %user_id, record = %removed.id, "net record deleted");
        Ok(())
    }

    pub fn progress(&self, user_id: &UserId) -> Result<Vec<SubjectProgress>, NetTrackingError> {
        self.progress_at(user_id, Utc::now())
    }

    pub fn progress_at(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<SubjectProgress>, NetTrackingError> {
        let records = self.list_at(user_id, now)?;
        Ok(summarize(&records))
    }
}

fn build_record(
    user_id: &UserId,
    submission: NetRecordSubmission,
    now: DateTime<Utc>,
) -> Result<NetRecord, RecordViolation> {
    let exam_name = submission.exam_name.trim();
    if exam_name.is_empty() {
        return Err(RecordViolation::BlankExamName);
    }

    let limit = submission.subject.question_count();
    let answered = submission.answers.answered_total();
    if answered > limit {
        return Err(RecordViolation::TooManyAnswers {
            subject: submission.subject,
            answered,
            limit,
        });
    }

    Ok(NetRecord {
        id: next_record_id(),
        user_id: user_id.clone(),
        subject: submission.subject,
        exam_name: exam_name.to_string(),
        taken_on: submission.taken_on,
        answers: submission.answers,
        created_at: now,
        expires_at: expiry_for(now),
    })
}
