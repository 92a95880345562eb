use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::persistence::{RepositoryError, UserId};
use crate::scoring::{AnswerCount, FirstStageSubject, SecondStageSubject};
use crate::tracking::catalog::TopicCatalog;
use crate::tracking::domain::{NetRecord, NetRecordSubmission, RecordId, RecordSubject};
use crate::tracking::repository::NetRecordRepository;
use crate::tracking::service::NetTrackingService;
use crate::tracking::solved::{
    SolvedEntry, SolvedEntryId, SolvedEntryRepository, SolvedProblemService, SolvedSubmission,
};
use crate::tracking::topics::{TopicBoard, TopicBoardRepository, TopicProgressService};

pub(super) fn user() -> UserId {
    UserId("student-1".to_string())
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn turkish() -> RecordSubject {
    RecordSubject::FirstStage(FirstStageSubject::Turkish)
}

pub(super) fn mathematics() -> RecordSubject {
    RecordSubject::SecondStage(SecondStageSubject::Mathematics)
}

pub(super) fn submission(
    subject: RecordSubject,
    exam_name: &str,
    taken_on: NaiveDate,
    correct: u32,
    incorrect: u32,
) -> NetRecordSubmission {
    NetRecordSubmission {
        subject,
        exam_name: exam_name.to_string(),
        taken_on,
        answers: AnswerCount::new(correct, incorrect),
    }
}

pub(super) fn build_service() -> (NetTrackingService<MemoryRecords>, Arc<MemoryRecords>) {
    let repository = Arc::new(MemoryRecords::default());
    (NetTrackingService::new(repository.clone()), repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRecords {
    pub(super) records: Arc<Mutex<HashMap<UserId, Vec<NetRecord>>>>,
}

impl MemoryRecords {
    pub(super) fn stored_count(&self) -> usize {
        let guard = self.records.lock().expect("repository mutex poisoned");
        guard.values().map(Vec::len).sum()
    }
}

impl NetRecordRepository for MemoryRecords {
    fn insert(&self, record: NetRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let entries = guard.entry(record.user_id.clone()).or_default();
        if entries.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        entries.push(record);
        Ok(())
    }

    fn for_user(&self, user_id: &UserId) -> Result<Vec<NetRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }

    fn remove(&self, user_id: &UserId, record_id: &RecordId) -> Result<NetRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let entries = guard.get_mut(user_id).ok_or(RepositoryError::NotFound)?;
        let index = entries
            .iter()
            .position(|record| &record.id == record_id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(entries.remove(index))
    }
}

/// Accepts a fixed number of inserts, then reports the store as offline.
pub(super) struct FailingInserts {
    pub(super) inner: MemoryRecords,
    pub(super) remaining: AtomicUsize,
}

impl FailingInserts {
    pub(super) fn after(accepted: usize) -> Self {
        Self {
            inner: MemoryRecords::default(),
            remaining: AtomicUsize::new(accepted),
        }
    }
}

impl NetRecordRepository for FailingInserts {
    fn insert(&self, record: NetRecord) -> Result<(), RepositoryError> {
        let accepted = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        match accepted {
            Ok(_) => self.inner.insert(record),
            Err(_) => Err(RepositoryError::Unavailable("disk full".to_string())),
        }
    }

    fn for_user(&self, user_id: &UserId) -> Result<Vec<NetRecord>, RepositoryError> {
        self.inner.for_user(user_id)
    }

    fn remove(&self, user_id: &UserId, record_id: &RecordId) -> Result<NetRecord, RepositoryError> {
        self.inner.remove(user_id, record_id)
    }
}

pub(super) struct UnavailableRecords;

impl NetRecordRepository for UnavailableRecords {
    fn insert(&self, _record: NetRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_user(&self, _user_id: &UserId) -> Result<Vec<NetRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _user_id: &UserId, _record_id: &RecordId) -> Result<NetRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryBoards {
    pub(super) boards: Arc<Mutex<HashMap<UserId, TopicBoard>>>,
}

impl TopicBoardRepository for MemoryBoards {
    fn load(&self, user_id: &UserId) -> Result<Option<TopicBoard>, RepositoryError> {
        let guard = self.boards.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }

    fn store(&self, board: TopicBoard) -> Result<(), RepositoryError> {
        self.boards
            .lock()
            .expect("repository mutex poisoned")
            .insert(board.user_id.clone(), board);
        Ok(())
    }
}

pub(super) struct UnavailableBoards;

impl TopicBoardRepository for UnavailableBoards {
    fn load(&self, _user_id: &UserId) -> Result<Option<TopicBoard>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn store(&self, _board: TopicBoard) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_topic_service() -> (TopicProgressService<MemoryBoards>, Arc<MemoryBoards>) {
    let repository = Arc::new(MemoryBoards::default());
    let service =
        TopicProgressService::new(repository.clone(), Arc::new(TopicCatalog::standard().clone()));
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemorySolved {
    pub(super) entries: Arc<Mutex<HashMap<UserId, Vec<SolvedEntry>>>>,
}

impl MemorySolved {
    pub(super) fn stored_count(&self) -> usize {
        let guard = self.entries.lock().expect("repository mutex poisoned");
        guard.values().map(Vec::len).sum()
    }
}

impl SolvedEntryRepository for MemorySolved {
    fn save(&self, entry: SolvedEntry) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("repository mutex poisoned");
        let entries = guard.entry(entry.user_id.clone()).or_default();
        match entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        Ok(())
    }

    fn for_user(&self, user_id: &UserId) -> Result<Vec<SolvedEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }

    fn remove(
        &self,
        user_id: &UserId,
        entry_id: &SolvedEntryId,
    ) -> Result<SolvedEntry, RepositoryError> {
        let mut guard = self.entries.lock().expect("repository mutex poisoned");
        let entries = guard.get_mut(user_id).ok_or(RepositoryError::NotFound)?;
        let index = entries
            .iter()
            .position(|entry| &entry.id == entry_id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(entries.remove(index))
    }
}

pub(super) fn build_solved_service() -> (SolvedProblemService<MemorySolved>, Arc<MemorySolved>) {
    let repository = Arc::new(MemorySolved::default());
    let service =
        SolvedProblemService::new(repository.clone(), Arc::new(TopicCatalog::standard().clone()));
    (service, repository)
}

pub(super) fn solved(subject: &str, topic: &str, correct: u32, incorrect: u32) -> SolvedSubmission {
    SolvedSubmission {
        subject: subject.to_string(),
        topic: topic.to_string(),
        answers: AnswerCount::new(correct, incorrect),
    }
}

pub(super) fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}
