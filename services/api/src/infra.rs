use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use yks_score::persistence::{RepositoryError, UserId};
use yks_score::scoring::{
    AnswerCount, FirstStageSubject, SavedSheet, ScoreSheetRepository, SecondStageSubject,
};
use yks_score::tracking::{
    NetRecord, NetRecordRepository, RecordId, SolvedEntry, SolvedEntryId, SolvedEntryRepository,
    TopicBoard, TopicBoardRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreSheetRepository {
    sheets: Arc<Mutex<HashMap<UserId, SavedSheet>>>,
}

impl ScoreSheetRepository for InMemoryScoreSheetRepository {
    fn save(&self, sheet: SavedSheet) -> Result<(), RepositoryError> {
        let mut guard = self.sheets.lock().expect("repository mutex poisoned");
        guard.insert(sheet.user_id.clone(), sheet);
        Ok(())
    }

    fn latest(&self, user_id: &UserId) -> Result<Option<SavedSheet>, RepositoryError> {
        let guard = self.sheets.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNetRecordRepository {
    records: Arc<Mutex<HashMap<UserId, Vec<NetRecord>>>>,
}

impl NetRecordRepository for InMemoryNetRecordRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryTopicBoardRepository {
    boards: Arc<Mutex<HashMap<UserId, TopicBoard>>>,
}

impl TopicBoardRepository for InMemoryTopicBoardRepository {
    fn load(&self, user_id: &UserId) -> Result<Option<TopicBoard>, RepositoryError> {
        let guard = self.boards.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }

    fn store(&self, board: TopicBoard) -> Result<(), RepositoryError> {
        let mut guard = self.boards.lock().expect("repository mutex poisoned");
        guard.insert(board.user_id.clone(), board);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySolvedEntryRepository {
    entries: Arc<Mutex<HashMap<UserId, Vec<SolvedEntry>>>>,
}

impl SolvedEntryRepository for InMemorySolvedEntryRepository {
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

pub(crate) fn parse_first_stage_answer(raw: &str) -> Result<(FirstStageSubject, AnswerCount), String> {
    parse_subject_answer(raw)
}

pub(crate) fn parse_second_stage_answer(
    raw: &str,
) -> Result<(SecondStageSubject, AnswerCount), String> {
    parse_subject_answer(raw)
}

/// Parses `subject=correct/incorrect[/unanswered]` command-line values.
fn parse_subject_answer<S>(raw: &str) -> Result<(S, AnswerCount), String>
where
    S: FromStr,
    S::Err: Display,
{
    let (subject, counts) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected subject=correct/incorrect, got '{raw}'"))?;
    let subject = subject.trim().parse::<S>().map_err(|err| err.to_string())?;
    let answers = counts.parse::<AnswerCount>().map_err(|err| err.to_string())?;
    Ok((subject, answers))
}
