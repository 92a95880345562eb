use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{completion, ReviewToggle, SubjectCompletion, TopicBoard, TopicStateUpdate};
use super::repository::TopicBoardRepository;
use crate::persistence::{RepositoryError, UserId};
use crate::tracking::catalog::{TopicCatalog, UnknownTopic};

#[derive(Debug, thiserror::Error)]
pub enum TopicTrackingError {
    #[error(transparent)]
    Topic(#[from] UnknownTopic),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TopicTrackingError {
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Topic(_))
    }
}

/// Service keeping each student's topic board and per-subject completion.
pub struct TopicProgressService<R> {
    catalog: Arc<TopicCatalog>,
    repository: Arc<R>,
}

impl<R> TopicProgressService<R>
where
    R: TopicBoardRepository + 'static,
{
    pub fn new(repository: Arc<R>, catalog: Arc<TopicCatalog>) -> Self {
        Self {
            catalog,
            repository,
        }
    }

    pub fn catalog(&self) -> &TopicCatalog {
        &self.catalog
    }

    /// The stored board, or an empty one for a user who never saved.
    pub fn board(&self, user_id: &UserId) -> Result<TopicBoard, TopicTrackingError> {
        Ok(self
            .repository
            .load(user_id)?
            .unwrap_or_else(|| TopicBoard::empty(user_id.clone())))
    }

    pub fn update(
        &self,
        user_id: &UserId,
        updates: Vec<TopicStateUpdate>,
    ) -> Result<TopicBoard, TopicTrackingError> {
        self.update_at(user_id, updates, Utc::now())
    }

    /// Apply a batch of state changes; nothing is stored if any topic is unknown.
    pub fn update_at(
        &self,
        user_id: &UserId,
        updates: Vec<TopicStateUpdate>,
        now: DateTime<Utc>,
    ) -> Result<TopicBoard, TopicTrackingError> {
        let mut board = self.board(user_id)?;
        for update in &updates {
            let subject = self.catalog.resolve(&update.subject, &update.topic)?;
            board.set(&subject.key, update.topic.trim(), update.state);
        }
        board.updated_at = Some(now);

        self.repository.store(board.clone())?;
        info!(user = %user_id, changes = updates.len(), "topic board saved");
        Ok(board)
    }

    pub fn toggle_review(
        &self,
        user_id: &UserId,
        toggle: ReviewToggle,
    ) -> Result<TopicBoard, TopicTrackingError> {
        self.toggle_review_at(user_id, toggle, Utc::now())
    }

    pub fn toggle_review_at(
        &self,
        user_id: &UserId,
        toggle: ReviewToggle,
        now: DateTime<Utc>,
    ) -> Result<TopicBoard, TopicTrackingError> {
        let subject = self.catalog.resolve(&toggle.subject, &toggle.topic)?;
        let topic = toggle.topic.trim();

        let mut board = self.board(user_id)?;
        let state = board.state(&subject.key, topic).with_review(toggle.review);
        board.set(&subject.key, topic, state);
        board.updated_at = Some(now);

        self.repository.store(board.clone())?;
        info!(user = %user_id, subject = %subject.key, topic, ?state, "topic review flag changed");
        Ok(board)
    }

    pub fn progress(&self, user_id: &UserId) -> Result<Vec<SubjectCompletion>, TopicTrackingError> {
        let board = self.board(user_id)?;
        Ok(completion(&self.catalog, &board))
    }
}
