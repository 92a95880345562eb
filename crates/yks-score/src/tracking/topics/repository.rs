use super::domain::TopicBoard;
use crate::persistence::{RepositoryError, UserId};

/// Storage for topic boards, one per user.
pub trait TopicBoardRepository: Send + Sync {
    fn load(&self, user_id: &UserId) -> Result<Option<TopicBoard>, RepositoryError>;
    /// Replaces the user's board.
    fn store(&self, board: TopicBoard) -> Result<(), RepositoryError>;
}
