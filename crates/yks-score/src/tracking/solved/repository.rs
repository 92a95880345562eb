use super::domain::{SolvedEntry, SolvedEntryId};
use crate::persistence::{RepositoryError, UserId};

/// Storage for solved-question entries, scoped per user.
pub trait SolvedEntryRepository: Send + Sync {
    /// Inserts the entry, or replaces the stored entry with the same id.
    fn save(&self, entry: SolvedEntry) -> Result<(), RepositoryError>;
    fn for_user(&self, user_id: &UserId) -> Result<Vec<SolvedEntry>, RepositoryError>;
    fn remove(
        &self,
        user_id: &UserId,
        entry_id: &SolvedEntryId,
    ) -> Result<SolvedEntry, RepositoryError>;
}
