use super::domain::{NetRecord, RecordId};
use crate::persistence::{RepositoryError, UserId};

/// Storage for practice-exam net records, scoped per user.
pub trait NetRecordRepository: Send + Sync {
    fn insert(&self, record: NetRecord) -> Result<(), RepositoryError>;
    /// Every stored record for the user, expired ones included.
    fn for_user(&self, user_id: &UserId) -> Result<Vec<NetRecord>, RepositoryError>;
    /// Returns [`RepositoryError::NotFound`] when the user has no such record.
    fn remove(&self, user_id: &UserId, record_id: &RecordId) -> Result<NetRecord, RepositoryError>;
}
