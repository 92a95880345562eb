use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::TrackSelection;
use super::guard::ScoreSheet;
use crate::persistence::{RepositoryError, UserId};

/// Last sheet a student scored, kept so forms can be pre-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSheet {
    pub user_id: UserId,
    pub selection: TrackSelection,
    pub sheet: ScoreSheet,
    pub saved_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ScoreSheetRepository: Send + Sync {
    /// Replaces any sheet previously saved for the same user.
    fn save(&self, sheet: SavedSheet) -> Result<(), RepositoryError>;
    fn latest(&self, user_id: &UserId) -> Result<Option<SavedSheet>, RepositoryError>;
}
