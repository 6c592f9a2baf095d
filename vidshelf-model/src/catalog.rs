use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engagement::EngagementCounter;
use crate::ids::EntryId;

/// One video known to the catalog.
///
/// `locator` is the file name inside the upload directory and is unique
/// across all entries; it is the key reconciliation diffs against.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogEntry {
    pub id: EntryId,
    pub title: String,
    pub locator: String,
    pub created_at: DateTime<Utc>,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
}

impl CatalogEntry {
    /// Current value of a single engagement counter.
    pub fn count(&self, counter: EngagementCounter) -> i64 {
        match counter {
            EngagementCounter::Views => self.views,
            EngagementCounter::Likes => self.likes,
            EngagementCounter::Dislikes => self.dislikes,
        }
    }
}
