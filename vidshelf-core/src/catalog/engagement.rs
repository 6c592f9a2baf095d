use std::sync::Arc;

use tracing::debug;
use vidshelf_model::{EngagementCounter, EntryId};

use crate::database::ports::catalog::CatalogRepository;
use crate::error::{CatalogError, Result};

/// Per-entry view/like/dislike counters.
///
/// Every increment is delegated to a single atomic store operation; the
/// ledger never reads a counter and writes it back.
#[derive(Clone)]
pub struct EngagementLedger {
    catalog: Arc<dyn CatalogRepository>,
}

impl std::fmt::Debug for EngagementLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngagementLedger").finish_non_exhaustive()
    }
}

impl EngagementLedger {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Add one to `counter` on `entry_id` and return the updated count.
    pub async fn increment(&self, entry_id: EntryId, counter: EngagementCounter) -> Result<i64> {
        if !entry_id.is_assigned() {
            return Err(CatalogError::NotFound(format!("catalog entry {entry_id}")));
        }

        let count = self.catalog.increment_counter(entry_id, counter).await?;
        debug!("entry {entry_id} {counter} -> {count}");
        Ok(count)
    }
}
