use std::collections::HashSet;

use async_trait::async_trait;
use vidshelf_model::{CatalogEntry, EngagementCounter, EntryId};

use crate::error::Result;

/// Values for a catalog row that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogEntry {
    pub title: String,
    pub locator: String,
}

/// Identity store for catalog entries.
///
/// Implementations must enforce locator uniqueness themselves: a second
/// `insert_entry` with an existing locator fails with
/// [`CatalogError::Conflict`](crate::CatalogError::Conflict) and leaves the
/// stored row untouched.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All entries ordered by id ascending.
    async fn list_entries(&self) -> Result<Vec<CatalogEntry>>;

    /// Locators of every stored entry.
    async fn list_locators(&self) -> Result<HashSet<String>>;

    async fn get_entry(&self, id: EntryId) -> Result<CatalogEntry>;

    async fn find_by_locator(&self, locator: &str) -> Result<Option<CatalogEntry>>;

    async fn insert_entry(&self, entry: &NewCatalogEntry) -> Result<CatalogEntry>;

    /// Atomically add one to `counter` and return the new value.
    ///
    /// Concurrent calls on the same entry must never lose an update.
    async fn increment_counter(&self, id: EntryId, counter: EngagementCounter) -> Result<i64>;
}
