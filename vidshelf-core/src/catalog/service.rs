use std::sync::Arc;

use tracing::{debug, info};
use vidshelf_model::{CatalogEntry, Comment, EngagementCounter, EntryId, UserId};

use crate::application::AppUnitOfWork;
use crate::catalog::{CommentThreads, EngagementLedger, ReconcileReport, Reconciler};
use crate::database::ports::{catalog::NewCatalogEntry, users::UsersRepository};
use crate::error::{CatalogError, Result};
use crate::scan::FileStore;

/// Facade the HTTP layer talks to. Every call goes straight to the store;
/// nothing is cached between requests.
#[derive(Clone)]
pub struct CatalogService {
    unit_of_work: AppUnitOfWork,
    reconciler: Reconciler,
    ledger: EngagementLedger,
    threads: CommentThreads,
    files: Arc<dyn FileStore>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("unit_of_work", &self.unit_of_work)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(unit_of_work: AppUnitOfWork, files: Arc<dyn FileStore>) -> Self {
        Self {
            reconciler: Reconciler::new(unit_of_work.catalog.clone(), files.clone()),
            ledger: EngagementLedger::new(unit_of_work.catalog.clone()),
            threads: CommentThreads::new(unit_of_work.comments.clone()),
            unit_of_work,
            files,
        }
    }

    pub fn users(&self) -> &Arc<dyn UsersRepository> {
        &self.unit_of_work.users
    }

    /// Reconcile with the upload directory, then return the full catalog.
    pub async fn reconcile(&self) -> Result<Vec<CatalogEntry>> {
        self.reconciler.reconcile().await
    }

    pub async fn reconcile_with_report(&self) -> Result<(Vec<CatalogEntry>, ReconcileReport)> {
        self.reconciler.reconcile_with_report().await
    }

    /// The catalog as stored, without scanning.
    pub async fn list_entries(&self) -> Result<Vec<CatalogEntry>> {
        self.unit_of_work.catalog.list_entries().await
    }

    pub async fn get_entry(&self, id: EntryId) -> Result<CatalogEntry> {
        if !id.is_assigned() {
            return Err(CatalogError::NotFound(format!("catalog entry {id}")));
        }
        self.unit_of_work.catalog.get_entry(id).await
    }

    /// Register a file the upload path has just written to the store.
    ///
    /// A blank title falls back to the one reconciliation would derive. If a
    /// reconciliation pass already catalogued the locator, that entry is
    /// returned as is.
    pub async fn register_upload(&self, title: &str, locator: &str) -> Result<CatalogEntry> {
        validate_locator(locator)?;

        let title = match title.trim() {
            "" => self.files.title_for(locator),
            explicit => explicit.to_string(),
        };
        let entry = NewCatalogEntry {
            title,
            locator: locator.to_string(),
        };

        match self.unit_of_work.catalog.insert_entry(&entry).await {
            Ok(created) => {
                info!("registered upload {} as entry {}", created.locator, created.id);
                Ok(created)
            }
            Err(err) if err.is_conflict() => {
                debug!("upload {locator} was already catalogued");
                self.unit_of_work
                    .catalog
                    .find_by_locator(locator)
                    .await?
                    .ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn increment(&self, id: EntryId, counter: EngagementCounter) -> Result<i64> {
        self.ledger.increment(id, counter).await
    }

    pub async fn post_comment(
        &self,
        entry_id: EntryId,
        author_id: UserId,
        text: &str,
    ) -> Result<Comment> {
        self.threads.post(entry_id, author_id, text).await
    }

    pub async fn list_comments(&self, entry_id: EntryId) -> Result<Vec<Comment>> {
        self.threads.list_by_entry(entry_id).await
    }
}

/// Locators are bare file names inside the upload directory.
fn validate_locator(locator: &str) -> Result<()> {
    if locator.is_empty()
        || locator == "."
        || locator == ".."
        || locator.contains(['/', '\\', '\0'])
    {
        return Err(CatalogError::InvalidInput(format!(
            "invalid file locator {locator:?}"
        )));
    }
    Ok(())
}
