use std::sync::Arc;

use tracing::{debug, info};
use vidshelf_model::CatalogEntry;

use crate::database::ports::catalog::{CatalogRepository, NewCatalogEntry};
use crate::error::Result;
use crate::scan::FileStore;

/// Outcome of a single reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Files seen in the store.
    pub scanned: usize,
    /// Entries this pass inserted.
    pub discovered: usize,
    /// New-looking files another writer registered first.
    pub already_present: usize,
}

/// Brings the catalog up to date with the file store.
///
/// Discovery is additive: files removed from the store keep their entries.
/// Passes may overlap freely; the identity store's unique locator constraint
/// decides which insert wins and the loser counts the file as present.
#[derive(Clone)]
pub struct Reconciler {
    catalog: Arc<dyn CatalogRepository>,
    files: Arc<dyn FileStore>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(catalog: Arc<dyn CatalogRepository>, files: Arc<dyn FileStore>) -> Self {
        Self { catalog, files }
    }

    /// Run one pass and return every entry, ordered by id.
    pub async fn reconcile(&self) -> Result<Vec<CatalogEntry>> {
        let (entries, _) = self.reconcile_with_report().await?;
        Ok(entries)
    }

    pub async fn reconcile_with_report(&self) -> Result<(Vec<CatalogEntry>, ReconcileReport)> {
        let existing = self.catalog.list_locators().await?;
        let candidates = self.files.list_candidates().await?;

        let mut report = ReconcileReport {
            scanned: candidates.len(),
            ..ReconcileReport::default()
        };

        for locator in candidates.iter().filter(|l| !existing.contains(*l)) {
            let entry = NewCatalogEntry {
                title: self.files.title_for(locator),
                locator: locator.clone(),
            };
            match self.catalog.insert_entry(&entry).await {
                Ok(created) => {
                    debug!("catalogued {} as entry {}", created.locator, created.id);
                    report.discovered += 1;
                }
                Err(err) if err.is_conflict() => {
                    debug!("{locator} was catalogued concurrently");
                    report.already_present += 1;
                }
                Err(err) => return Err(err),
            }
        }

        if report.discovered > 0 || report.already_present > 0 {
            info!(
                scanned = report.scanned,
                discovered = report.discovered,
                already_present = report.already_present,
                "reconciliation pass finished"
            );
        }

        let entries = self.catalog.list_entries().await?;
        Ok((entries, report))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::database::InMemoryStore;
    use crate::error::CatalogError;

    struct FixedFiles(Mutex<BTreeSet<String>>);

    impl FixedFiles {
        fn new(names: &[&str]) -> Arc<Self> {
            Arc::new(Self(Mutex::new(
                names.iter().map(|n| n.to_string()).collect(),
            )))
        }

        fn add(&self, name: &str) {
            self.0.lock().unwrap().insert(name.to_string());
        }

        fn remove(&self, name: &str) {
            self.0.lock().unwrap().remove(name);
        }
    }

    #[async_trait]
    impl FileStore for FixedFiles {
        async fn list_candidates(&self) -> Result<BTreeSet<String>> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    /// Registers every file in the catalog while it is being listed, the way
    /// an upload finishing mid-pass would.
    struct RacingFiles {
        names: BTreeSet<String>,
        catalog: Arc<InMemoryStore>,
    }

    #[async_trait]
    impl FileStore for RacingFiles {
        async fn list_candidates(&self) -> Result<BTreeSet<String>> {
            for name in &self.names {
                self.catalog
                    .insert_entry(&NewCatalogEntry {
                        title: "Uploaded".into(),
                        locator: name.clone(),
                    })
                    .await?;
            }
            Ok(self.names.clone())
        }
    }

    struct BrokenFiles;

    #[async_trait]
    impl FileStore for BrokenFiles {
        async fn list_candidates(&self) -> Result<BTreeSet<String>> {
            Err(CatalogError::StoreUnavailable("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn discovers_new_files_with_derived_titles() {
        let store = Arc::new(InMemoryStore::new());
        let files = FixedFiles::new(&["b.mkv", "a.mp4"]);
        let reconciler = Reconciler::new(store, files);

        let (entries, report) = reconciler.reconcile_with_report().await.unwrap();

        assert_eq!(report.discovered, 2);
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert!(entries.iter().all(|e| e.views == 0 && e.likes == 0 && e.dislikes == 0));
    }

    #[tokio::test]
    async fn second_pass_is_a_no_op() {
        let store = Arc::new(InMemoryStore::new());
        let reconciler = Reconciler::new(store, FixedFiles::new(&["a.mp4", "b.mp4"]));

        let first = reconciler.reconcile().await.unwrap();
        let (second, report) = reconciler.reconcile_with_report().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(report.discovered, 0);
    }

    #[tokio::test]
    async fn removed_files_are_not_pruned() {
        let store = Arc::new(InMemoryStore::new());
        let files = FixedFiles::new(&["a.mp4"]);
        let reconciler = Reconciler::new(store, files.clone());

        reconciler.reconcile().await.unwrap();
        files.remove("a.mp4");
        files.add("b.mp4");

        let entries = reconciler.reconcile().await.unwrap();
        let locators: Vec<_> = entries.iter().map(|e| e.locator.as_str()).collect();
        assert_eq!(locators, vec!["a.mp4", "b.mp4"]);
    }

    #[tokio::test]
    async fn explicit_entry_for_same_locator_is_not_duplicated() {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert_entry(&NewCatalogEntry {
                title: "My upload".into(),
                locator: "a.mp4".into(),
            })
            .await
            .unwrap();
        let reconciler = Reconciler::new(store, FixedFiles::new(&["a.mp4"]));

        let entries = reconciler.reconcile().await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "My upload");
    }

    #[tokio::test]
    async fn insert_lost_to_concurrent_writer_counts_as_present() {
        let store = Arc::new(InMemoryStore::new());
        let files = Arc::new(RacingFiles {
            names: BTreeSet::from(["a.mp4".to_string()]),
            catalog: store.clone(),
        });
        let reconciler = Reconciler::new(store.clone(), files);

        let (entries, report) = reconciler.reconcile_with_report().await.unwrap();

        assert_eq!(report.discovered, 0);
        assert_eq!(report.already_present, 1);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].locator, "a.mp4");
        assert_eq!(entries[0].title, "Uploaded");
    }

    #[tokio::test]
    async fn scan_failure_leaves_catalog_untouched() {
        let store = Arc::new(InMemoryStore::new());
        Reconciler::new(store.clone(), FixedFiles::new(&["a.mp4"]))
            .reconcile()
            .await
            .unwrap();

        let err = Reconciler::new(store.clone(), Arc::new(BrokenFiles))
            .reconcile()
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::StoreUnavailable(_)));
        assert_eq!(store.list_entries().await.unwrap().len(), 1);
    }
}
