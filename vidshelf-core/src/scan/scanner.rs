use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::scan::settings::{
    STAGING_SUFFIX, default_video_file_extensions_vec, title_from_locator, title_with_extensions,
};

/// Enumerable source of candidate locators.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Names of every catalogable file currently present.
    ///
    /// Fails with `StoreUnavailable` when the store cannot be read.
    async fn list_candidates(&self) -> Result<BTreeSet<String>>;

    /// Title for a locator catalogued without an explicit one.
    fn title_for(&self, locator: &str) -> String {
        title_from_locator(locator)
    }
}

/// The upload directory on local disk, read through `tokio::fs`.
///
/// Only regular files directly inside the root are candidates. Dotfiles,
/// staging files, and files outside the extension allow-list are skipped; an
/// empty allow-list accepts every regular file.
#[derive(Debug, Clone)]
pub struct UploadDirectory {
    root: PathBuf,
    extensions: Vec<String>,
}

impl UploadDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extensions(root, default_video_file_extensions_vec())
    }

    pub fn with_extensions(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self {
            root: root.into(),
            extensions,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location a locator resolves to.
    pub fn path_for(&self, locator: &str) -> PathBuf {
        self.root.join(locator)
    }

    fn accepts(&self, name: &str) -> bool {
        if name.starts_with('.') || name.ends_with(STAGING_SUFFIX) {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        match name.rsplit_once('.') {
            Some((_, ext)) => self.allows_extension(ext),
            None => false,
        }
    }

    /// Whether files with this extension are catalogued. Uploads are checked
    /// against the same list.
    pub fn allows_extension(&self, ext: &str) -> bool {
        self.extensions.is_empty()
            || self
                .extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
    }
}

#[async_trait]
impl FileStore for UploadDirectory {
    async fn list_candidates(&self) -> Result<BTreeSet<String>> {
        let unavailable = |e: std::io::Error| {
            CatalogError::StoreUnavailable(format!(
                "upload directory {} is unreadable: {e}",
                self.root.display()
            ))
        };

        let mut dir = tokio::fs::read_dir(&self.root).await.map_err(unavailable)?;
        let mut candidates = BTreeSet::new();

        while let Some(entry) = dir.next_entry().await.map_err(unavailable)? {
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!("skipping {:?}: {e}", entry.path());
                    continue;
                }
            };
            if !file_type.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!("skipping non UTF-8 file name {:?}", entry.file_name());
                continue;
            };

            if self.accepts(&name) {
                candidates.insert(name);
            } else {
                debug!("ignoring {name} in upload directory");
            }
        }

        Ok(candidates)
    }

    fn title_for(&self, locator: &str) -> String {
        title_with_extensions(locator, &self.extensions)
    }
}
