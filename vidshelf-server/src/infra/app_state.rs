use std::{fmt, sync::Arc};

use anyhow::Context;
use vidshelf_core::application::AppUnitOfWork;
use vidshelf_core::catalog::CatalogService;
use vidshelf_core::scan::UploadDirectory;

use crate::auth::{AuthCrypto, TokenIssuer};
use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub uploads: Arc<UploadDirectory>,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenIssuer>,
    pub crypto: Arc<AuthCrypto>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire the catalog over the given repositories and the configured upload
    /// directory.
    pub fn new(
        config: Arc<Config>,
        unit_of_work: AppUnitOfWork,
        crypto: AuthCrypto,
    ) -> anyhow::Result<Self> {
        let uploads = Arc::new(UploadDirectory::with_extensions(
            config.media.upload_dir.clone(),
            config.media.video_extensions.clone(),
        ));
        let tokens = TokenIssuer::new(&config.auth.jwt_secret, config.auth.jwt_ttl)
            .context("invalid token settings")?;
        let catalog = CatalogService::new(unit_of_work, uploads.clone());

        Ok(Self {
            catalog: Arc::new(catalog),
            uploads,
            config,
            tokens: Arc::new(tokens),
            crypto: Arc::new(crypto),
        })
    }

    /// Public URL a client can play the file behind `locator` from.
    pub fn video_url(&self, locator: &str) -> String {
        format!(
            "{}/uploads/{}",
            self.config.server.public_base_url,
            urlencoding::encode(locator)
        )
    }
}
