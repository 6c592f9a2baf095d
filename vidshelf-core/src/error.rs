use thiserror::Error;
use vidshelf_model::ModelError;

/// Failure kinds surfaced by catalog operations.
///
/// `Conflict` is produced by the persistence layer when a unique key is
/// already taken; the reconciler recovers from it locally and it only reaches
/// callers of explicit creation paths.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CatalogError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, CatalogError::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

impl From<ModelError> for CatalogError {
    fn from(err: ModelError) -> Self {
        CatalogError::InvalidInput(err.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
