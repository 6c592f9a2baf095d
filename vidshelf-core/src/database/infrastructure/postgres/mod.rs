//! PostgreSQL-backed repository implementations.

mod catalog;
mod comments;
mod users;

pub use catalog::PostgresCatalogRepository;
pub use comments::PostgresCommentRepository;
pub use users::PostgresUsersRepository;

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{CatalogError, Result};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const NOT_NULL_VIOLATION: &str = "23502";
const CHECK_VIOLATION: &str = "23514";

/// Run a store operation under `limit`, translating driver failures into the
/// catalog taxonomy. Expiry surfaces as `StoreUnavailable`.
pub(crate) async fn with_deadline<T, F>(limit: Duration, op: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    with_deadline_or(limit, op, fut, |err| map_sqlx_error(op, err)).await
}

/// Like [`with_deadline`] but with a caller-supplied error translation.
pub(crate) async fn with_deadline_or<T, F, M>(
    limit: Duration,
    op: &'static str,
    fut: F,
    map: M,
) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
    M: FnOnce(sqlx::Error) -> CatalogError,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(map),
        Err(_) => {
            warn!("{op} exceeded store deadline of {limit:?}");
            Err(CatalogError::StoreUnavailable(format!(
                "{op} timed out after {limit:?}"
            )))
        }
    }
}

pub(crate) fn map_sqlx_error(op: &'static str, err: sqlx::Error) -> CatalogError {
    match err {
        sqlx::Error::RowNotFound => CatalogError::NotFound(format!("{op}: no matching row")),
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.to_string());
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match code.as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    CatalogError::Conflict(format!("{op}: {constraint} already exists"))
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    CatalogError::NotFound(format!("{op}: referenced row missing ({constraint})"))
                }
                Some(NOT_NULL_VIOLATION) | Some(CHECK_VIOLATION) => {
                    CatalogError::InvalidInput(format!("{op}: {constraint} violated"))
                }
                _ => {
                    warn!("{op} failed: {db_err}");
                    CatalogError::StoreUnavailable(format!("{op} failed"))
                }
            }
        }
        other => {
            warn!("{op} failed: {other}");
            CatalogError::StoreUnavailable(format!("{op} failed"))
        }
    }
}

/// Constraint name of a database error, if the driver reported one.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
