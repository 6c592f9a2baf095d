use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use vidshelf_model::{CatalogEntry, EngagementCounter, EntryId};

use super::{violated_constraint, with_deadline, with_deadline_or};
use crate::database::ports::catalog::{CatalogRepository, NewCatalogEntry};
use crate::error::{CatalogError, Result};

const ENTRY_COLUMNS: &str = "id, title, locator, created_at, views, likes, dislikes";

#[derive(Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl fmt::Debug for PostgresCatalogRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresCatalogRepository")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// One statement per counter so the column name never comes from input.
fn increment_statement(counter: EngagementCounter) -> &'static str {
    match counter {
        EngagementCounter::Views => {
            "UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING views"
        }
        EngagementCounter::Likes => {
            "UPDATE videos SET likes = likes + 1 WHERE id = $1 RETURNING likes"
        }
        EngagementCounter::Dislikes => {
            "UPDATE videos SET dislikes = dislikes + 1 WHERE id = $1 RETURNING dislikes"
        }
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn list_entries(&self) -> Result<Vec<CatalogEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM videos ORDER BY id ASC");
        with_deadline(
            self.timeout,
            "list catalog entries",
            sqlx::query_as::<_, CatalogEntry>(&sql).fetch_all(self.pool()),
        )
        .await
    }

    async fn list_locators(&self) -> Result<HashSet<String>> {
        let locators: Vec<String> = with_deadline(
            self.timeout,
            "list catalog locators",
            sqlx::query_scalar("SELECT locator FROM videos").fetch_all(self.pool()),
        )
        .await?;

        Ok(locators.into_iter().collect())
    }

    async fn get_entry(&self, id: EntryId) -> Result<CatalogEntry> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM videos WHERE id = $1");
        with_deadline(
            self.timeout,
            "get catalog entry",
            sqlx::query_as::<_, CatalogEntry>(&sql)
                .bind(id)
                .fetch_optional(self.pool()),
        )
        .await?
        .ok_or_else(|| CatalogError::NotFound(format!("catalog entry {id}")))
    }

    async fn find_by_locator(&self, locator: &str) -> Result<Option<CatalogEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM videos WHERE locator = $1");
        with_deadline(
            self.timeout,
            "find catalog entry by locator",
            sqlx::query_as::<_, CatalogEntry>(&sql)
                .bind(locator)
                .fetch_optional(self.pool()),
        )
        .await
    }

    async fn insert_entry(&self, entry: &NewCatalogEntry) -> Result<CatalogEntry> {
        let sql = format!(
            "INSERT INTO videos (title, locator) VALUES ($1, $2) RETURNING {ENTRY_COLUMNS}"
        );
        // A plain INSERT (no ON CONFLICT) so racing writers observe the unique
        // violation and can decide for themselves what it means.
        with_deadline_or(
            self.timeout,
            "insert catalog entry",
            sqlx::query_as::<_, CatalogEntry>(&sql)
                .bind(&entry.title)
                .bind(&entry.locator)
                .fetch_one(self.pool()),
            |err| match violated_constraint(&err).map(str::to_owned).as_deref() {
                Some("videos_locator_key") => CatalogError::Conflict(format!(
                    "locator {} is already catalogued",
                    entry.locator
                )),
                _ => super::map_sqlx_error("insert catalog entry", err),
            },
        )
        .await
    }

    async fn increment_counter(&self, id: EntryId, counter: EngagementCounter) -> Result<i64> {
        with_deadline(
            self.timeout,
            "increment engagement counter",
            sqlx::query_scalar::<_, i64>(increment_statement(counter))
                .bind(id)
                .fetch_optional(self.pool()),
        )
        .await?
        .ok_or_else(|| CatalogError::NotFound(format!("catalog entry {id}")))
    }
}
