use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use vidshelf_model::{Comment, EntryId};

use super::{map_sqlx_error, violated_constraint, with_deadline, with_deadline_or};
use crate::database::ports::comments::{CommentRepository, NewComment};
use crate::error::{CatalogError, Result};

const COMMENT_COLUMNS: &str =
    "id, text, user_id AS author_id, video_id AS entry_id, created_at";

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

impl fmt::Debug for PostgresCommentRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresCommentRepository")
            .field("pool_size", &self.pool.size())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment> {
        let sql = format!(
            "INSERT INTO comments (text, user_id, video_id) VALUES ($1, $2, $3) \
             RETURNING {COMMENT_COLUMNS}"
        );
        with_deadline_or(
            self.timeout,
            "insert comment",
            sqlx::query_as::<_, Comment>(&sql)
                .bind(&comment.text)
                .bind(comment.author_id)
                .bind(comment.entry_id)
                .fetch_one(&self.pool),
            |err| match violated_constraint(&err).map(str::to_owned).as_deref() {
                Some("comments_video_id_fkey") => {
                    CatalogError::NotFound(format!("catalog entry {}", comment.entry_id))
                }
                Some("comments_user_id_fkey") => {
                    CatalogError::NotFound(format!("user {}", comment.author_id))
                }
                _ => map_sqlx_error("insert comment", err),
            },
        )
        .await
    }

    async fn list_comments(&self, entry_id: EntryId) -> Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE video_id = $1 ORDER BY id ASC"
        );
        with_deadline(
            self.timeout,
            "list comments",
            sqlx::query_as::<_, Comment>(&sql)
                .bind(entry_id)
                .fetch_all(&self.pool),
        )
        .await
    }
}
