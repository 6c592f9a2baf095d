use std::sync::Arc;

use tracing::debug;
use vidshelf_model::{Comment, EntryId, UserId};

use crate::database::ports::comments::{CommentRepository, NewComment};
use crate::error::{CatalogError, Result};

/// Comment threads attached to catalog entries.
#[derive(Clone)]
pub struct CommentThreads {
    comments: Arc<dyn CommentRepository>,
}

impl std::fmt::Debug for CommentThreads {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentThreads").finish_non_exhaustive()
    }
}

impl CommentThreads {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }

    /// Append a comment. Surrounding whitespace is trimmed before storage.
    pub async fn post(&self, entry_id: EntryId, author_id: UserId, text: &str) -> Result<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CatalogError::InvalidInput("comment text must not be empty".into()));
        }
        if !entry_id.is_assigned() {
            return Err(CatalogError::InvalidInput("entry id is required".into()));
        }
        if !author_id.is_assigned() {
            return Err(CatalogError::InvalidInput("author id is required".into()));
        }

        let comment = self
            .comments
            .insert_comment(&NewComment {
                entry_id,
                author_id,
                text: text.to_string(),
            })
            .await?;
        debug!("comment {} posted on entry {entry_id}", comment.id);
        Ok(comment)
    }

    /// Comments for `entry_id` in the order they were posted.
    pub async fn list_by_entry(&self, entry_id: EntryId) -> Result<Vec<Comment>> {
        if !entry_id.is_assigned() {
            return Ok(Vec::new());
        }
        self.comments.list_comments(entry_id).await
    }
}
