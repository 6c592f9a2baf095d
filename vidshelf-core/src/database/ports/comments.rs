use async_trait::async_trait;
use vidshelf_model::{Comment, EntryId, UserId};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub entry_id: EntryId,
    pub author_id: UserId,
    pub text: String,
}

/// Append-only comment storage.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a comment. Fails with `NotFound` when the entry or the author
    /// does not exist.
    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment>;

    /// Comments for an entry in insertion order. Unknown entries yield an
    /// empty list.
    async fn list_comments(&self, entry_id: EntryId) -> Result<Vec<Comment>>;
}
