use async_trait::async_trait;
use vidshelf_model::{UserId, UserRecord};

use crate::error::Result;

#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Storage for registered users. Password hashes are produced and checked
/// by the caller; this port only persists them.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Fails with `Conflict` when the username or email is taken.
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord>;

    async fn get_user(&self, id: UserId) -> Result<UserRecord>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;
}
