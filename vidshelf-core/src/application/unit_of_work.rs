use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::InMemoryStore;
use crate::database::ports::{
    catalog::CatalogRepository, comments::CommentRepository, users::UsersRepository,
};
#[cfg(feature = "postgres")]
use crate::database::postgres::PostgresDatabase;

/// Aggregates all repository ports used by application services.
///
/// Construction picks the backend once; everything downstream only sees the
/// port traits.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub catalog: Arc<dyn CatalogRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub users: Arc<dyn UsersRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("catalog", &type_name_of_val(self.catalog.as_ref()))
            .field("comments", &type_name_of_val(self.comments.as_ref()))
            .field("users", &type_name_of_val(self.users.as_ref()))
            .finish()
    }
}

impl AppUnitOfWork {
    #[cfg(feature = "postgres")]
    pub fn from_postgres(db: &PostgresDatabase) -> Self {
        Self {
            catalog: Arc::new(db.catalog().clone()),
            comments: Arc::new(db.comments().clone()),
            users: Arc::new(db.users().clone()),
        }
    }

    /// All three ports backed by one shared in-memory store.
    pub fn in_memory(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            catalog: store.clone(),
            comments: store.clone(),
            users: store,
        }
    }
}
