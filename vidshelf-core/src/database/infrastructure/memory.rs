//! In-memory implementation of every repository port.
//!
//! Used by tests and by the server when no `DATABASE_URL` is configured. All
//! state sits behind one async mutex; each port call takes the lock exactly
//! once, which gives the same per-statement atomicity the PostgreSQL adapter
//! gets from single-row updates and unique constraints.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use vidshelf_model::{
    CatalogEntry, Comment, CommentId, EngagementCounter, EntryId, UserId, UserRecord,
};

use crate::database::ports::{
    catalog::{CatalogRepository, NewCatalogEntry},
    comments::{CommentRepository, NewComment},
    users::{NewUser, UsersRepository},
};
use crate::error::{CatalogError, Result};

#[derive(Default)]
struct State {
    entries: BTreeMap<EntryId, CatalogEntry>,
    locators: HashMap<String, EntryId>,
    next_entry_id: i64,
    comments: Vec<Comment>,
    next_comment_id: i64,
    users: BTreeMap<UserId, UserRecord>,
    next_user_id: i64,
}

impl State {
    fn allocate(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Shared in-process store. Cloning yields another handle onto the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryStore").finish_non_exhaustive()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn list_entries(&self) -> Result<Vec<CatalogEntry>> {
        let state = self.state.lock().await;
        Ok(state.entries.values().cloned().collect())
    }

    async fn list_locators(&self) -> Result<HashSet<String>> {
        let state = self.state.lock().await;
        Ok(state.locators.keys().cloned().collect())
    }

    async fn get_entry(&self, id: EntryId) -> Result<CatalogEntry> {
        let state = self.state.lock().await;
        state
            .entries
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("catalog entry {id}")))
    }

    async fn find_by_locator(&self, locator: &str) -> Result<Option<CatalogEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .locators
            .get(locator)
            .and_then(|id| state.entries.get(id))
            .cloned())
    }

    async fn insert_entry(&self, entry: &NewCatalogEntry) -> Result<CatalogEntry> {
        if entry.locator.is_empty() {
            return Err(CatalogError::InvalidInput("locator must not be empty".into()));
        }

        let mut state = self.state.lock().await;
        if state.locators.contains_key(&entry.locator) {
            return Err(CatalogError::Conflict(format!(
                "locator {} is already catalogued",
                entry.locator
            )));
        }

        let id = EntryId(State::allocate(&mut state.next_entry_id));
        let stored = CatalogEntry {
            id,
            title: entry.title.clone(),
            locator: entry.locator.clone(),
            created_at: Utc::now(),
            views: 0,
            likes: 0,
            dislikes: 0,
        };
        state.locators.insert(entry.locator.clone(), id);
        state.entries.insert(id, stored.clone());
        Ok(stored)
    }

    async fn increment_counter(&self, id: EntryId, counter: EngagementCounter) -> Result<i64> {
        let mut state = self.state.lock().await;
        let entry = state
            .entries
            .get_mut(&id)
            .ok_or_else(|| CatalogError::NotFound(format!("catalog entry {id}")))?;

        let slot = match counter {
            EngagementCounter::Views => &mut entry.views,
            EngagementCounter::Likes => &mut entry.likes,
            EngagementCounter::Dislikes => &mut entry.dislikes,
        };
        *slot += 1;
        Ok(*slot)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment> {
        let mut state = self.state.lock().await;
        if !state.entries.contains_key(&comment.entry_id) {
            return Err(CatalogError::NotFound(format!(
                "catalog entry {}",
                comment.entry_id
            )));
        }
        if !state.users.contains_key(&comment.author_id) {
            return Err(CatalogError::NotFound(format!("user {}", comment.author_id)));
        }

        let stored = Comment {
            id: CommentId(State::allocate(&mut state.next_comment_id)),
            text: comment.text.clone(),
            author_id: comment.author_id,
            entry_id: comment.entry_id,
            created_at: Utc::now(),
        };
        state.comments.push(stored.clone());
        Ok(stored)
    }

    async fn list_comments(&self, entry_id: EntryId) -> Result<Vec<Comment>> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .iter()
            .filter(|comment| comment.entry_id == entry_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UsersRepository for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord> {
        if user.username.is_empty() || user.email.is_empty() {
            return Err(CatalogError::InvalidInput(
                "username and email are required".into(),
            ));
        }

        let mut state = self.state.lock().await;
        if let Some(existing) = state
            .users
            .values()
            .find(|u| u.username == user.username || u.email == user.email)
        {
            let message = if existing.username == user.username {
                format!("username {} is taken", user.username)
            } else {
                format!("email {} is already registered", user.email)
            };
            return Err(CatalogError::Conflict(message));
        }

        let record = UserRecord {
            id: UserId(State::allocate(&mut state.next_user_id)),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: Utc::now(),
        };
        state.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_user(&self, id: UserId) -> Result<UserRecord> {
        let state = self.state.lock().await;
        state
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("user {id}")))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }
}
