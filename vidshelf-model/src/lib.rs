//! Core data model definitions shared across vidshelf crates.
#![allow(missing_docs)]

#[cfg(feature = "serde")]
pub mod api;
pub mod api_routes;
pub mod catalog;
pub mod comment;
pub mod engagement;
pub mod error;
pub mod ids;
pub mod user;

pub use catalog::CatalogEntry;
pub use comment::Comment;
pub use engagement::EngagementCounter;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{CommentId, EntryId, UserId};
pub use user::{UserRecord, UserSummary};
