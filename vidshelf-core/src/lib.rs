//! # vidshelf core
//!
//! Core library for the vidshelf media catalog. It keeps a relational catalog
//! of uploaded videos consistent with the upload directory and records user
//! engagement against those entries.
//!
//! ## Overview
//!
//! - **Reconciliation**: [`catalog::Reconciler`] diffs the upload directory
//!   against the catalog and registers newly discovered files exactly once,
//!   even when several passes race.
//! - **Engagement**: [`catalog::EngagementLedger`] increments view, like and
//!   dislike counters with a single atomic update per call.
//! - **Comments**: [`catalog::CommentThreads`] appends and lists comments per
//!   entry.
//! - **Persistence**: repository ports in [`database::ports`] with a
//!   PostgreSQL implementation (SQLx) and an in-memory one.
//!
//! Authentication is not part of this crate; callers pass an already
//! verified [`UserId`](vidshelf_model::UserId).
//!
//! ## Feature Flags
//!
//! - `postgres` (default): PostgreSQL repositories and the embedded
//!   migrations in [`MIGRATOR`].
//! - `postgres-tests`: enables integration tests that need `DATABASE_URL`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Application-level composition of repository ports
pub mod application;

/// Reconciler, engagement ledger, comment threads, and the service facade
pub mod catalog;

/// Repository ports and their implementations
pub mod database;

/// Error taxonomy shared by every catalog operation
pub mod error;

/// Upload directory scanning
pub mod scan;

#[cfg(feature = "postgres")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{CatalogError, Result};
pub use vidshelf_model as model;
