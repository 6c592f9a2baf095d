//! Catalog operations built on the repository ports.

pub mod comments;
pub mod engagement;
pub mod reconciler;
pub mod service;

pub use comments::CommentThreads;
pub use engagement::EngagementLedger;
pub use reconciler::{ReconcileReport, Reconciler};
pub use service::CatalogService;
