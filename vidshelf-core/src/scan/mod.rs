//! Upload directory scanning.
//!
//! The scanner only reads the directory; it never touches the catalog. The
//! reconciler composes it with the identity store.

pub mod scanner;
pub mod settings;

pub use scanner::{FileStore, UploadDirectory};
pub use settings::{
    DEFAULT_VIDEO_FILE_EXTENSIONS, STAGING_SUFFIX, title_from_locator, title_with_extensions,
};
