//! Route paths served by `vidshelf-server`, shared with clients and tests.

pub mod v1 {
    pub const PREFIX: &str = "/api/v1";

    pub mod auth {
        pub const SIGNUP: &str = "/api/v1/auth/signup";
        pub const LOGIN: &str = "/api/v1/auth/login";
    }

    pub mod videos {
        pub const COLLECTION: &str = "/api/v1/videos";
        pub const UPLOAD: &str = "/api/v1/videos/upload";
        pub const ITEM: &str = "/api/v1/videos/{id}";
        /// `{action}` is one of `view`, `like`, `dislike`.
        pub const ENGAGEMENT: &str = "/api/v1/videos/{id}/{action}";
        pub const COMMENTS: &str = "/api/v1/videos/{id}/comments";
    }
}

pub const HEALTH: &str = "/health";

/// Static files from the upload directory, keyed by locator.
pub const UPLOADS: &str = "/uploads";

pub mod utils {
    /// Substitute a placeholder such as `{id}` in a route template.
    pub fn replace_param(path: &str, param: &str, value: impl ToString) -> String {
        path.replace(param, &value.to_string())
    }

    /// Path of a route template relative to the v1 prefix, for nesting.
    pub fn v1_relative(path: &str) -> &str {
        path.strip_prefix(super::v1::PREFIX).unwrap_or(path)
    }
}
