/// Shared scanner defaults that align with server configuration knobs.
///
/// Keeping the extension list in one place lets the server expose it as a
/// setting without diverging from the core's filtering rules.
pub const DEFAULT_VIDEO_FILE_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "webm", "flv", "wmv", "m4v", "mpg", "mpeg",
];

/// Suffix of files the upload path is still writing. Never catalogued.
pub const STAGING_SUFFIX: &str = ".part";

/// Convenience helper for consumers that work with owned strings (e.g. config
/// deserialisation layers).
pub fn default_video_file_extensions_vec() -> Vec<String> {
    DEFAULT_VIDEO_FILE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

/// Display title for a file discovered without an explicit one.
///
/// Strips a known media extension (case-insensitive); any other suffix is
/// part of the name and kept.
pub fn title_from_locator(locator: &str) -> String {
    title_with_extensions(locator, DEFAULT_VIDEO_FILE_EXTENSIONS)
}

/// [`title_from_locator`] against an explicit allow-list. An empty list
/// accepts every file, so any final extension is stripped.
pub fn title_with_extensions<S: AsRef<str>>(locator: &str, extensions: &[S]) -> String {
    if let Some((stem, ext)) = locator.rsplit_once('.')
        && !stem.is_empty()
        && (extensions.is_empty()
            || extensions
                .iter()
                .any(|known| known.as_ref().eq_ignore_ascii_case(ext)))
    {
        return stem.to_string();
    }
    locator.to_string()
}
