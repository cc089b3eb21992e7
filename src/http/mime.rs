//! Media type detection based on file extensions.

use std::path::Path;

/// Used when the extension is missing or unknown.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Media type of directory listings.
pub const LISTING_MEDIA_TYPE: &str = "text/plain";

/// Guesses the media type of `path` from its extension.
///
/// ```
/// # use webroot::http::mime::guess_media_type;
/// assert_eq!(guess_media_type("index.html"), "text/html");
/// assert_eq!(guess_media_type("blob.unknownext"), "application/octet-stream");
/// ```
pub fn guess_media_type(path: impl AsRef<Path>) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}
