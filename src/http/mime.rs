//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

/// Get MIME Content-Type based on file extension
///
/// Only markup and scripts get a dedicated type; everything else is served as
/// plain text. Matching is case-sensitive.
///
/// # Examples
/// ```
/// use marker_bridge::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html");
/// assert_eq!(get_content_type(Some("js")), "text/javascript");
/// assert_eq!(get_content_type(None), "text/plain");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        Some("html") => "text/html",
        Some("js") => "text/javascript",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";
