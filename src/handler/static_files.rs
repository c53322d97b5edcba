//! Static file serving module
//!
//! Resolves a request path under an asset root, falls back to `index.html`
//! for directories, and picks a content type from the extension.
//!
//! Resolution is a plain lexical join: `..` segments are folded but never
//! checked against the root, so a request can name files outside it.

use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, Uri};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// File served in place of a directory
pub const INDEX_FILE: &str = "index.html";

/// Failure to produce a static file
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("File {} not found!", .0.display())]
    NotFound(PathBuf),

    #[error("Error reading the file: {source}.")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ServeError {
    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::NotFound(_) => http::build_404_response(self.to_string()),
            Self::Read { .. } => http::build_500_response(self.to_string()),
        }
    }
}

/// A file loaded from an asset root
#[derive(Debug)]
pub struct StaticFile {
    pub path: PathBuf,
    pub content: Bytes,
    pub content_type: &'static str,
}

/// Serve `uri`'s path from `root`, logging the method and URL first
pub async fn serve(method: &Method, uri: &Uri, root: &Path) -> Response<Full<Bytes>> {
    logger::log_request(method, uri);

    match load_file(root, uri.path()).await {
        Ok(file) => http::build_file_response(file.content, file.content_type),
        Err(err) => {
            match &err {
                // File not found is common (404), no need to log at warning level
                ServeError::NotFound(path) => {
                    tracing::debug!("No file at {}", path.display());
                }
                ServeError::Read { path, source } => {
                    logger::log_error(&format!(
                        "Failed to read file '{}': {source}",
                        path.display()
                    ));
                }
            }
            err.into_response()
        }
    }
}

/// Load the file a request path refers to
pub async fn load_file(root: &Path, request_path: &str) -> Result<StaticFile, ServeError> {
    let mut path = resolve_path(root, request_path);

    let Ok(metadata) = fs::metadata(&path).await else {
        return Err(ServeError::NotFound(path));
    };

    if metadata.is_dir() {
        path.push(INDEX_FILE);
    }

    let content = match fs::read(&path).await {
        Ok(c) => c,
        Err(source) => return Err(ServeError::Read { path, source }),
    };

    // Determine content type from extension
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));

    Ok(StaticFile {
        path,
        content: Bytes::from(content),
        content_type,
    })
}

/// Join `request_path` onto `root` and fold `.`/`..` segments lexically
///
/// A trailing `/` on the request survives, so `/missing/` reports as
/// `<root>/missing/`.
pub fn resolve_path(root: &Path, request_path: &str) -> PathBuf {
    let joined = root.join(request_path.trim_start_matches('/'));
    let mut resolved = PathBuf::new();

    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if ends_in_normal(&resolved) {
                    resolved.pop();
                } else if !resolved.has_root() {
                    resolved.push("..");
                }
                // `..` at the filesystem root stays there
            }
            other => resolved.push(other.as_os_str()),
        }
    }

    if resolved.as_os_str().is_empty() {
        resolved.push(".");
    }
    if request_path.ends_with('/') && ends_in_normal(&resolved) {
        resolved.as_mut_os_string().push("/");
    }
    resolved
}

fn ends_in_normal(path: &Path) -> bool {
    matches!(path.components().next_back(), Some(Component::Normal(_)))
}
