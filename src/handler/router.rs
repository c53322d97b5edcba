//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: classify by method and path, hand
//! off to the static file server or the ingest handler, or reject.

use crate::config::{AppState, AssetsConfig};
use crate::handler::{ingest, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Uri};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// POST paths under this prefix are ingest requests
pub const INGEST_PREFIX: &str = "/qr/";

/// GET targets ending with this are served from the script root
pub const SCRIPT_SUFFIX: &str = ".js";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if !state.config.logging.access_log {
        return Ok(route_request(req, &state).await);
    }

    let started = Instant::now();
    let mut entry = access_entry(&req, remote_addr);
    let response = route_request(req, &state).await;

    record_response(&mut entry, &response, started);
    logger::log_access(&entry, &state.config.logging.access_log_format);

    Ok(response)
}

/// Dispatch on method, then path. Exactly one branch answers.
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match *req.method() {
        Method::GET => {
            let root = select_root(req.uri(), &state.config.assets);
            static_files::serve(req.method(), req.uri(), root).await
        }
        Method::POST if req.uri().path().starts_with(INGEST_PREFIX) => {
            ingest::handle(req, state).await
        }
        Method::POST => http::build_404_response("Not Found"),
        _ => {
            logger::log_warning(&format!("Method not allowed: {}", req.method()));
            http::build_405_response()
        }
    }
}

/// Pick the asset root for a GET
///
/// The suffix test runs on the request target as received, query included,
/// so `/app.js?v=2` goes to the UI root.
pub fn select_root<'a>(uri: &Uri, assets: &'a AssetsConfig) -> &'a Path {
    if is_script_request(uri) {
        &assets.script_root
    } else {
        &assets.ui_root
    }
}

pub fn is_script_request(uri: &Uri) -> bool {
    uri.path_and_query()
        .map_or_else(|| uri.path(), hyper::http::uri::PathAndQuery::as_str)
        .ends_with(SCRIPT_SUFFIX)
}

fn access_entry<B>(req: &Request<B>, remote_addr: Option<SocketAddr>) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.map_or_else(|| "-".to_string(), |a| a.ip().to_string()),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

/// Fill in the response half of an access log entry
fn record_response(entry: &mut AccessLogEntry, response: &Response<Full<Bytes>>, started: Instant) {
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
        .unwrap_or(usize::MAX);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::payload::OutboundMapping;
    use crate::sink::ChannelSink;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Fixture {
        _dir: tempfile::TempDir,
        state: Arc<AppState>,
        delivered: UnboundedReceiver<OutboundMapping>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let ui = dir.path().join("other");
        let scripts = dir.path().join("code");

        std::fs::create_dir_all(ui.join("panel")).unwrap();
        std::fs::create_dir_all(ui.join("bare")).unwrap();
        std::fs::create_dir_all(scripts.join("lib")).unwrap();
        std::fs::write(ui.join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::write(ui.join("panel/index.html"), "<h1>panel</h1>").unwrap();
        std::fs::write(ui.join("notes.txt"), "notes").unwrap();
        std::fs::write(ui.join("style.css"), "body{}").unwrap();
        std::fs::write(ui.join("app.js"), "// decoy in ui root").unwrap();
        std::fs::write(scripts.join("app.js"), "console.log('app');").unwrap();
        std::fs::write(scripts.join("lib/util.js"), "export {};").unwrap();

        let mut config = Config::default();
        config.assets = AssetsConfig {
            ui_root: ui,
            script_root: scripts,
        };
        let (sink, delivered) = ChannelSink::new();

        Fixture {
            _dir: dir,
            state: Arc::new(AppState::with_sink(config, sink)),
            delivered,
        }
    }

    fn request(method: Method, uri: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    async fn send(fx: &Fixture, req: Request<Full<Bytes>>) -> (StatusCode, String, Bytes) {
        let resp = handle_request(req, Arc::clone(&fx.state), None)
            .await
            .unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, body)
    }

    #[tokio::test]
    async fn test_get_files_from_ui_root() {
        let fx = fixture();

        let (status, ct, body) = send(&fx, request(Method::GET, "/notes.txt", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct, "text/plain");
        assert_eq!(body, "notes");

        let (status, ct, _) = send(&fx, request(Method::GET, "/style.css", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct, "text/plain");
    }

    #[tokio::test]
    async fn test_directory_serves_index() {
        let fx = fixture();

        let (status, ct, body) = send(&fx, request(Method::GET, "/", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct, "text/html");
        assert_eq!(body, "<h1>home</h1>");

        let (status, _, body) = send(&fx, request(Method::GET, "/panel", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>panel</h1>");

        let (status, _, body) = send(&fx, request(Method::GET, "/panel/", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>panel</h1>");
    }

    #[tokio::test]
    async fn test_directory_without_index_is_500() {
        let fx = fixture();
        let (status, _, body) = send(&fx, request(Method::GET, "/bare", "")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(String::from_utf8_lossy(&body).starts_with("Error reading the file: "));
    }

    #[tokio::test]
    async fn test_scripts_come_from_script_root() {
        let fx = fixture();

        let (status, ct, body) = send(&fx, request(Method::GET, "/app.js", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct, "text/javascript");
        assert_eq!(body, "console.log('app');");

        // Nested segments don't matter, only the suffix
        let (status, _, body) = send(&fx, request(Method::GET, "/lib/util.js", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "export {};");

        let (status, _, _) = send(&fx, request(Method::GET, "/panel/util.js", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_query_defeats_script_suffix() {
        let fx = fixture();
        let (status, _, body) = send(&fx, request(Method::GET, "/app.js?v=2", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "// decoy in ui root");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let fx = fixture();
        let (status, _, body) = send(&fx, request(Method::GET, "/nope.html", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let expected = fx.state.config.assets.ui_root.join("nope.html");
        assert_eq!(body, format!("File {} not found!", expected.display()));

        let (status, _, _) = send(&fx, request(Method::GET, "/nope.js", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_ingest() {
        let mut fx = fixture();
        let body = r#"{"id":"abc","x":1,"y":2,"r":3}"#;

        let (status, _, resp) = send(&fx, request(Method::POST, "/qr/abc", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp, "success");
        let first = fx.delivered.try_recv().unwrap();
        assert_eq!(first.to_json().unwrap(), r#"{"abc":{"x":1,"y":2,"r":3}}"#);

        // No deduplication
        let (status, _, _) = send(&fx, request(Method::POST, "/qr/abc", body)).await;
        assert_eq!(status, StatusCode::OK);
        let second = fx.delivered.try_recv().unwrap();
        assert_eq!(first, second);
        assert!(fx.delivered.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_post_malformed_body() {
        let mut fx = fixture();
        let (status, _, body) = send(&fx, request(Method::POST, "/qr/abc", "{not json")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(String::from_utf8_lossy(&body).starts_with("Invalid JSON body: "));
        assert!(fx.delivered.try_recv().is_err());

        let (status, _, _) = send(&fx, request(Method::POST, "/qr/abc", r#"{"id":"abc"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(fx.delivered.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_post_outside_prefix() {
        let mut fx = fixture();
        for path in ["/other/path", "/qr", "/QR/abc", "/"] {
            let body = r#"{"id":"abc","x":1,"y":2,"r":3}"#;
            let (status, _, resp) = send(&fx, request(Method::POST, path, body)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert_eq!(resp, "Not Found");
        }
        assert!(fx.delivered.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        let fx = fixture();
        for method in [Method::PUT, Method::DELETE, Method::HEAD, Method::OPTIONS, Method::PATCH] {
            let (status, _, body) = send(&fx, request(method.clone(), "/qr/abc", "")).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_eq!(body, "Method Not Allowed");
        }
    }

    #[tokio::test]
    async fn test_access_log_leaves_response_alone() {
        let mut fx = fixture();
        let mut config = fx.state.config.clone();
        config.logging.access_log = true;
        let (sink, delivered) = ChannelSink::new();
        fx.state = Arc::new(AppState::with_sink(config, sink));
        fx.delivered = delivered;

        let (status, ct, body) = send(&fx, request(Method::GET, "/notes.txt", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct, "text/plain");
        assert_eq!(body, "notes");

        let payload = r#"{"id":"abc","x":1,"y":2,"r":3}"#;
        let (status, _, body) = send(&fx, request(Method::POST, "/qr/abc", payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "success");
        assert!(fx.delivered.try_recv().is_ok());

        let (status, _, _) = send(&fx, request(Method::PUT, "/x", "")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/panel/index.html?tab=2")
            .header("referer", "http://localhost:3000/")
            .header("user-agent", "jit/1.0")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let peer: SocketAddr = "10.0.0.7:51000".parse().unwrap();

        let mut entry = access_entry(&req, Some(peer));
        assert_eq!(entry.remote_addr, "10.0.0.7");
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.path, "/panel/index.html");
        assert_eq!(entry.query.as_deref(), Some("tab=2"));
        assert_eq!(entry.http_version, "1.1");
        assert_eq!(entry.referer.as_deref(), Some("http://localhost:3000/"));
        assert_eq!(entry.user_agent.as_deref(), Some("jit/1.0"));

        let response = http::build_404_response("Not Found");
        record_response(&mut entry, &response, Instant::now());
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, "Not Found".len());

        let anonymous = access_entry(&req, None);
        assert_eq!(anonymous.remote_addr, "-");
    }

    #[test]
    fn test_is_script_request() {
        let uri = |s: &str| s.parse::<Uri>().unwrap();
        assert!(is_script_request(&uri("/app.js")));
        assert!(is_script_request(&uri("/deep/nested/thing.js")));
        assert!(is_script_request(&uri("/odd.json.js")));
        assert!(!is_script_request(&uri("/app.json")));
        assert!(!is_script_request(&uri("/app.js?v=1")));
        assert!(is_script_request(&uri("/page?load=x.js")));
    }
}
