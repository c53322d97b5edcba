//! HTTP response building module
//!
//! Provides builders for every status the bridge answers with, decoupled from
//! the handlers that decide which one to send.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

pub const ALLOWED_METHODS: &str = "GET, POST";

/// Build 200 response carrying a file
pub fn build_file_response(data: Bytes, content_type: &str) -> Response<Full<Bytes>> {
    let content_length = data.len();

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(data))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a plain-text response with an arbitrary status
pub fn build_text_response(status: StatusCode, message: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let body: Bytes = message.into();

    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Content-Length", body.len())
        .body(Full::new(body.clone()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(body))
        })
}

/// Build 200 `success` response for a delivered payload
pub fn build_success_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::OK, "success")
}

/// Build 404 Not Found response
pub fn build_404_response(message: impl Into<Bytes>) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, message)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", ALLOWED_METHODS)
        .body(Full::new(Bytes::from("Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("Method Not Allowed")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
}

/// Build 500 Internal Server Error response with the error detail as body
pub fn build_500_response(message: impl Into<Bytes>) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
