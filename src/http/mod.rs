//! HTTP protocol layer module
//!
//! Content-type detection and response builders shared by the static file
//! server and the ingest handler.

pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_404_response, build_405_response, build_413_response, build_500_response,
    build_file_response, build_success_response, build_text_response,
};
