//! Request handler module
//!
//! Responsible for request routing dispatch and the two leaf handlers:
//! static file serving and marker ingest.

pub mod ingest;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
