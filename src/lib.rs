//! Webroot - minimal static file server
//!
//! Serves the contents of a root directory over a small subset of HTTP/1.1,
//! one connection at a time.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
