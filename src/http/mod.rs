//! HTTP protocol implementation.
//!
//! A deliberately small subset of HTTP/1.1: one request per connection,
//! GET only, and responses that are closed rather than length-delimited.
//!
//! # Architecture
//!
//! - **`connection`**: Drives a single connection through the request-response state machine
//! - **`parser`**: Request line parsing and request framing helpers
//! - **`request`**: Parsed request line and HTTP methods
//! - **`response`**: Status codes and the response constructors
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: Media type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer the request head (and any declared body)
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Parsing   │ ── non-GET ──────────────┐
//!        └──────┬──────┘                          │
//!               ▼                                 │
//!        ┌─────────────┐                          │
//!        │  Resolving  │ ── missing ──────────────┤
//!        └──────┬──────┘                          │
//!               ▼                                 ▼
//!        ┌──────────────────────────────────────────┐
//!        │                Responding                │
//!        └──────────────────┬───────────────────────┘
//!                           ▼
//!                        Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
