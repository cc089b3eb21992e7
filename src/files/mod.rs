//! Filesystem side of the server
//!
//! Maps request targets onto entries below the configured root directory.

pub mod resolver;

pub use resolver::{ResolveError, Resolver, Resource};
