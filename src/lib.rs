//! Quickserve: a minimal development-time HTTP static file server.
//!
//! Maps request paths to files under a public directory, streams the bytes
//! back with the right `Content-Type` and `Content-Length`, and keeps the
//! most recent POST-submitted form in an in-memory single-slot store.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
