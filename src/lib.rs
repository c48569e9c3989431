//! searchd - static file and search server
//!
//! A small HTTP/1.1 server: `/static/...` serves files from a directory and
//! every other URI renders a search page backed by in-memory indices.

pub mod config;
pub mod http;
pub mod router;
pub mod search;
pub mod server;
