//! rootserve - one-shot static file server
//!
//! Serves GET/HEAD for a single web root over a strict subset of HTTP/1.1.

pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod server;
