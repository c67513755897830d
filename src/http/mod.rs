//! HTTP protocol implementation.
//!
//! This module implements the strict HTTP/1.1 subset the server speaks: one
//! request per connection, GET and HEAD only, `Connection: close` always.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine (one read, one write, close)
//! - **`parser`**: Staged request validator and method/path extraction
//! - **`request`**: Methods and the parsed request
//! - **`handler`**: Maps a parsed request to a response using the web root
//! - **`response`**: The five fixed-shape responses and their builder
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: Content-Type detection through an external sniffer
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Accepted   │
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Reading   │ ← One bounded read; that is the whole request
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐  invalid → 400, not GET/HEAD → 405
//!        │   Parsed    │ ─────────────────────────────────┐
//!        └──────┬──────┘                                  │
//!               ▼                                         │
//!        ┌─────────────┐                                  │
//!        │  Resolving  │ ← Filesystem, index, sniffer     │
//!        └──────┬──────┘   (blocking pool)                │
//!               ▼                                         │
//!        ┌─────────────┐                                  │
//!        │ Responding  │ ◄────────────────────────────────┘
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Closed    │
//!        └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rootserve::config::Config;
//! use rootserve::http::connection::Connection;
//! use rootserve::http::handler::RequestHandler;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let handler = Arc::new(RequestHandler::from_config(&config));
//!     let listener = TcpListener::bind(config.bind_addr()).await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, handler, 1024);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod handler;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
