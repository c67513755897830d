//! Per-request failure taxonomy
//!
//! Every variant is resolved inside the connection that produced it; each maps
//! to exactly one response status.

use std::path::PathBuf;

use thiserror::Error;

use crate::http::parser::ParseError;
use crate::http::request::Method;
use crate::http::response::StatusCode;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] ParseError),

    #[error("method {0} is not allowed")]
    UnsupportedMethod(Method),

    /// Reported as a plain 404 so it cannot be told apart from a missing file.
    #[error("path {0:?} contains a parent segment")]
    PathTraversal(String),

    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to generate listing for {}: {source}", .path.display())]
    IndexGeneration {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::MalformedRequest(_) => StatusCode::BadRequest,
            ServeError::UnsupportedMethod(_) => StatusCode::MethodNotAllowed,
            ServeError::PathTraversal(_) | ServeError::NotFound(_) => StatusCode::NotFound,
            ServeError::ReadFailure { .. } | ServeError::IndexGeneration { .. } => {
                StatusCode::InternalServerError
            }
        }
    }
}
