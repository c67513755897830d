//! Request-to-response decisions
//!
//! Everything here is synchronous and touches the filesystem or spawns the
//! external collaborators, so the connection runs it on the blocking pool.

use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::error::ServeError;
use crate::fs::index::{DirectoryIndex, DirectoryLister, ListingBase, TreeLister};
use crate::fs::resolver::{ResourceKind, ResourceResolver, has_parent_segment};
use crate::http::mime::{ContentTypeResolver, FileCommandSniffer, content_type_for};
use crate::http::parser::{HostRule, ParseError, parse_http_request};
use crate::http::request::{Method, Request};
use crate::http::response::Response;

const DIRECTORY_CONTENT_TYPE: &str = "text/html";

pub struct RequestHandler {
    host_rule: HostRule,
    resolver: ResourceResolver,
    index: DirectoryIndex,
    mime: Arc<dyn ContentTypeResolver>,
}

impl RequestHandler {
    pub fn new(
        config: &Config,
        lister: Arc<dyn DirectoryLister>,
        mime: Arc<dyn ContentTypeResolver>,
    ) -> Self {
        let base = ListingBase::from_config(config);
        Self::with_listing_base(config, base, lister, mime)
    }

    /// Like [`RequestHandler::new`] but with explicit listing link host/port.
    pub fn with_listing_base(
        config: &Config,
        base: ListingBase,
        lister: Arc<dyn DirectoryLister>,
        mime: Arc<dyn ContentTypeResolver>,
    ) -> Self {
        Self {
            host_rule: config.host_rule(),
            resolver: ResourceResolver::new(&config.root),
            index: DirectoryIndex::new(&config.root, base, lister),
            mime,
        }
    }

    /// Handler backed by the `tree` and `file` tools.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config,
            Arc::new(TreeLister::new()),
            Arc::new(FileCommandSniffer::new()),
        )
    }

    pub fn index(&self) -> &DirectoryIndex {
        &self.index
    }

    pub fn parse(&self, buf: &[u8]) -> Request {
        parse_http_request(buf, &self.host_rule)
    }

    /// Rejects invalid requests (400) and anything but GET/HEAD (405).
    pub fn admit<'r>(&self, request: &'r Request) -> Result<(Method, &'r str), ServeError> {
        if let Err(e) = &request.verdict {
            return Err(ServeError::MalformedRequest(e.clone()));
        }
        let (method, path) = request
            .target()
            .ok_or(ServeError::MalformedRequest(ParseError::InvalidRequestLine))?;
        if !method.is_servable() {
            return Err(ServeError::UnsupportedMethod(method));
        }
        Ok((method, path))
    }

    /// Serves an admitted GET or HEAD.
    pub fn serve(&self, method: Method, path: &str) -> Result<Response, ServeError> {
        if has_parent_segment(path) {
            return Err(ServeError::PathTraversal(path.to_string()));
        }

        let send_body = method == Method::GET;
        let resource = self.resolver.resolve(path);

        match resource.kind {
            ResourceKind::Missing => Err(ServeError::NotFound(resource.location)),
            ResourceKind::Directory => {
                let body = self.index.load(path)?;
                Ok(Response::ok(DIRECTORY_CONTENT_TYPE, body, send_body))
            }
            ResourceKind::File => {
                let body = read_file(&resource.location)?;
                let content_type = content_type_for(self.mime.as_ref(), &resource.location);
                Ok(Response::ok(&content_type, body, send_body))
            }
        }
    }

    /// Full exchange for one raw request buffer.
    pub fn respond(&self, buf: &[u8]) -> Response {
        let request = self.parse(buf);
        self.admit(&request)
            .and_then(|(method, path)| self.serve(method, path))
            .unwrap_or_else(|e| Response::from_error(&e))
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, ServeError> {
    let mut file = std::fs::File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ServeError::NotFound(path.to_path_buf()),
        _ => ServeError::ReadFailure {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let mut body = Vec::new();
    file.read_to_end(&mut body)
        .map_err(|source| ServeError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(body)
}
