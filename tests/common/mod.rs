//! Shared fixtures: a throwaway web root and deterministic collaborators.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rootserve::config::{BindHost, Config};
use rootserve::fs::index::{DirectoryLister, ListingBase};
use rootserve::http::handler::RequestHandler;
use rootserve::http::mime::ContentTypeResolver;
use tempfile::TempDir;

/// 17 bytes.
pub const ROOT_INDEX: &[u8] = b"<h1>Webroot</h1>\n";
pub const DOC1: &[u8] = b"abc\n";
pub const LISTING: &[u8] = b"<html><body>listing</body></html>\n";

/// Records every call and answers with a fixed listing (or an error).
pub struct FakeLister {
    output: Option<Vec<u8>>,
    pub calls: Mutex<Vec<(PathBuf, String)>>,
}

impl FakeLister {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            output: Some(LISTING.to_vec()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            output: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl DirectoryLister for FakeLister {
    fn list(&self, dir: &Path, base_url: &str) -> anyhow::Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push((dir.to_path_buf(), base_url.to_string()));
        self.output
            .clone()
            .ok_or_else(|| anyhow::anyhow!("listing tool unavailable"))
    }
}

/// Content type from the extension; unknown extensions fail the lookup.
pub struct ExtensionSniffer;

impl ContentTypeResolver for ExtensionSniffer {
    fn sniff(&self, path: &Path) -> anyhow::Result<String> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("txt") => Ok("text/plain".to_string()),
            Some("html") => Ok("text/html".to_string()),
            Some("png") => Ok("image/png".to_string()),
            _ => anyhow::bail!("cannot sniff {}", path.display()),
        }
    }
}

/// Root with `index.html` and `site1/doc1.txt`; `site1` has no index.
pub fn webroot() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), ROOT_INDEX).unwrap();
    std::fs::create_dir(dir.path().join("site1")).unwrap();
    std::fs::write(dir.path().join("site1/doc1.txt"), DOC1).unwrap();
    dir
}

pub fn config(root: &Path) -> Config {
    Config {
        host: BindHost::Named("localhost".to_string()),
        port: 8080,
        root: root.to_path_buf(),
        ..Config::default()
    }
}

pub fn handler_with(config: &Config, lister: Arc<FakeLister>) -> RequestHandler {
    RequestHandler::with_listing_base(
        config,
        ListingBase::new("localhost", config.port),
        lister,
        Arc::new(ExtensionSniffer),
    )
}

pub fn get(path: &str) -> Vec<u8> {
    format!("GET {} HTTP/1.1\r\nHost: localhost:8080\r\n\r\n", path).into_bytes()
}

pub fn head(path: &str) -> Vec<u8> {
    format!("HEAD {} HTTP/1.1\r\nHost: localhost:8080\r\n\r\n", path).into_bytes()
}
