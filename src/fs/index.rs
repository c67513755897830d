//! Directory indexes
//!
//! A directory is served through its own `index.html` when one exists.
//! Otherwise an HTML listing of the subtree is generated on the fly by an
//! external tool and returned without being written anywhere.

use std::net::{IpAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use anyhow::{Context, bail};

use crate::config::{BindHost, Config};
use crate::error::ServeError;

pub const INDEX_FILE: &str = "index.html";

/// Produces an HTML listing for a directory subtree.
pub trait DirectoryLister: Send + Sync {
    /// `base_url` is the `http://host:port/path` prefix for generated links.
    fn list(&self, dir: &Path, base_url: &str) -> anyhow::Result<Vec<u8>>;
}

/// Runs `tree <dir> -C -H <base_url> --noreport`.
#[derive(Debug, Clone)]
pub struct TreeLister {
    program: String,
}

impl TreeLister {
    pub fn new() -> Self {
        Self::with_program("tree")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for TreeLister {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryLister for TreeLister {
    fn list(&self, dir: &Path, base_url: &str) -> anyhow::Result<Vec<u8>> {
        let output = Command::new(&self.program)
            .arg(dir)
            .args(["-C", "-H", base_url, "--noreport"])
            .output()
            .with_context(|| format!("failed to run `{}`", self.program))?;

        if !output.status.success() {
            bail!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(output.stdout)
    }
}

/// Host and port written into generated listing links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingBase {
    host: String,
    port: u16,
}

impl ListingBase {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Loopback binds keep their own name; anything else, including the
    /// all-interfaces bind, advertises this machine's resolved address.
    pub fn from_config(config: &Config) -> Self {
        let host = if config.host.is_loopback() {
            config.host.socket_host().to_string()
        } else {
            match local_address() {
                Some(ip) => ip.to_string(),
                None => {
                    let fallback = match &config.host {
                        BindHost::All => "127.0.0.1".to_string(),
                        BindHost::Named(h) => h.clone(),
                    };
                    tracing::warn!(host = %fallback, "Could not resolve local address for listing links");
                    fallback
                }
            }
        };
        Self::new(host, config.port)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Base URL for a directory request; one trailing `/` is dropped since the
    /// listing tool adds its own.
    pub fn for_directory(&self, path: &str) -> String {
        let path = path.strip_suffix('/').unwrap_or(path);
        format!("http://{}:{}{}", self.host, self.port, path)
    }

    /// Base URL for the whole-root listing written at startup.
    pub fn for_root(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// This machine's address as resolved from its hostname, preferring IPv4.
fn local_address() -> Option<IpAddr> {
    let output = Command::new("hostname").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() {
        return None;
    }

    let addrs: Vec<IpAddr> = (name.as_str(), 0)
        .to_socket_addrs()
        .ok()?
        .map(|a| a.ip())
        .collect();
    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

/// Resolves directories to index bytes.
#[derive(Clone)]
pub struct DirectoryIndex {
    root: PathBuf,
    base: ListingBase,
    lister: Arc<dyn DirectoryLister>,
}

impl DirectoryIndex {
    pub fn new(root: impl Into<PathBuf>, base: ListingBase, lister: Arc<dyn DirectoryLister>) -> Self {
        Self {
            root: root.into(),
            base,
            lister,
        }
    }

    pub fn base(&self) -> &ListingBase {
        &self.base
    }

    /// Index bytes for the directory at request path `path`.
    ///
    /// Prefers `<dir>/index.html`; on any failure to read it falls back to a
    /// generated listing of the subtree.
    pub fn load(&self, path: &str) -> Result<Vec<u8>, ServeError> {
        let dir = self.root.join(path.trim_start_matches('/'));

        match std::fs::read(dir.join(INDEX_FILE)) {
            Ok(body) => return Ok(body),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "No index document, generating listing");
            }
        }

        let base_url = self.base.for_directory(path);
        self.lister
            .list(&dir, &base_url)
            .map_err(|source| ServeError::IndexGeneration { path: dir, source })
    }

    /// Regenerates the listing for the whole root and writes it to the
    /// root's `index.html`, replacing whatever is there.
    pub fn refresh_root(&self) -> anyhow::Result<()> {
        let listing = self.lister.list(&self.root, &self.base.for_root())?;
        let target = self.root.join(INDEX_FILE);
        std::fs::write(&target, &listing)
            .with_context(|| format!("failed to write {}", target.display()))?;

        tracing::info!(path = %target.display(), bytes = listing.len(), "Root index refreshed");
        Ok(())
    }
}

impl std::fmt::Debug for DirectoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryIndex")
            .field("root", &self.root)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
