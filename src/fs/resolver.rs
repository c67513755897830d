use std::path::{Path, PathBuf};

/// What a request path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Directory,
    Missing,
}

/// A request path resolved against the web root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub kind: ResourceKind,
    /// `root + path`; meaningless when the path had a parent segment
    pub location: PathBuf,
}

/// Classifies request paths under a fixed root.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    root: PathBuf,
}

impl ResourceResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of a request path, without touching the disk.
    pub fn location(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Resolves `path` against the live filesystem.
    ///
    /// Paths with a `..` segment are always `Missing`, whatever exists on disk.
    pub fn resolve(&self, path: &str) -> Resource {
        let location = self.location(path);

        let kind = if has_parent_segment(path) {
            ResourceKind::Missing
        } else {
            match std::fs::metadata(&location) {
                Ok(meta) if meta.is_dir() => ResourceKind::Directory,
                Ok(meta) if meta.is_file() => ResourceKind::File,
                _ => ResourceKind::Missing,
            }
        };

        Resource { kind, location }
    }
}

/// True if any `/`-separated segment is exactly `..`.
pub fn has_parent_segment(path: &str) -> bool {
    path.split('/').any(|segment| segment == "..")
}
