//! Content-Type detection
//!
//! Types are sniffed from file contents by an external tool rather than
//! guessed from the extension. The lookup is best effort: anything that goes
//! wrong falls back to [`FALLBACK_CONTENT_TYPE`].

use std::path::Path;
use std::process::Command;

use anyhow::{Context, bail};

pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Source of a content type for a file on disk.
pub trait ContentTypeResolver: Send + Sync {
    fn sniff(&self, path: &Path) -> anyhow::Result<String>;
}

/// Runs `file --mime-type -b <path>`.
#[derive(Debug, Clone)]
pub struct FileCommandSniffer {
    program: String,
}

impl FileCommandSniffer {
    pub fn new() -> Self {
        Self::with_program("file")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FileCommandSniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTypeResolver for FileCommandSniffer {
    fn sniff(&self, path: &Path) -> anyhow::Result<String> {
        let output = Command::new(&self.program)
            .arg("--mime-type")
            .arg("-b")
            .arg(path)
            .output()
            .with_context(|| format!("failed to run `{}`", self.program))?;

        if !output.status.success() {
            bail!("`{}` exited with {}", self.program, output.status);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Content type for `path`, or the generic binary type when the lookup fails
/// or comes back empty.
pub fn content_type_for(resolver: &dyn ContentTypeResolver, path: &Path) -> String {
    match resolver.sniff(path) {
        Ok(ct) if !ct.trim().is_empty() => ct.trim().to_string(),
        Ok(_) => FALLBACK_CONTENT_TYPE.to_string(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Content type lookup failed");
            FALLBACK_CONTENT_TYPE.to_string()
        }
    }
}
