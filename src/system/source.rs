use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_PROC_ROOT: &str = "/proc";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed {path}: {detail}")]
    Malformed { path: PathBuf, detail: String },
}

impl SourceError {
    /// True when the file is simply gone, e.g. a process that exited.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::Unavailable { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    pub fn malformed(path: &Path, detail: impl Into<String>) -> Self {
        SourceError::Malformed {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }
}

/// A proc filesystem mount point. Tests point this at a fixture directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcRoot {
    root: PathBuf,
}

impl Default for ProcRoot {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn pid_file(&self, pid: u32, name: &str) -> PathBuf {
        self.root.join(pid.to_string()).join(name)
    }

    pub fn read(&self, path: &Path) -> Result<String, SourceError> {
        std::fs::read_to_string(path).map_err(|source| SourceError::Unavailable {
            path: path.to_path_buf(),
            source,
        })
    }
}
