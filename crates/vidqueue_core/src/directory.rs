use std::fmt;
use std::path::{Path, PathBuf};

/// A folder the user granted write access to for this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryHandle {
    path: PathBuf,
}

impl DirectoryHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short name for display; falls back to the full path for roots.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Why the directory chooser did not produce a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickError {
    /// The user dismissed the chooser. Never surfaced.
    Cancelled,
    /// The platform has no directory chooser.
    Unsupported,
    Failed(String),
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickError::Cancelled => write!(f, "cancelled"),
            PickError::Unsupported => write!(f, "directory picker unsupported"),
            PickError::Failed(reason) => write!(f, "directory picker failed: {reason}"),
        }
    }
}

impl std::error::Error for PickError {}
