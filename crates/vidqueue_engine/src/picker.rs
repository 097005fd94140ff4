use std::path::{Path, PathBuf};

use engine_logging::engine_debug;
use vidqueue_core::{DirectoryHandle, PickError};

use crate::persist::ensure_output_dir;

/// Platform directory chooser with read/write intent.
#[async_trait::async_trait]
pub trait DirectoryPicker: Send + Sync {
    /// `requested` is whatever the user answered; `None` means no answer.
    async fn pick(&self, requested: Option<&Path>) -> Result<DirectoryHandle, PickError>;
}

/// Grants the folder the user typed, creating it if needed and probing that
/// it is writable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathPicker;

#[async_trait::async_trait]
impl DirectoryPicker for PathPicker {
    async fn pick(&self, requested: Option<&Path>) -> Result<DirectoryHandle, PickError> {
        let Some(requested) = requested.filter(|path| !path.as_os_str().is_empty()) else {
            return Err(PickError::Cancelled);
        };
        let requested: PathBuf = requested.to_path_buf();

        let granted = tokio::task::spawn_blocking(move || -> Result<PathBuf, PickError> {
            ensure_output_dir(&requested).map_err(|err| PickError::Failed(err.to_string()))?;
            std::fs::canonicalize(&requested).map_err(|err| PickError::Failed(err.to_string()))
        })
        .await
        .map_err(|err| PickError::Failed(err.to_string()))??;

        engine_debug!("Directory granted: {}", granted.display());
        Ok(DirectoryHandle::new(granted))
    }
}

/// For platforms without a chooser; every pick is unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPicker;

#[async_trait::async_trait]
impl DirectoryPicker for DisabledPicker {
    async fn pick(&self, _requested: Option<&Path>) -> Result<DirectoryHandle, PickError> {
        Err(PickError::Unsupported)
    }
}
