use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("no free file name for {0}")]
    NameExhausted(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

const MAX_NAME_ATTEMPTS: usize = 1000;

/// Make sure `dir` is a writable folder, creating it when absent.
///
/// Used when a folder is granted and by the save flow; never for writes into
/// an already granted folder.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Writable if a scratch file can be created (and dropped) inside.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// How a finished file takes its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Replace any existing entry of that name.
    Replace,
    /// Never overwrite: fall back to `name (1).ext`, `name (2).ext`, ...
    KeepExisting,
}

/// Writes artifacts into one directory.
///
/// Content goes to a temp file in the same directory and is renamed into
/// place only once fully written, so a failed write never leaves a partial
/// entry behind. The directory itself is never created here: a folder that
/// disappeared means the grant is gone.
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    dir: PathBuf,
}

impl DirectoryWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Open a temp file in the directory to receive content chunk by chunk.
    pub fn stage(&self) -> Result<StagedFile, PersistError> {
        let meta = fs::metadata(&self.dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }

        let tmp = NamedTempFile::new_in(&self.dir)?;
        let file = tokio::fs::File::from_std(tmp.as_file().try_clone()?);
        Ok(StagedFile {
            dir: self.dir.clone(),
            tmp,
            file,
        })
    }
}

/// A temp file being filled. Dropping it unpersisted removes it.
#[derive(Debug)]
pub struct StagedFile {
    dir: PathBuf,
    tmp: NamedTempFile,
    file: tokio::fs::File,
}

impl StagedFile {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), PersistError> {
        self.file.write_all(chunk).await?;
        Ok(())
    }

    /// Flush to disk and move the file to its final name.
    pub async fn persist(self, filename: &str, placement: Placement) -> Result<PathBuf, PersistError> {
        let StagedFile {
            dir,
            tmp,
            mut file,
        } = self;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        let filename = filename.to_string();
        tokio::task::spawn_blocking(move || match placement {
            Placement::Replace => {
                let target = dir.join(&filename);
                tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
                Ok(target)
            }
            Placement::KeepExisting => persist_numbered(tmp, &dir, &filename),
        })
        .await
        .map_err(|err| PersistError::Io(io::Error::other(err)))?
    }
}

fn persist_numbered(
    mut tmp: NamedTempFile,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, PersistError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let target = dir.join(numbered_name(filename, attempt));
        match tmp.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                tmp = err.file;
            }
            Err(err) => return Err(PersistError::Io(err.error)),
        }
    }
    Err(PersistError::NameExhausted(filename.to_string()))
}

fn numbered_name(filename: &str, attempt: usize) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({attempt}).{ext}"),
        _ => format!("{filename} ({attempt})"),
    }
}
