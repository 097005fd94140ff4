use std::path::PathBuf;

use futures_util::StreamExt;
use thiserror::Error;

use crate::client::ArtifactStream;
use crate::persist::{DirectoryWriter, PersistError, Placement};
use crate::ClientError;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("{0}")]
    Fetch(#[from] ClientError),
    #[error("{0}")]
    Write(#[from] PersistError),
}

/// Copy a body into `writer`'s folder one chunk at a time; at most one
/// chunk is held in memory. The entry only appears once the body ended.
pub async fn stream_to_file(
    mut body: ArtifactStream,
    writer: &DirectoryWriter,
    filename: &str,
    placement: Placement,
) -> Result<PathBuf, TransferError> {
    let mut staged = writer.stage()?;
    while let Some(chunk) = body.next().await {
        staged.write_chunk(&chunk?).await?;
    }
    Ok(staged.persist(filename, placement).await?)
}
