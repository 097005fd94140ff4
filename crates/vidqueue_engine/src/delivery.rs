use std::path::PathBuf;

use engine_logging::{engine_info, engine_warn};
use vidqueue_core::{DeliveryOutcome, DeliveryRequest, DirectoryHandle, FallbackReason};

use crate::filename::safe_entry_name;
use crate::persist::{DirectoryWriter, Placement};
use crate::transfer::{stream_to_file, TransferError};
use crate::{JobProcessor, SaveTrigger};

/// Deliver one artifact: into the held folder if possible, otherwise through
/// the platform save flow. Exactly one of the two ends up running; the folder
/// write is never retried.
pub async fn deliver(
    processor: &dyn JobProcessor,
    saver: &dyn SaveTrigger,
    request: &DeliveryRequest,
) -> DeliveryOutcome {
    let reason = match &request.directory {
        None => FallbackReason::NoDirectory,
        Some(directory) => match write_to_directory(processor, directory, request).await {
            Ok(path) => {
                engine_info!(
                    "Delivered job_id={} to {}",
                    request.job_id,
                    path.display()
                );
                return DeliveryOutcome::SavedToDirectory { path };
            }
            Err(reason) => {
                engine_warn!(
                    "Folder delivery failed job_id={} dir={}: {}",
                    request.job_id,
                    directory.path().display(),
                    reason
                );
                reason
            }
        },
    };

    let url = processor.artifact_url(request.job_id);
    engine_info!(
        "Fallback save job_id={} url={} name={:?} ({})",
        request.job_id,
        url,
        request.filename,
        reason
    );
    saver.save(request.job_id, &url, &request.filename).await;
    DeliveryOutcome::FallbackTriggered { reason }
}

async fn write_to_directory(
    processor: &dyn JobProcessor,
    directory: &DirectoryHandle,
    request: &DeliveryRequest,
) -> Result<PathBuf, FallbackReason> {
    let body = processor
        .open_artifact(request.job_id)
        .await
        .map_err(|err| FallbackReason::FetchFailed(err.to_string()))?;

    let writer = DirectoryWriter::new(directory.path().to_path_buf());
    let name = safe_entry_name(&request.filename, request.job_id);
    stream_to_file(body, &writer, &name, Placement::Replace)
        .await
        .map_err(|err| match err {
            TransferError::Fetch(err) => FallbackReason::FetchFailed(err.to_string()),
            TransferError::Write(err) => FallbackReason::WriteFailed(err.to_string()),
        })
}
