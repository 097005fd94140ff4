use std::path::PathBuf;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use vidqueue_core::JobId;

use crate::client::{body_stream, ensure_success, map_reqwest_error};
use crate::filename::safe_entry_name;
use crate::persist::{ensure_output_dir, DirectoryWriter, Placement};
use crate::transfer::stream_to_file;

/// The platform's own save flow: given a direct reference and a suggested
/// name, the platform takes it from there. Nothing is reported back.
#[async_trait::async_trait]
pub trait SaveTrigger: Send + Sync {
    async fn save(&self, job_id: JobId, url: &str, suggested_name: &str);
}

/// Saves into a fixed downloads folder, never overwriting: a taken name gets
/// a ` (n)` suffix the way browsers do.
///
/// No size cap: this is the path of last resort.
#[derive(Debug, Clone)]
pub struct DownloadsFolderSave {
    client: reqwest::Client,
    dir: PathBuf,
    timeout: Duration,
}

impl DownloadsFolderSave {
    pub fn new(dir: PathBuf, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            dir,
            timeout,
        }
    }

    async fn download(
        &self,
        job_id: JobId,
        url: &str,
        suggested_name: &str,
    ) -> Result<PathBuf, String> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err).to_string())?;
        let body = ensure_success(response)
            .and_then(|response| body_stream(response, None))
            .map_err(|err| err.to_string())?;

        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || ensure_output_dir(&dir))
            .await
            .map_err(|err| err.to_string())?
            .map_err(|err| err.to_string())?;

        let name = safe_entry_name(suggested_name, job_id);
        let writer = DirectoryWriter::new(self.dir.clone());
        stream_to_file(body, &writer, &name, Placement::KeepExisting)
            .await
            .map_err(|err| err.to_string())
    }
}

#[async_trait::async_trait]
impl SaveTrigger for DownloadsFolderSave {
    async fn save(&self, job_id: JobId, url: &str, suggested_name: &str) {
        match self.download(job_id, url, suggested_name).await {
            Ok(path) => engine_info!("Saved job_id={} to {}", job_id, path.display()),
            Err(err) => engine_warn!(
                "Save of job_id={} from {} as {:?} failed: {}",
                job_id,
                url,
                suggested_name,
                err
            ),
        }
    }
}
