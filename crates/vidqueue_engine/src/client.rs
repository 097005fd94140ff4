use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use url::Url;
use vidqueue_core::{JobId, Snapshot};

use crate::{ClientError, FailureKind};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// An artifact body as it arrives from the network.
pub type ArtifactStream = BoxStream<'static, Result<Bytes, ClientError>>;

#[derive(Debug, Clone)]
pub struct ProcessorSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to the JSON endpoints.
    pub request_timeout: Duration,
    /// Applies to artifact downloads, which can be large.
    pub artifact_timeout: Duration,
    /// Disk guard for folder deliveries; bodies are streamed, not buffered.
    pub max_artifact_bytes: u64,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            artifact_timeout: Duration::from_secs(30 * 60),
            max_artifact_bytes: 8 * 1024 * 1024 * 1024,
        }
    }
}

/// The remote job processor's HTTP contract.
///
/// Every queue operation answers with the full snapshot.
#[async_trait::async_trait]
pub trait JobProcessor: Send + Sync {
    async fn status(&self) -> Result<Snapshot, ClientError>;

    async fn submit_links(&self, urls: &[String]) -> Result<Snapshot, ClientError>;

    async fn upload_batch(&self, file_name: &str, contents: Vec<u8>)
        -> Result<Snapshot, ClientError>;

    async fn clear(&self) -> Result<Snapshot, ClientError>;

    /// Open an artifact download. Chunks are yielded as they arrive; the
    /// body is never collected in memory.
    async fn open_artifact(&self, job_id: JobId) -> Result<ArtifactStream, ClientError>;

    /// Direct reference to an artifact, for the platform save flow.
    fn artifact_url(&self, job_id: JobId) -> String;
}

#[derive(Debug, Clone)]
pub struct ReqwestProcessor {
    settings: ProcessorSettings,
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestProcessor {
    pub fn new(settings: ProcessorSettings) -> Result<Self, ClientError> {
        let parsed = Url::parse(&settings.base_url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {}", parsed.scheme()),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            settings,
            client,
        })
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_for_snapshot(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Snapshot, ClientError> {
        let response = request
            .timeout(self.settings.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobProcessor for ReqwestProcessor {
    async fn status(&self) -> Result<Snapshot, ClientError> {
        self.send_for_snapshot(self.client.get(self.endpoint("/status")))
            .await
    }

    async fn submit_links(&self, urls: &[String]) -> Result<Snapshot, ClientError> {
        let body = serde_json::to_vec(&serde_json::json!({ "urls": urls }))
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))?;
        let request = self
            .client
            .post(self.endpoint("/queue"))
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.send_for_snapshot(request).await
    }

    async fn upload_batch(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<Snapshot, ClientError> {
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/plain")
            .map_err(map_reqwest_error)?;
        let form = Form::new().part("file", part);
        let request = self.client.post(self.endpoint("/upload")).multipart(form);
        self.send_for_snapshot(request).await
    }

    async fn clear(&self) -> Result<Snapshot, ClientError> {
        self.send_for_snapshot(self.client.post(self.endpoint("/clear")))
            .await
    }

    async fn open_artifact(&self, job_id: JobId) -> Result<ArtifactStream, ClientError> {
        let response = self
            .client
            .get(self.artifact_url(job_id))
            .timeout(self.settings.artifact_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;
        body_stream(response, Some(self.settings.max_artifact_bytes))
    }

    fn artifact_url(&self, job_id: JobId) -> String {
        self.endpoint(&format!("/download/{job_id}"))
    }
}

pub(crate) fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    Ok(response)
}

/// Hand the body on chunk by chunk; with a `max_bytes` guard the stream
/// ends in `TooLarge` as soon as the running total passes it.
pub(crate) fn body_stream(
    response: reqwest::Response,
    max_bytes: Option<u64>,
) -> Result<ArtifactStream, ClientError> {
    if let (Some(max_bytes), Some(content_len)) = (max_bytes, response.content_length()) {
        if content_len > max_bytes {
            return Err(too_large(max_bytes, Some(content_len)));
        }
    }

    let mut received: u64 = 0;
    let stream = response.bytes_stream().map(move |chunk| {
        let chunk = chunk.map_err(map_reqwest_error)?;
        received += chunk.len() as u64;
        match max_bytes {
            Some(max_bytes) if received > max_bytes => Err(too_large(max_bytes, Some(received))),
            _ => Ok(chunk),
        }
    });
    Ok(stream.boxed())
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> ClientError {
    ClientError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ClientError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
