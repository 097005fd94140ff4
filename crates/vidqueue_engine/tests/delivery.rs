use std::fs;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vidqueue_core::{DeliveryOutcome, DeliveryRequest, DirectoryHandle, FallbackReason, JobId};
use vidqueue_engine::{deliver, ProcessorSettings, ReqwestProcessor, SaveTrigger};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default, Clone)]
struct RecordingSave {
    calls: Arc<Mutex<Vec<(JobId, String, String)>>>,
}

impl RecordingSave {
    fn calls(&self) -> Vec<(JobId, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SaveTrigger for RecordingSave {
    async fn save(&self, job_id: JobId, url: &str, suggested_name: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((job_id, url.to_string(), suggested_name.to_string()));
    }
}

fn processor_for(server: &MockServer) -> ReqwestProcessor {
    ReqwestProcessor::new(ProcessorSettings {
        base_url: format!("{}/api", server.uri()),
        ..ProcessorSettings::default()
    })
    .unwrap()
}

fn request(job_id: u64, filename: &str, directory: Option<DirectoryHandle>) -> DeliveryRequest {
    DeliveryRequest {
        job_id,
        filename: filename.to_string(),
        directory,
    }
}

#[tokio::test]
async fn without_directory_triggers_save_flow() {
    let server = MockServer::start().await;
    let processor = processor_for(&server);
    let saver = RecordingSave::default();

    let outcome = deliver(&processor, &saver, &request(7, "a.mp4", None)).await;

    assert_eq!(
        outcome,
        DeliveryOutcome::FallbackTriggered {
            reason: FallbackReason::NoDirectory
        }
    );
    assert_eq!(
        saver.calls(),
        vec![(
            7,
            format!("{}/api/download/7", server.uri()),
            "a.mp4".to_string()
        )]
    );
    // Nothing was fetched by the delivery itself.
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn writes_into_granted_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/7"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"movie".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let saver = RecordingSave::default();

    let outcome = deliver(
        &processor_for(&server),
        &saver,
        &request(7, "a.mp4", Some(DirectoryHandle::new(temp.path()))),
    )
    .await;

    let target = temp.path().join("a.mp4");
    assert_eq!(
        outcome,
        DeliveryOutcome::SavedToDirectory {
            path: target.clone()
        }
    );
    assert_eq!(fs::read(&target).unwrap(), b"movie");
    assert!(saver.calls().is_empty());
}

#[tokio::test]
async fn failed_fetch_falls_back_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/9"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let saver = RecordingSave::default();

    let outcome = deliver(
        &processor_for(&server),
        &saver,
        &request(9, "b.mp4", Some(DirectoryHandle::new(temp.path()))),
    )
    .await;

    assert!(matches!(
        outcome,
        DeliveryOutcome::FallbackTriggered {
            reason: FallbackReason::FetchFailed(_)
        }
    ));
    assert_eq!(
        saver.calls(),
        vec![(
            9,
            format!("{}/api/download/9", server.uri()),
            "b.mp4".to_string()
        )]
    );
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn vanished_directory_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"movie".to_vec()))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let gone = temp.path().join("gone");
    let saver = RecordingSave::default();

    let outcome = deliver(
        &processor_for(&server),
        &saver,
        &request(4, "c.mp4", Some(DirectoryHandle::new(&gone))),
    )
    .await;

    assert!(matches!(
        outcome,
        DeliveryOutcome::FallbackTriggered {
            reason: FallbackReason::WriteFailed(_)
        }
    ));
    assert_eq!(saver.calls().len(), 1);
    assert!(!gone.exists());
}

#[tokio::test]
async fn hostile_filename_stays_inside_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/5"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let inner = temp.path().join("inner");
    fs::create_dir(&inner).unwrap();

    let outcome = deliver(
        &processor_for(&server),
        &RecordingSave::default(),
        &request(5, "../escape.mp4", Some(DirectoryHandle::new(&inner))),
    )
    .await;

    assert_eq!(
        outcome,
        DeliveryOutcome::SavedToDirectory {
            path: inner.join("escape.mp4")
        }
    );
    assert!(!temp.path().join("escape.mp4").exists());
}

#[tokio::test]
async fn oversized_artifact_goes_to_save_flow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/6"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 4096]))
        .mount(&server)
        .await;
    let processor = ReqwestProcessor::new(ProcessorSettings {
        base_url: format!("{}/api", server.uri()),
        max_artifact_bytes: 1024,
        ..ProcessorSettings::default()
    })
    .unwrap();
    let temp = TempDir::new().unwrap();
    let saver = RecordingSave::default();

    let outcome = deliver(
        &processor,
        &saver,
        &request(6, "big.mp4", Some(DirectoryHandle::new(temp.path()))),
    )
    .await;

    assert!(matches!(
        outcome,
        DeliveryOutcome::FallbackTriggered {
            reason: FallbackReason::FetchFailed(_)
        }
    ));
    assert_eq!(saver.calls().len(), 1);
    assert_eq!(saver.calls()[0].0, 6);
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}
