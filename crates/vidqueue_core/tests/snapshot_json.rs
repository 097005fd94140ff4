use vidqueue_core::{JobStatus, Snapshot};

#[test]
fn decodes_processor_status_payload() {
    let body = r#"{
        "total": 2,
        "completed": 1,
        "downloading": 0,
        "queue": [
            {"id": 1, "url": "https://youtu.be/a", "status": "Completed", "progress": 100.0,
             "filename": "a.mp4", "filepath": "/tmp/x/a.mp4"},
            {"id": 2, "url": "https://youtu.be/b", "status": "Error", "progress": 12.5,
             "error": "HTTP Error 403", "size": 1048576, "duration": "3:21"}
        ]
    }"#;

    let snapshot: Snapshot = serde_json::from_str(body).unwrap();

    assert_eq!(snapshot.total, 2);
    assert_eq!(snapshot.queue[0].status, JobStatus::Completed);
    assert_eq!(snapshot.queue[0].filename.as_deref(), Some("a.mp4"));
    assert_eq!(snapshot.queue[1].status, JobStatus::Error);
    assert_eq!(snapshot.queue[1].size.as_deref(), Some("1048576"));
    assert_eq!(snapshot.queue[1].duration.as_deref(), Some("3:21"));
}

#[test]
fn missing_fields_take_defaults() {
    let snapshot: Snapshot =
        serde_json::from_str(r#"{"queue": [{"id": 9, "status": "Queued"}]}"#).unwrap();

    assert_eq!(snapshot.total, 0);
    assert_eq!(snapshot.queue[0].progress, 0.0);
    assert_eq!(snapshot.queue[0].filename, None);

    let empty: Snapshot = serde_json::from_str("{}").unwrap();
    assert!(empty.queue.is_empty());
}

#[test]
fn unknown_status_round_trips_verbatim() {
    let snapshot: Snapshot =
        serde_json::from_str(r#"{"queue": [{"id": 1, "status": "Paused"}]}"#).unwrap();
    assert_eq!(snapshot.queue[0].status, JobStatus::Unknown("Paused".to_string()));

    let encoded = serde_json::to_string(&snapshot.queue[0].status).unwrap();
    assert_eq!(encoded, r#""Paused""#);
}
