use std::fs;
use std::path::Path;

use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vidqueue_engine::{
    ensure_output_dir, stream_to_file, ClientError, DirectoryWriter, FailureKind, PersistError,
    Placement, TransferError,
};

const CHUNK: usize = 64 * 1024;

fn bytes_on_disk(dir: &Path) -> u64 {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().metadata().unwrap().len())
        .sum()
}

async fn write_once(writer: &DirectoryWriter, name: &str, data: &[u8], placement: Placement) -> std::path::PathBuf {
    let mut staged = writer.stage().unwrap();
    staged.write_chunk(data).await.unwrap();
    staged.persist(name, placement).await.unwrap()
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[tokio::test]
async fn replace_overwrites_existing_entry() {
    let temp = TempDir::new().unwrap();
    let writer = DirectoryWriter::new(temp.path().to_path_buf());

    let first = write_once(&writer, "a.mp4", b"first", Placement::Replace).await;
    assert_eq!(first.file_name().unwrap(), "a.mp4");
    let second = write_once(&writer, "a.mp4", b"second", Placement::Replace).await;
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
}

#[tokio::test]
async fn keep_existing_picks_a_free_name() {
    let temp = TempDir::new().unwrap();
    let writer = DirectoryWriter::new(temp.path().to_path_buf());

    let first = write_once(&writer, "a.mp4", b"one", Placement::KeepExisting).await;
    let second = write_once(&writer, "a.mp4", b"two", Placement::KeepExisting).await;
    assert_eq!(first.file_name().unwrap(), "a.mp4");
    assert_eq!(second.file_name().unwrap(), "a (1).mp4");
    assert_eq!(fs::read(&first).unwrap(), b"one");
    assert_eq!(fs::read(&second).unwrap(), b"two");
}

#[test]
fn vanished_directory_is_not_recreated() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("granted");
    fs::create_dir(&dir).unwrap();
    let writer = DirectoryWriter::new(dir.clone());
    fs::remove_dir(&dir).unwrap();

    let err = writer.stage().unwrap_err();
    assert!(matches!(err, PersistError::OutputDir(_)));
    assert!(!dir.exists());
}

#[test]
fn no_partial_file_when_target_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = DirectoryWriter::new(file_path.clone());
    assert!(writer.stage().is_err());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn large_body_reaches_disk_while_still_arriving() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_path_buf();
    let writer = DirectoryWriter::new(dir.clone());
    let chunks = 32;

    // Before handing out chunk k, everything up to chunk k-2 must already be
    // on disk; chunk k-1 may still be in flight.
    let watched = dir.clone();
    let body = stream::unfold(0usize, move |k| {
        let watched = watched.clone();
        async move {
            if k == chunks {
                return None;
            }
            let settled = k.saturating_sub(1) * CHUNK;
            assert!(
                bytes_on_disk(&watched) >= settled as u64,
                "chunk {k} requested before earlier chunks were written"
            );
            Some((Ok::<_, ClientError>(Bytes::from(vec![k as u8; CHUNK])), k + 1))
        }
    })
    .boxed();

    let path = stream_to_file(body, &writer, "big.bin", Placement::Replace)
        .await
        .unwrap();
    let written = fs::read(&path).unwrap();
    assert_eq!(written.len(), chunks * CHUNK);
    assert_eq!(written[CHUNK * 5], 5);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
}

#[tokio::test]
async fn interrupted_body_leaves_no_entry() {
    let temp = TempDir::new().unwrap();
    let writer = DirectoryWriter::new(temp.path().to_path_buf());
    let body = stream::iter(vec![
        Ok(Bytes::from_static(b"partial")),
        Err(ClientError::new(FailureKind::Network, "connection reset")),
    ])
    .boxed();

    let err = stream_to_file(body, &writer, "a.mp4", Placement::Replace)
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::Fetch(_)));
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}
