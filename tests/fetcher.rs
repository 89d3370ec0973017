//! Integration tests for the artifact fetcher against a local HTTP server

mod common;

use std::sync::Mutex;

use tempfile::tempdir;

use common::{matches_pattern, Reply, TestServer};
use fooocus_launcher::app::{
    ArtifactFetcher, ClientConfig, FetchOutcome, NoProgress, RemoteArtifact, TransferProgress,
};
use fooocus_launcher::auth::Credential;
use fooocus_launcher::errors::DownloadError;

#[derive(Default)]
struct RecordingProgress {
    total: Mutex<Option<Option<u64>>>,
    advanced: Mutex<u64>,
    finished: Mutex<bool>,
}

impl TransferProgress for RecordingProgress {
    fn start(&self, total: Option<u64>) {
        *self.total.lock().unwrap() = Some(total);
    }
    fn advance(&self, bytes: u64) {
        assert!(bytes as usize <= 8 * 1024, "chunks are at most 8 KiB");
        *self.advanced.lock().unwrap() += bytes;
    }
    fn finish(&self) {
        *self.finished.lock().unwrap() = true;
    }
}

fn fetcher(credential: Option<Credential>) -> ArtifactFetcher {
    ArtifactFetcher::from_config(&ClientConfig::default(), credential).unwrap()
}

#[tokio::test]
async fn test_download_creates_parents_and_writes_every_byte() {
    let server = TestServer::start(Reply::body(1024 * 1024 + 17)).await;
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("models/checkpoints/model.safetensors");
    let artifact = RemoteArtifact::new(&server.url("model.safetensors"), &path).unwrap();
    let progress = RecordingProgress::default();

    let outcome = fetcher(None).ensure(&artifact, &progress).await.unwrap();

    let expected = 1024 * 1024 + 17;
    assert_eq!(outcome, FetchOutcome::Downloaded { bytes: expected });
    let data = std::fs::read(&path).unwrap();
    assert_eq!(data.len() as u64, expected);
    assert!(matches_pattern(&data));
    assert!(!artifact.partial_path().exists());

    assert_eq!(*progress.total.lock().unwrap(), Some(Some(expected)));
    assert_eq!(*progress.advanced.lock().unwrap(), expected);
    assert!(*progress.finished.lock().unwrap());
}

#[tokio::test]
async fn test_bearer_header_sent_when_credential_set() {
    let server = TestServer::start(Reply::body(64)).await;
    let temp_dir = tempdir().unwrap();
    let artifact =
        RemoteArtifact::new(&server.url("gated.bin"), temp_dir.path().join("gated.bin")).unwrap();

    fetcher(Credential::new("hf_secret_token"))
        .ensure(&artifact, &NoProgress)
        .await
        .unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].request_line.starts_with("GET /gated.bin"));
    assert_eq!(
        requests[0].header("authorization"),
        Some("Bearer hf_secret_token")
    );
}

#[tokio::test]
async fn test_no_auth_header_without_credential() {
    let server = TestServer::start(Reply::body(64)).await;
    let temp_dir = tempdir().unwrap();
    let artifact =
        RemoteArtifact::new(&server.url("public.bin"), temp_dir.path().join("public.bin"))
            .unwrap();

    fetcher(None).ensure(&artifact, &NoProgress).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].header("authorization").is_none());
}

#[tokio::test]
async fn test_existing_file_makes_no_request() {
    let server = TestServer::start(Reply::body(64)).await;
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("model.bin");
    std::fs::write(&path, b"already here").unwrap();
    let artifact = RemoteArtifact::new(&server.url("model.bin"), &path).unwrap();

    let outcome = fetcher(Credential::new("hf_token"))
        .ensure(&artifact, &NoProgress)
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::AlreadyPresent);
    assert!(server.requests().is_empty());
    assert_eq!(std::fs::read(&path).unwrap(), b"already here");
}

#[tokio::test]
async fn test_empty_existing_file_is_replaced() {
    let server = TestServer::start(Reply::body(300)).await;
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("model.bin");
    std::fs::write(&path, b"").unwrap();
    let artifact = RemoteArtifact::new(&server.url("model.bin"), &path).unwrap();

    let outcome = fetcher(None).ensure(&artifact, &NoProgress).await.unwrap();

    assert_eq!(outcome, FetchOutcome::Downloaded { bytes: 300 });
    assert_eq!(server.requests().len(), 1);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 300);
}

#[tokio::test]
async fn test_unknown_length_counts_up() {
    let server = TestServer::start(Reply::Body {
        len: 100_000,
        declare_length: false,
    })
    .await;
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("model.bin");
    let artifact = RemoteArtifact::new(&server.url("model.bin"), &path).unwrap();
    let progress = RecordingProgress::default();

    let outcome = fetcher(None).ensure(&artifact, &progress).await.unwrap();

    assert_eq!(outcome, FetchOutcome::Downloaded { bytes: 100_000 });
    assert_eq!(*progress.total.lock().unwrap(), Some(None));
    assert_eq!(*progress.advanced.lock().unwrap(), 100_000);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 100_000);
}

#[tokio::test]
async fn test_http_error_status_is_fatal() {
    let server = TestServer::start(Reply::Status(401)).await;
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("model.bin");
    let artifact = RemoteArtifact::new(&server.url("model.bin"), &path).unwrap();

    let result = fetcher(None).ensure(&artifact, &NoProgress).await;

    match result {
        Err(DownloadError::ServerError { status }) => assert_eq!(status, 401),
        other => panic!("Expected DownloadError::ServerError, got {:?}", other),
    }
    assert!(!path.exists());
    assert!(!artifact.partial_path().exists());
}

#[tokio::test]
async fn test_truncated_body_leaves_no_file() {
    let server = TestServer::start(Reply::Truncated {
        declared: 50_000,
        sent: 20_000,
    })
    .await;
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("model.bin");
    let artifact = RemoteArtifact::new(&server.url("model.bin"), &path).unwrap();

    let result = fetcher(None).ensure(&artifact, &NoProgress).await;

    assert!(matches!(
        result,
        Err(DownloadError::Http(_)) | Err(DownloadError::IncompleteDownload { .. })
    ));
    assert!(!path.exists());
    assert!(!artifact.partial_path().exists());
}
