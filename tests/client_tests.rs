//! ApiClient against a mocked endpoint.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mockito::{Matcher, Server};
use pstorage::engine::{ApiClient, Uploader};
use pstorage::{Opts, PipelineError, ValidatedItem, VariantSelection, WorkItem, run_batch_with};
use serde_json::json;
use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const UPLOAD_PATH: &str = "/api/1/upload";

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn opts_for(server: &Server) -> Opts {
    Opts {
        api_key: "test-key".to_string(),
        endpoint: format!("{}{}", server.url(), UPLOAD_PATH),
        timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

fn success_body() -> String {
    json!({
        "status": 200,
        "message": "Upload successful",
        "original_filename": "cat.png",
        "url": "https://img.example/i/cat.png",
        "url_viewer": "https://pstorage.example/image/cat",
        "original": {"filename": "cat.png", "url": "https://img.example/i/cat.png"},
        "large": {"filename": "cat.lg.png", "url": "https://img.example/i/cat.lg.png"},
        "medium": {"filename": "cat.md.png", "url": "https://img.example/i/cat.md.png"},
        "thumb": {"filename": "cat.th.png", "url": "https://img.example/i/cat.th.png"}
    })
    .to_string()
}

fn png(dir: &TempDir) -> std::path::PathBuf {
    let p = dir.path().join("cat.png");
    fs::write(&p, b"\x89PNG fake").unwrap();
    p
}

// --- file uploads ---

#[test]
fn test_upload_file_posts_base64_json() {
    let mut server = Server::new();
    let dir = TempDir::new().unwrap();
    let path = png(&dir);
    let mock = server
        .mock("POST", UPLOAD_PATH)
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "key": "test-key",
            "filename": "cat.png",
            "source": STANDARD.encode(b"\x89PNG fake"),
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success_body())
        .create();

    let client = ApiClient::new(&opts_for(&server)).unwrap();
    let result = client.upload(&ValidatedItem::File(path.clone())).unwrap();

    mock.assert();
    assert_eq!(result.reference, path.display().to_string());
    assert_eq!(result.status, 200);
    assert_eq!(result.original_filename, "cat.png");
    assert_eq!(result.thumb.url, "https://img.example/i/cat.th.png");
    assert_eq!(result.large.filename, "cat.lg.png");
}

#[test]
fn test_upload_file_vanished_after_validation() {
    let server = Server::new();
    let dir = TempDir::new().unwrap();
    let client = ApiClient::new(&opts_for(&server)).unwrap();
    let err = client
        .upload(&ValidatedItem::File(dir.path().join("gone.png")))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Unreadable { .. }));
}

// --- url uploads ---

#[test]
fn test_upload_url_sends_query_params() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", UPLOAD_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), "test-key".into()),
            Matcher::UrlEncoded("source".into(), "https://src.example/a b.png?x=1".into()),
        ]))
        .with_status(200)
        .with_body(success_body())
        .create();

    let client = ApiClient::new(&opts_for(&server)).unwrap();
    let result = client
        .upload(&ValidatedItem::Url("https://src.example/a b.png?x=1".into()))
        .unwrap();

    mock.assert();
    assert_eq!(result.reference, "https://src.example/a b.png?x=1");
    assert_eq!(result.url_viewer, "https://pstorage.example/image/cat");
}

// --- rejection / fatal / transport ---

#[test]
fn test_invalid_key_is_remote_rejected() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", UPLOAD_PATH)
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(json!({"status": 400, "message": "invalid key"}).to_string())
        .create();

    let client = ApiClient::new(&opts_for(&server)).unwrap();
    let err = client
        .upload(&ValidatedItem::Url("https://src.example/a.png".into()))
        .unwrap_err();
    match err {
        PipelineError::RemoteRejected {
            status, message, ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "invalid key");
        }
        other => panic!("expected RemoteRejected, got {other:?}"),
    }
}

#[test]
fn test_forbidden_status_is_fatal() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", UPLOAD_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({"status": 403, "message": "forbidden"}).to_string())
        .create();

    let client = ApiClient::new(&opts_for(&server)).unwrap();
    let err = client
        .upload(&ValidatedItem::Url("https://src.example/a.png".into()))
        .unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_undecodable_body_is_transport_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", UPLOAD_PATH)
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("<html>bad gateway</html>")
        .create();

    let client = ApiClient::new(&opts_for(&server)).unwrap();
    let err = client
        .upload(&ValidatedItem::Url("https://src.example/a.png".into()))
        .unwrap_err();
    match err {
        PipelineError::Transport { message, .. } => {
            assert!(message.contains("invalid response body"));
            assert!(message.contains("502"));
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[test]
fn test_connection_refused_is_transport_error() {
    let opts = Opts {
        api_key: "k".into(),
        // Port 9 (discard) on loopback is closed in test environments.
        endpoint: "http://127.0.0.1:9/api/1/upload".into(),
        timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let client = ApiClient::new(&opts).unwrap();
    let err = client
        .upload(&ValidatedItem::Url("https://src.example/a.png".into()))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Transport { .. }));
}

#[test]
fn test_invalid_endpoint_rejected_at_construction() {
    let opts = Opts {
        endpoint: "not an endpoint".into(),
        ..Default::default()
    };
    assert!(ApiClient::new(&opts).is_err());
}

// --- end to end through the pipeline ---

fn run_against(
    server: &Server,
    items: Vec<WorkItem>,
    variants: VariantSelection,
) -> (String, String, pstorage::RunReport) {
    let opts = Opts {
        variants,
        ..opts_for(server)
    };
    let client = ApiClient::new(&opts).unwrap();
    let diag = SharedBuf::default();
    let mut out = Vec::new();
    let report =
        run_batch_with(items, &opts, Arc::new(client), &mut out, Box::new(diag.clone())).unwrap();
    (String::from_utf8(out).unwrap(), diag.contents(), report)
}

#[test]
fn test_thumb_flag_prints_only_thumb_url() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", UPLOAD_PATH)
        .with_status(200)
        .with_body(success_body())
        .create();
    let dir = TempDir::new().unwrap();
    let path = png(&dir);

    let sel = VariantSelection {
        thumb: true,
        ..Default::default()
    };
    let (out, diag, report) = run_against(&server, vec![WorkItem::file(&path)], sel);

    assert_eq!(report.uploaded, 1);
    assert!(diag.is_empty());
    assert!(out.contains("Thumb URL"));
    assert!(out.contains("https://img.example/i/cat.th.png"));
    assert!(!out.contains("cat.md.png"));
    assert!(!out.contains("cat.lg.png"));
    assert!(!out.contains("URL Viewer"));
}

#[test]
fn test_no_flags_prints_viewer_url() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", UPLOAD_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(success_body())
        .create();

    let (out, _, report) = run_against(
        &server,
        vec![WorkItem::url("https://src.example/cat.png")],
        VariantSelection::default(),
    );
    assert_eq!(report.uploaded, 1);
    assert!(out.starts_with("https://src.example/cat.png:\n"));
    assert!(out.contains("  * https://pstorage.example/image/cat\n"));
}

#[test]
fn test_invalid_key_contributes_no_result() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", UPLOAD_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({"status": 400, "message": "invalid key"}).to_string())
        .create();

    let (out, diag, report) = run_against(
        &server,
        vec![WorkItem::url("https://src.example/cat.png")],
        VariantSelection::default(),
    );
    assert!(out.is_empty());
    assert_eq!(report.uploaded, 0);
    assert_eq!(report.failed, 1);
    assert!(diag.contains("error uploading https://src.example/cat.png : invalid key"));
}
