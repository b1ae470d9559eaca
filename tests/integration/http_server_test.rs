// Integration tests for the HTTP server over real TCP connections
// Covers hashed vs unhashed caching headers, status mapping and streaming

use std::sync::Arc;

use hashfs::config::HashFsConfig;
use hashfs::fs::HashFs;
use hashfs::source::{DirSource, MemorySource};

use super::test_harness::ServerTestHarness;

const TEXT_TXT: &str = "810ff2fb242a5dee4220f2cb0e6a519891fb67f2f828a6cab4ef8894633b1f50";

fn memory_hfs(config: HashFsConfig) -> Arc<HashFs<MemorySource>> {
    let source = MemorySource::new()
        .with_file("testdata/sub.dir.2/text.txt", "testdata")
        .with_file("testdata/subdir1/script.js", "console.log(\"hello\");");
    Arc::new(HashFs::new(source, config))
}

#[tokio::test]
async fn test_hashed_path_served_with_cache_headers() {
    let hfs = memory_hfs(HashFsConfig::default());
    let hashed = hfs.translate("testdata/sub.dir.2/text.txt").await;
    let server = ServerTestHarness::start(Arc::clone(&hfs), "/").await;

    let res = server.request("GET", &format!("/{}", hashed)).await;
    assert_eq!(res.status, 200);
    assert_eq!(&res.body[..], b"testdata");
    assert_eq!(
        res.headers["cache-control"],
        "public, max-age=31536000, immutable"
    );
    assert_eq!(res.headers["etag"], TEXT_TXT);
    assert_eq!(res.headers["content-length"], "8");
    assert_eq!(res.headers["content-type"], "text/plain");
}

#[tokio::test]
async fn test_original_path_served_without_cache_headers() {
    let hfs = memory_hfs(HashFsConfig::default());
    let server = ServerTestHarness::start(hfs, "/").await;

    let res = server.request("GET", "/testdata/sub.dir.2/text.txt").await;
    assert_eq!(res.status, 200);
    assert_eq!(&res.body[..], b"testdata");
    assert!(res.headers.get("cache-control").is_none());
    assert!(res.headers.get("etag").is_none());
}

#[tokio::test]
async fn test_custom_max_age_in_header() {
    let hfs = memory_hfs(HashFsConfig {
        max_age_seconds: 7 * 24 * 60 * 60,
        ..Default::default()
    });
    let hashed = hfs.translate("testdata/sub.dir.2/text.txt").await;
    let server = ServerTestHarness::start(Arc::clone(&hfs), "/").await;

    let res = server.request("GET", &format!("/{}", hashed)).await;
    assert_eq!(res.status, 200);
    assert_eq!(
        res.headers["cache-control"],
        "public, max-age=604800, immutable"
    );
}

#[tokio::test]
async fn test_status_mapping() {
    let hfs = memory_hfs(HashFsConfig::default());
    let server = ServerTestHarness::start(hfs, "/").await;

    assert_eq!(server.request("GET", "/badpath.txt").await.status, 404);
    assert_eq!(server.request("GET", "/testdata/").await.status, 403);
    assert_eq!(server.request("GET", "/").await.status, 403);
    assert_eq!(server.request("DELETE", "/testdata/sub.dir.2/text.txt").await.status, 405);
}

#[tokio::test]
async fn test_backend_failure_is_500() {
    let hfs = memory_hfs(HashFsConfig::default());
    hfs.source().set_io_error(true);
    let server = ServerTestHarness::start(Arc::clone(&hfs), "/").await;

    let res = server.request("GET", "/testdata/sub.dir.2/text.txt").await;
    assert_eq!(res.status, 500);
}

#[tokio::test]
async fn test_head_request_has_headers_only() {
    let hfs = memory_hfs(HashFsConfig::default());
    let hashed = hfs.translate("testdata/sub.dir.2/text.txt").await;
    let server = ServerTestHarness::start(Arc::clone(&hfs), "/").await;

    let res = server.request("HEAD", &format!("/{}", hashed)).await;
    assert_eq!(res.status, 200);
    assert!(res.body.is_empty());
    assert_eq!(res.headers["content-length"], "8");
    assert_eq!(res.headers["etag"], TEXT_TXT);
}

#[tokio::test]
async fn test_mount_prefix() {
    let hfs = memory_hfs(HashFsConfig::default());
    let hashed = hfs.translate("testdata/subdir1/script.js").await;
    let server = ServerTestHarness::start(Arc::clone(&hfs), "/static/").await;

    let res = server.request("GET", &format!("/static/{}", hashed)).await;
    assert_eq!(res.status, 200);
    assert_eq!(&res.body[..], b"console.log(\"hello\");");
    assert!(res.headers.get("etag").is_some());

    // Outside the prefix nothing is served
    let res = server.request("GET", &format!("/{}", hashed)).await;
    assert_eq!(res.status, 404);

    // Mount root is a directory
    assert_eq!(server.request("GET", "/static/").await.status, 403);
}

#[tokio::test]
async fn test_dot_segments_cannot_escape_root() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = dir.path().join("public");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("ok.txt"), "ok").unwrap();
    std::fs::write(dir.path().join("secret.txt"), "secret").unwrap();

    let hfs = Arc::new(HashFs::new(DirSource::new(&root), HashFsConfig::default()));
    let server = ServerTestHarness::start(hfs, "/").await;

    let res = server.request("GET", "/../secret.txt").await;
    assert_eq!(res.status, 404);

    let res = server.request("GET", "/sub/../ok.txt").await;
    assert_eq!(res.status, 200);
    assert_eq!(&res.body[..], b"ok");
}

#[tokio::test]
async fn test_streams_large_file_from_disk() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data: Vec<u8> = (0..300_000u32).map(|i| (i % 253) as u8).collect();
    std::fs::write(dir.path().join("bundle.js"), &data).unwrap();

    let hfs = Arc::new(HashFs::new(DirSource::new(dir.path()), HashFsConfig::default()));
    let hashed = hfs.translate("bundle.js").await;
    assert_ne!(hashed, "bundle.js");
    let server = ServerTestHarness::start(Arc::clone(&hfs), "/").await;

    let res = server.request("GET", &format!("/{}", hashed)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.headers["content-length"], data.len().to_string().as_str());
    assert_eq!(res.body.len(), data.len());
    assert_eq!(&res.body[..], &data[..]);
    assert!(res.headers["content-type"]
        .to_str()
        .unwrap()
        .contains("javascript"));
}
