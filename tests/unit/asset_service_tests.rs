// Unit tests for AssetService request handling
// Exercises the public API end to end without opening sockets

use bytes::Bytes;
use http::{header, Request, Response, StatusCode};
use http_body_util::BodyExt;
use rstest::rstest;
use std::sync::Arc;

use hashfs::config::HashFsConfig;
use hashfs::fs::HashFs;
use hashfs::hasher::{HashAlgorithm, HashLocation};
use hashfs::server::{AssetService, ResponseBody};
use hashfs::source::MemorySource;
use hashfs::urls::AssetUrls;

const SCRIPT_JS: &str = "3781f94ea812bb33437de9049e04bc3af41a0e7397164b057379c08c3b0ac489";

fn hfs(config: HashFsConfig) -> Arc<HashFs<MemorySource>> {
    let source = MemorySource::new()
        .with_file("js/script.js", "console.log(\"hello\");")
        .with_file("js/script.min.js", "console.log(\"hello\");")
        .with_file("html/indexhtml", "console.log(\"hello\");")
        .with_file("css/site.css", "body{margin:0}");
    Arc::new(HashFs::new(source, config))
}

async fn get(service: &AssetService<MemorySource>, uri: &str) -> (Response<ResponseBody>, Bytes) {
    let res = service.handle(Request::get(uri).body(()).unwrap()).await;
    let (parts, body) = res.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    (Response::from_parts(parts, hashfs::server::empty_body()), bytes)
}

#[rstest]
#[case(HashLocation::Start, "js/script.js", format!("js/{SCRIPT_JS}-script.js"))]
#[case(HashLocation::End, "js/script.js", format!("js/script.js-{SCRIPT_JS}.js"))]
#[case(HashLocation::FirstPeriod, "js/script.min.js", format!("js/script-{SCRIPT_JS}.min.js"))]
#[case(HashLocation::FirstPeriod, "html/indexhtml", format!("html/indexhtml-{SCRIPT_JS}"))]
#[tokio::test]
async fn test_insertion_policies_serve_round_trip(
    #[case] location: HashLocation,
    #[case] original: &str,
    #[case] expected: String,
) {
    let hfs = hfs(HashFsConfig {
        location,
        ..Default::default()
    });
    let hashed = hfs.translate(original).await;
    assert_eq!(hashed, expected);

    let service = AssetService::new(Arc::clone(&hfs));
    let (res, body) = get(&service, &format!("/{}", hashed)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(&body[..], b"console.log(\"hello\");");
    assert_eq!(res.headers()[header::ETAG], SCRIPT_JS);
}

#[tokio::test]
async fn test_truncated_hash_in_etag() {
    let hfs = hfs(HashFsConfig {
        hash_length: 8,
        ..Default::default()
    });
    let hashed = hfs.translate("js/script.js").await;
    assert_eq!(hashed, format!("js/script.js-{}.js", &SCRIPT_JS[..8]));

    let service = AssetService::new(Arc::clone(&hfs));
    let (res, _) = get(&service, &format!("/{}", hashed)).await;
    assert_eq!(res.headers()[header::ETAG], &SCRIPT_JS[..8]);
}

#[tokio::test]
async fn test_sha512_hash_length() {
    let hfs = hfs(HashFsConfig {
        algorithm: HashAlgorithm::Sha512,
        ..Default::default()
    });
    let hashed = hfs.translate("css/site.css").await;
    let entry = hfs.reverse_lookup(&hashed).unwrap();
    assert_eq!(entry.hash.len(), 128);
}

#[tokio::test]
async fn test_missing_file_translate_and_resolve() {
    let hfs = hfs(HashFsConfig::default());
    assert_eq!(hfs.translate("no/such/file").await, "no/such/file");
    assert!(hfs.resolve("no/such/file").await.unwrap_err().is_not_found());

    let service = AssetService::new(Arc::clone(&hfs));
    let (res, body) = get(&service, "/no/such/file").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body[..], b"Not Found\n");
}

#[tokio::test]
async fn test_directory_requests_forbidden() {
    let service = AssetService::new(hfs(HashFsConfig::default()));
    for uri in ["/", "/js", "/js/", "/js/../css"] {
        let (res, _) = get(&service, uri).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "uri {}", uri);
    }
}

#[tokio::test]
async fn test_template_urls_resolve_through_service() {
    let hfs = hfs(HashFsConfig::default());
    let urls = AssetUrls::new(Arc::clone(&hfs), "/static/");
    let service = AssetService::new(Arc::clone(&hfs)).with_mount_prefix("/static/");

    let url = urls.url("/static/css/site.css").await;
    assert_ne!(url, "/static/css/site.css");

    let (res, body) = get(&service, &url).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(&body[..], b"body{margin:0}");
    assert_eq!(
        res.headers()[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/css");
}

#[tokio::test]
async fn test_stats_track_requests() {
    let hfs = hfs(HashFsConfig::default());
    let service = AssetService::new(Arc::clone(&hfs));
    let hashed = hfs.translate("css/site.css").await;

    get(&service, &format!("/{}", hashed)).await;
    get(&service, "/css/site.css").await;

    let stats = hfs.stats();
    assert_eq!(stats.resolved_hashed, 1);
    assert_eq!(stats.resolved_literal, 1);
    assert_eq!(stats.entries, 1);
}
