// Unit tests for HEAD request support in the asset service
// HEAD must produce the same status and headers as GET, without a body

use http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;

use hashfs::config::HashFsConfig;
use hashfs::fs::HashFs;
use hashfs::server::AssetService;
use hashfs::source::MemorySource;

fn service() -> AssetService<MemorySource> {
    let source = MemorySource::new().with_file("testdata/sub.dir.2/text.txt", "testdata");
    AssetService::new(Arc::new(HashFs::new(source, HashFsConfig::default())))
}

#[tokio::test]
async fn test_head_original_path() {
    let service = service();
    let req = Request::head("/testdata/sub.dir.2/text.txt").body(()).unwrap();
    let res = service.handle(req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_LENGTH], "8");
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty(), "HEAD response must not carry a body");
}

#[tokio::test]
async fn test_head_and_get_share_headers() {
    let service = service();
    let hashed = service
        .hashfs()
        .translate("testdata/sub.dir.2/text.txt")
        .await;
    let uri = format!("/{}", hashed);

    let get = service.handle(Request::get(&uri).body(()).unwrap()).await;
    let head = service.handle(Request::head(&uri).body(()).unwrap()).await;

    assert_eq!(get.status(), head.status());
    for name in [
        header::CONTENT_LENGTH,
        header::CONTENT_TYPE,
        header::CACHE_CONTROL,
        header::ETAG,
    ] {
        assert_eq!(
            get.headers().get(&name),
            head.headers().get(&name),
            "header {} differs between GET and HEAD",
            name
        );
    }
}

#[tokio::test]
async fn test_head_missing_file() {
    let service = service();
    let res = service
        .handle(Request::head("/nope.txt").body(()).unwrap())
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}
