// Server module - HTTP adapter serving a HashFs over hyper

mod path;
mod response;

pub use path::{clean, normalize_request_path};
pub use response::{empty_body, error_response, file_body, full_body, ResponseBody};

use http::{header, HeaderValue, Method, Request, Response, StatusCode};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::fs::HashFs;
use crate::source::{AssetBody, AssetSource};

/// HTTP handler for the files of a [`HashFs`].
///
/// A simplified static file server: no directory listings, no index pages,
/// no range or conditional requests. Responses for hashed paths get
/// `Cache-Control: public, max-age=<n>, immutable` and an `ETag` with the
/// content hash. Responses for any other path get neither, since their
/// content may change without the URL changing.
pub struct AssetService<S> {
    hfs: Arc<HashFs<S>>,
    mount_prefix: String,
}

impl<S: AssetSource> AssetService<S> {
    /// Serve `hfs` at the root of the URL space
    pub fn new(hfs: Arc<HashFs<S>>) -> Self {
        Self {
            hfs,
            mount_prefix: "/".to_string(),
        }
    }

    /// Serve under `prefix`, e.g. `/static/`. Slashes are added at either
    /// end if missing.
    pub fn with_mount_prefix(mut self, prefix: &str) -> Self {
        let trimmed = prefix.trim_matches('/');
        self.mount_prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };
        self
    }

    pub fn mount_prefix(&self) -> &str {
        &self.mount_prefix
    }

    pub fn hashfs(&self) -> &Arc<HashFs<S>> {
        &self.hfs
    }

    /// Answer one request
    pub async fn handle<B>(&self, req: Request<B>) -> Response<ResponseBody> {
        let head_only = req.method() == Method::HEAD;
        if req.method() != Method::GET && !head_only {
            let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, false);
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
            return response;
        }

        let file_path = match normalize_request_path(req.uri().path(), &self.mount_prefix) {
            Some(p) => p,
            None => {
                tracing::debug!(path = %req.uri().path(), status = 404, "Request outside mount prefix");
                return error_response(StatusCode::NOT_FOUND, head_only);
            }
        };

        let resolved = match self.hfs.resolve(&file_path).await {
            Ok(resolved) => resolved,
            Err(e) if e.is_not_found() || e.is_invalid_path() => {
                tracing::debug!(path = %file_path, status = 404, "File not found");
                return error_response(StatusCode::NOT_FOUND, head_only);
            }
            Err(e) => {
                tracing::warn!(path = %file_path, error = %e, status = 500, "Failed to open file");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, head_only);
            }
        };

        if resolved.file.is_dir() {
            tracing::debug!(path = %file_path, status = 403, "Directory requested");
            return error_response(StatusCode::FORBIDDEN, head_only);
        }

        let content_type = mime_guess::from_path(&file_path).first_or_octet_stream();
        let len = resolved.file.len();

        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type.as_ref())
            .header(header::CONTENT_LENGTH, len);

        // Only hashed paths may be cached forever
        if let Some(hash) = &resolved.hash {
            builder = builder
                .header(header::CACHE_CONTROL, self.hfs.cache_control())
                .header(header::ETAG, hash.as_str());
        }

        let body = if head_only {
            empty_body()
        } else {
            match resolved.file.into_body() {
                AssetBody::Bytes(content) => full_body(content),
                AssetBody::File(file) => file_body(file),
                AssetBody::Empty => empty_body(),
            }
        };

        tracing::debug!(
            path = %file_path,
            original = %resolved.path,
            hashed = resolved.hash.is_some(),
            status = 200,
            "Serving file"
        );

        builder.body(body).unwrap_or_else(|e| {
            tracing::warn!(path = %file_path, error = %e, "Failed to build response");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, head_only)
        })
    }
}

/// Pause after a failed accept, e.g. when the process is out of file descriptors
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Accept HTTP/1 connections on `listener` until `shutdown` completes.
///
/// On shutdown no new connections are accepted. Open connections finish
/// their in-flight request and are closed, and `serve` returns once all of
/// them are gone. Accept errors are logged and do not stop the server.
pub async fn serve<S, F>(
    listener: TcpListener,
    service: Arc<AssetService<S>>,
    shutdown: F,
) -> std::io::Result<()>
where
    S: AssetSource + 'static,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut connections = JoinSet::new();

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    continue;
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => continue,
            _ = &mut shutdown => break,
        };

        let service = Arc::clone(&service);
        let mut shutdown_rx = shutdown_rx.clone();
        connections.spawn(async move {
            let io = TokioIo::new(stream);
            let svc = service_fn(move |req| {
                let service = Arc::clone(&service);
                async move { Ok::<_, Infallible>(service.handle(req).await) }
            });

            let conn = http1::Builder::new().serve_connection(io, svc);
            tokio::pin!(conn);
            let result = tokio::select! {
                result = conn.as_mut() => result,
                _ = shutdown_rx.changed() => {
                    conn.as_mut().graceful_shutdown();
                    conn.await
                }
            };
            if let Err(err) = result {
                tracing::debug!(peer = %peer, error = %err, "Connection closed with error");
            }
        });
    }

    tracing::info!(
        open_connections = connections.len(),
        "Shutdown requested, no longer accepting connections"
    );
    let _ = shutdown_tx.send(true);
    while connections.join_next().await.is_some() {}
    Ok(())
}
