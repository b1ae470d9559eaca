//! Response body construction

use bytes::{Bytes, BytesMut};
use http::{header, HeaderValue, Response, StatusCode};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::Frame;
use tokio::io::AsyncReadExt;

/// Body type for every response the adapter produces
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// Read size when streaming file-backed content
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn full_body(content: Bytes) -> ResponseBody {
    Full::new(content)
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream `file` in `STREAM_CHUNK_SIZE` pieces
pub fn file_body(file: tokio::fs::File) -> ResponseBody {
    let stream = futures::stream::try_unfold(file, |mut file| async move {
        let mut buf = BytesMut::with_capacity(STREAM_CHUNK_SIZE);
        let n = file.read_buf(&mut buf).await?;
        if n == 0 {
            Ok::<_, std::io::Error>(None)
        } else {
            Ok(Some((Frame::data(buf.freeze()), file)))
        }
    });
    StreamBody::new(stream).boxed_unsync()
}

/// Plain-text error response carrying the status' canonical reason
pub fn error_response(status: StatusCode, head_only: bool) -> Response<ResponseBody> {
    let text = format!("{}\n", status.canonical_reason().unwrap_or("Error"));
    let len = text.len();
    let body = if head_only {
        empty_body()
    } else {
        full_body(Bytes::from(text))
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    response
}
