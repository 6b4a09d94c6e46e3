//! File responder
//!
//! Resolves a filesystem path to exactly one terminal HTTP reply: either a
//! streamed 200 with the file bytes, or a categorized plain-text error.
//!
//! The pipeline is stat -> open -> commit headers -> stream, as sequential
//! suspend points. Headers are committed only once the open has succeeded, so
//! a file that stats fine but cannot be read (permissions, directory) still
//! gets a clean error reply instead of a half-sent response. After commitment
//! the reply-once latch means later failures can only be logged.

use futures::Stream;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::Response;
use std::io;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::{self, File};
use tokio_util::io::ReaderStream;

use crate::http::response::full_body;
use crate::http::{mime, send_http_error, ReplyGuard, ResponseBody};
use crate::logger;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Serve the file at `abs_path`, streaming its bytes on success.
pub async fn serve_file(abs_path: &str) -> Response<ResponseBody> {
    let guard = ReplyGuard::new();

    let meta = match fs::metadata(abs_path).await {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return send_http_error(404, &guard, &format!("{abs_path}   (not found)"));
        }
        Err(err) => {
            let code = error_code(&err);
            return send_http_error(500, &guard, &format!("{abs_path}   ({code}); 1"));
        }
    };

    // A directory stats fine but cannot be read as a byte stream
    if meta.is_dir() {
        return send_http_error(403, &guard, &format!("{abs_path}   (EISDIR)"));
    }

    let file = match File::open(abs_path).await {
        Ok(file) => file,
        Err(err) => {
            let code = error_code(&err);
            return send_http_error(403, &guard, &format!("{abs_path}   ({code})"));
        }
    };

    // The open succeeded: this streamed response is the terminal reply.
    // The guard travels with the stream, so a failure while the bytes are
    // in flight latches the same flag the pre-commit error paths use.
    let content_type = mime::lookup(
        Path::new(abs_path)
            .extension()
            .and_then(|ext| ext.to_str()),
    );
    let stream = FileStream::new(
        ReaderStream::with_capacity(file, READ_CHUNK_SIZE),
        abs_path.to_owned(),
        guard,
    );

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", meta.len())
        .body(StreamBody::new(stream).boxed())
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build 200 response: {e}"));
            Response::new(full_body(Bytes::new()))
        })
}

/// Streaming body over an open file.
///
/// Chunks flow only when the transport polls for the next frame, so transfer
/// is backpressure-aware and never buffers the whole file. The stream shares
/// the request's reply latch: the first read failure claims it and is logged
/// with the stream-phase marker, then surfaces to the transport, which drops
/// the connection (the 200 headers are already on the wire); later signals
/// are no-ops. A clean end with the latch untouched logs the success line.
struct FileStream<R> {
    inner: ReaderStream<R>,
    path: String,
    guard: ReplyGuard,
}

impl<R> FileStream<R> {
    fn new(inner: ReaderStream<R>, path: String, guard: ReplyGuard) -> Self {
        Self { inner, path, guard }
    }
}

impl<R: tokio::io::AsyncRead + Unpin> Stream for FileStream<R> {
    type Item = Result<Frame<Bytes>, io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(Frame::data(chunk)))),
            Poll::Ready(Some(Err(err))) => {
                if this.guard.try_claim() {
                    let code = error_code(&err);
                    logger::log_error(&format!("Interrupted: {}   ({code}); 2", this.path));
                }
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                if !this.guard.is_replied() {
                    logger::log_info(&format!("200: {}", this.path));
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Errno-style name for an I/O error, for reply bodies and log lines.
fn error_code(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "ENOENT".to_string(),
        io::ErrorKind::PermissionDenied => "EACCES".to_string(),
        io::ErrorKind::ConnectionReset => "ECONNRESET".to_string(),
        io::ErrorKind::BrokenPipe => "EPIPE".to_string(),
        kind => format!("{kind:?}"),
    }
}
