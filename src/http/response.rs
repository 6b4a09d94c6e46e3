//! HTTP response primitives
//!
//! The reply-once latch and the error-reply builder shared by the router and
//! the file responder. Bodies are boxed so full (error) and streamed (file)
//! responses share one type.

use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::Response;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::logger;

/// Body type for every response this server produces.
pub type ResponseBody = BoxBody<Bytes, std::io::Error>;

/// Box a complete in-memory body.
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Reply-once latch scoped to a single request.
///
/// Holds a Pending -> Replied flag; the first `try_claim` wins and every later
/// one fails. Clones share the flag, so the streaming body can carry a handle
/// after the response headers have been handed to the transport. Claims use
/// compare-and-swap because requests run on a multi-threaded executor.
#[derive(Clone, Debug, Default)]
pub struct ReplyGuard {
    replied: Arc<AtomicBool>,
}

impl ReplyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the right to send the terminal reply. True exactly once.
    pub fn try_claim(&self) -> bool {
        self.replied
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[must_use]
    pub fn is_replied(&self) -> bool {
        self.replied.load(Ordering::Acquire)
    }
}

/// Build the terminal error reply for a request, or log if one is in flight.
///
/// If the guard claims successfully the reply is `<message>` as a plain-text
/// body and the log line is `"<status>: <message>"`. If a terminal reply was
/// already committed, only `"Interrupted: <message>"` is logged and the
/// returned placeholder is never transmitted.
pub fn send_http_error(status: u16, guard: &ReplyGuard, message: &str) -> Response<ResponseBody> {
    if guard.try_claim() {
        logger::log_error(&format!("{status}: {message}"));
        Response::builder()
            .status(status)
            .header("Content-Type", "text/plain")
            .body(full_body(message.to_owned()))
            .unwrap_or_else(|e| {
                logger::log_error(&format!("Failed to build {status} response: {e}"));
                Response::new(full_body(Bytes::new()))
            })
    } else {
        logger::log_error(&format!("Interrupted: {message}"));
        Response::new(full_body(Bytes::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn guard_first_claim_wins() {
        let guard = ReplyGuard::new();
        assert!(!guard.is_replied());
        assert!(guard.try_claim());
        assert!(guard.is_replied());
        assert!(!guard.try_claim());
        assert!(!guard.try_claim());
    }

    #[test]
    fn guard_clones_share_the_latch() {
        let guard = ReplyGuard::new();
        let other = guard.clone();
        assert!(guard.try_claim());
        assert!(!other.try_claim());
        assert!(other.is_replied());
    }

    #[tokio::test]
    async fn error_reply_body_is_message_only() {
        let guard = ReplyGuard::new();
        let resp = send_http_error(404, &guard, "public/missing.txt   (not found)");
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["Content-Type"], "text/plain");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        // The "<status>: <message>" form is log-only, never sent on the wire
        assert_eq!(&body[..], b"public/missing.txt   (not found)");
    }

    #[tokio::test]
    async fn second_error_is_swallowed() {
        let guard = ReplyGuard::new();
        let first = send_http_error(403, &guard, "public/locked.txt   (EACCES)");
        assert_eq!(first.status(), 403);

        let second = send_http_error(500, &guard, "public/locked.txt   (EIO); 2");
        let body = second.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
