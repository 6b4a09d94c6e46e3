//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: resolves the request path under
//! the public directory and dispatches on method. GET serves the file; POST
//! stores the submitted form and then serves the file exactly like GET (the
//! reply never reflects the stored data); anything else is a 405.

use http_body_util::{BodyExt, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::path::{Component, Path};
use std::sync::Arc;

use crate::config::{AppState, FilesConfig};
use crate::handler::{form, static_files};
use crate::http::{send_http_error, ReplyGuard, ResponseBody};
use crate::logger;

/// Main entry point for HTTP request handling.
///
/// Generic over the request body so tests can drive it with `Full<Bytes>`.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    let file_path = resolve_path(&state.config.files, uri.path());

    // `..` segments would let a request walk out of the public directory;
    // answer as if the file did not exist
    if escapes_root(uri.path()) {
        let guard = ReplyGuard::new();
        logger::log_warning(&format!("Path traversal attempt blocked: {}", uri.path()));
        return Ok(send_http_error(
            404,
            &guard,
            &format!("{file_path}   (not found)"),
        ));
    }

    match method {
        Method::GET => Ok(static_files::serve_file(&file_path).await),
        Method::POST => {
            match collect_body(req.into_body(), state.config.http.max_body_size).await {
                Ok(body) => {
                    let fields = form::parse_form(&String::from_utf8_lossy(&body));
                    state.form.replace(fields);
                }
                Err(err) => logger::log_error(&format!("Problem with request: {err}")),
            }
            Ok(static_files::serve_file(&file_path).await)
        }
        // HEAD, PUT, DELETE, OPTIONS...
        _ => {
            let guard = ReplyGuard::new();
            Ok(send_http_error(
                405,
                &guard,
                &format!("HTTP {method} {uri}   (Method Not Allowed)"),
            ))
        }
    }
}

/// Join the request path onto the public directory; "/" maps to the index file.
pub fn resolve_path(files: &FilesConfig, url_path: &str) -> String {
    let relative = if url_path == "/" {
        files.index_file.as_str()
    } else {
        url_path.trim_start_matches('/')
    };
    Path::new(&files.public_dir)
        .join(relative)
        .to_string_lossy()
        .into_owned()
}

fn escapes_root(url_path: &str) -> bool {
    Path::new(url_path)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
}

async fn collect_body<B>(
    body: B,
    max_body_size: u64,
) -> Result<Bytes, Box<dyn std::error::Error + Send + Sync>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let collected = Limited::new(body, limit).collect().await?;
    Ok(collected.to_bytes())
}
