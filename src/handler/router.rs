//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, body-size
//! guard, path resolution dispatch, and the cache-disabling
//! post-processing step that runs on every response.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::{Method, Request, Response, Version};

use crate::config::AppState;
use crate::handler::resolve::{self, Resolved};
use crate::handler::{listing, static_files};
use crate::http;
use crate::logger;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let version = version_str(req.version());
    let is_head = method == Method::HEAD;
    let referer = header_string(&req, "referer");
    let user_agent = header_string(&req, "user-agent");

    let mut response = match check_http_method(&method) {
        Some(resp) => resp,
        None => match check_body_size(&req, state.config.http.max_body_size) {
            Some(resp) => resp,
            None => {
                let ctx = RequestContext {
                    path: &path,
                    is_head,
                };
                route_request(&ctx, &state).await
            }
        },
    };

    // Every response leaves with the cache-disabling triple, whatever
    // its status
    http::apply_no_cache(&mut response);
    apply_server_name(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        let mut entry = logger::AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            path.clone(),
        );
        entry.query = query;
        entry.http_version = version.to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = if is_head { 0 } else { body_bytes(&response) };
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on the resolved filesystem outcome
pub async fn route_request(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    match resolve::resolve_path(&state.root, ctx.path, &state.config.files.index_files) {
        Resolved::File(path) => static_files::serve_file(&path, ctx.is_head).await,
        Resolved::Listing(dir) => listing::serve_listing(&dir, ctx.path, ctx.is_head).await,
        Resolved::Redirect(location) => http::build_redirect_response(&location),
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Check HTTP method; only GET and HEAD reach the responder
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    if *method == Method::GET || *method == Method::HEAD {
        None
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        Some(http::build_405_response())
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Stamp the configured Server header on an outgoing response
fn apply_server_name<B>(response: &mut Response<B>, server_name: &str) {
    let value = HeaderValue::from_str(server_name)
        .unwrap_or_else(|_| HeaderValue::from_static("nocache-server"));
    response.headers_mut().insert(SERVER, value);
}

/// Response body size as reported by Content-Length
fn body_bytes<B>(response: &Response<B>) -> usize {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
