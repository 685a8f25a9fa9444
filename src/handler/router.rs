//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method and size checks, body
//! collection, then dispatch to a guarded page handler on the blocking pool.

use crate::config::AppState;
use crate::handler::pages;
use crate::http::{self, form};
use crate::logger::{self, AccessLogEntry};
use crate::routing::Operation;
use http_body_util::{BodyExt, Full, Limited};
use percent_encoding::percent_decode_str;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request data a page handler may look at
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    /// Urlencoded form body; empty for other content types
    pub form: Bytes,
}

impl PageRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            form: Bytes::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, form: impl Into<Bytes>) -> Self {
        Self {
            form: form.into(),
            ..Self::new(Method::POST, path)
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    /// Form field from the body, falling back to the query string
    pub fn form_value(&self, key: &str) -> Option<Vec<u8>> {
        form::form_value(&self.form, self.query.as_deref(), key)
    }
}

/// Operation handler, called only with a validated title
pub type PageHandler = fn(&PageRequest, &AppState, &str) -> Response<Full<Bytes>>;

/// Wrap an operation handler so the path is validated on every call
///
/// An invalid path answers 404 and the wrapped handler never runs.
pub fn make_handler(
    handler: PageHandler,
) -> impl Fn(&PageRequest, &AppState) -> Response<Full<Bytes>> + Copy + Send + 'static {
    move |req: &PageRequest, state: &AppState| match state.validator.title(&req.path) {
        Some(title) => handler(req, state, title),
        None => http::build_404_response(),
    }
}

/// Route a collected request to its operation
///
/// Synchronous: page handlers perform blocking store I/O.
pub fn dispatch(req: &PageRequest, state: &AppState) -> Response<Full<Bytes>> {
    if let Some(resp) = check_http_method(&req.method) {
        return resp;
    }

    match Operation::for_path(&req.path) {
        Some(op) => make_handler(pages::handler_for(op))(req, state),
        None => http::build_404_response(),
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format_version(req.version());
    entry.referer = header_string(&req, REFERER);
    entry.user_agent = header_string(&req, USER_AGENT);

    let early = check_http_method(req.method())
        .or_else(|| check_body_size(&req, state.config.http.max_body_size));
    let mut response = match early {
        Some(resp) => resp,
        None => match read_page_request(req, state.config.http.max_body_size).await {
            Ok(page_req) => run_handler(page_req, Arc::clone(&state)).await,
            Err(resp) => resp,
        },
    };

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if state.access_log() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response_len(&response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }
    Ok(response)
}

/// Run the dispatcher on the blocking pool
async fn run_handler(req: PageRequest, state: Arc<AppState>) -> Response<Full<Bytes>> {
    match tokio::task::spawn_blocking(move || dispatch(&req, &state)).await {
        Ok(resp) => resp,
        Err(e) => {
            logger::log_error(&format!("Page handler task failed: {e}"));
            http::build_500_response("internal server error")
        }
    }
}

/// Collect the request into a `PageRequest`, enforcing the body limit
async fn read_page_request(
    req: Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Result<PageRequest, Response<Full<Bytes>>> {
    let (parts, body) = req.into_parts();
    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let wants_form = parts.method == Method::POST && form::is_urlencoded(content_type);

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let collected = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
                logger::log_error(&format!(
                    "Request body exceeds limit of {max_body_size} bytes"
                ));
                return Err(http::build_413_response());
            }
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Err(http::build_500_response("failed to read request body"));
        }
    };

    Ok(PageRequest {
        path: decode_path(parts.uri.path()),
        query: parts.uri.query().map(ToString::to_string),
        form: if wants_form { collected } else { Bytes::new() },
        method: parts.method,
    })
}

/// Return 405 for methods outside GET/HEAD/POST
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD | Method::POST => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
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

/// Percent-decode the request path before it is validated
///
/// Bytes that do not form UTF-8 become U+FFFD and so never validate.
fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// `HTTP/1.1` -> `1.1`
fn format_version(version: hyper::Version) -> String {
    format!("{version:?}").trim_start_matches("HTTP/").to_string()
}

fn response_len(resp: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body;
    resp.body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}
