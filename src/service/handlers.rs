//! HTTP request handlers.
//!
//! Requests are dispatched by exact path: the health and metrics paths are
//! served directly, every other path falls through to the root handler.

use crate::metrics::{self, encode_metrics};
use crate::state::AppState;
use crate::util::{RequestId, REQUEST_ID_HEADER};
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::time::{Instant, SystemTime};
use tracing::{debug, error};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Greeting prefix of the root route.
pub const GREETING: &str = "Hello from Sample Microservice! Request Path: ";

/// Route selected for a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    Metrics,
    Root,
}

impl Route {
    /// Resolve `path` against the configured health and metrics paths.
    pub fn resolve(path: &str, state: &AppState) -> Self {
        if path == state.health_path() {
            Route::Health
        } else if path == state.metrics_path() {
            Route::Metrics
        } else {
            Route::Root
        }
    }
}

/// Handle an incoming request.
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: AppState,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let request_id = RequestId::from_headers(req.headers());
    let path = req.uri().path().to_string();
    let route = Route::resolve(&path, &state);

    let mut response = match route {
        Route::Health => text_response(StatusCode::OK, "OK"),
        Route::Metrics => metrics_response(&state),
        Route::Root => root(&path, content_length(&req), &state).await,
    };

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    debug!(
        request_id = %request_id,
        method = %req.method(),
        path = %path,
        route = ?route,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis(),
        "request completed"
    );

    Ok(response)
}

/// Count the request, run the workload and greet the caller.
async fn root(path: &str, content_length: Option<u64>, state: &AppState) -> Response<Full<Bytes>> {
    let metrics = state.metrics();
    metrics.record_request(path);
    metrics.record_request_time(SystemTime::now());

    let delay = state.workload().delay(content_length);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    metrics.set_current_goroutines(state.workload().gauge_value(path));

    text_response(StatusCode::OK, format!("{}{}", GREETING, path))
}

fn metrics_response(state: &AppState) -> Response<Full<Bytes>> {
    match encode_metrics(state.metrics()) {
        Ok(buffer) => {
            let mut response = text_response(StatusCode::OK, buffer);
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(metrics::CONTENT_TYPE));
            response
        }
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics\n")
        }
    }
}

/// Declared content length, `None` when absent or not a non-negative integer.
fn content_length<B>(req: &Request<B>) -> Option<u64> {
    req.headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
    response
}
