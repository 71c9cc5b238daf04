//! Request logging middleware.
//!
//! Logs every HTTP request with method, path, query, status code, and latency.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Level;

/// Paths served without a log line.
const QUIET_PATHS: &[&str] = &["/api/health"];

macro_rules! request_event {
    ($level:expr, $method:ident, $path:ident, $query:ident, $status:ident, $latency_ms:ident) => {
        tracing::event!(
            $level,
            method = %$method,
            path = %$path,
            query = %$query,
            status = $status,
            latency_ms = $latency_ms,
            "Request completed"
        )
    };
}

/// Middleware that logs HTTP requests with timing information.
///
/// Server errors are logged at WARN, everything else at INFO.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or_default().to_string();

    if QUIET_PATHS.contains(&path.as_str()) {
        return next.run(request).await;
    }

    let start = Instant::now();
    let response = next.run(request).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        request_event!(Level::WARN, method, path, query, status, latency_ms);
    } else {
        request_event!(Level::INFO, method, path, query, status, latency_ms);
    }

    response
}
