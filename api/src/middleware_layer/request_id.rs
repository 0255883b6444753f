//! Per-request tracing span keyed by `X-Request-Id`.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{Instrument, info, info_span};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Incoming `X-Request-Id` if usable, otherwise a timestamp-based id.
fn request_id(req: &Request<Body>) -> String {
    if let Some(v) = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return v.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    format!("req-{nanos}")
}

/// Wraps the request in a span and echoes the id back in the response.
pub async fn request_span(req: Request<Body>, next: Next) -> Response {
    let id = request_id(&req);
    let span = info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path()
    );

    let started = Instant::now();
    let mut res = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = res.status().as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "request finished"
        )
    });
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
