//! Response middleware shared by every route.

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

pub const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Tag every response with an `x-request-id`, reusing the caller's when it
/// sent one, so browser reports can be matched to portal logs.
pub async fn request_id(req: Request, next: Next) -> Response {
    let req_id = req
        .headers()
        .get(&REQUEST_ID)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .cloned()
        .or_else(|| HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()).ok());

    let span = tracing::debug_span!(
        "request",
        request_id = req_id.as_ref().and_then(|v| v.to_str().ok()).unwrap_or_default()
    );
    let mut resp = next.run(req).instrument(span).await;
    if let Some(val) = req_id {
        resp.headers_mut().insert(REQUEST_ID, val);
    }
    resp
}

/// Hardening headers for server-rendered pages.
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    // Pages embed session-specific data.
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    // Keep the OAuth code and state out of third-party Referer headers.
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; style-src 'self' 'unsafe-inline'; frame-ancestors 'none'",
        ),
    );
    headers.remove(header::SERVER);

    resp
}
