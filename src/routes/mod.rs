//! Browser-facing routes: loaders (GET) and form actions (POST).

pub mod auth;
pub mod dashboard;
pub mod home;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the portal router with its middleware stack.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/healthz", get(|| async { "ok" }))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::index))
        .route("/dashboard/audit-logs", get(dashboard::audit_logs))
        .route("/dashboard/services", get(services::list))
        .route(
            "/dashboard/services/:id",
            get(services::detail).post(services::action),
        )
        .fallback(fallback_404)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(crate::middleware::request_id))
        .layer(middleware::from_fn(crate::middleware::security_headers))
}

async fn fallback_404() -> Response {
    (
        StatusCode::NOT_FOUND,
        crate::pages::error::render(
            StatusCode::NOT_FOUND,
            "Not found",
            "There is no page at this address.",
        ),
    )
        .into_response()
}

/// 302 Found, the status the login flow redirects with.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// 303 See Other, used after a form action so a reload does not resubmit.
pub fn see_other(location: &str) -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, location.to_string())]).into_response()
}
