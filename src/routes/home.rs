use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, response::Html};

use crate::pages;
use crate::AppState;

/// GET /: static landing page.
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let signed_in = state.sessions.get_session(&headers).is_some();
    Html(pages::landing::render(signed_in))
}
