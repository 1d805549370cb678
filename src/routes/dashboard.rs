use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use super::found;
use crate::errors::PortalError;
use crate::models::{audit::AuditLogQuery, pagination::page_to_offset};
use crate::pages;
use crate::session::require_auth_with_update;
use crate::AppState;

pub const AUDIT_LOGS_PER_PAGE: i64 = 50;

/// `?page=N`. Anything unparseable falls back to the first page.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

/// GET /dashboard
pub async fn index() -> Response {
    found(pages::services::LIST_PATH)
}

/// GET /dashboard/audit-logs
pub async fn audit_logs(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Response, PortalError> {
    let auth = require_auth_with_update(&state, &headers).await?;

    let query = AuditLogQuery {
        limit: Some(AUDIT_LOGS_PER_PAGE),
        offset: Some(page_to_offset(params.page(), AUDIT_LOGS_PER_PAGE)),
    };
    let logs = state
        .api
        .list_audit_logs(auth.access_token(), &query)
        .await?;

    tracing::debug!(count = logs.data.len(), total = logs.pagination.total, "loaded audit logs");
    Ok(auth.apply(Html(pages::audit_logs::render(&logs)).into_response()))
}
