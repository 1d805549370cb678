use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use super::dashboard::PageParams;
use super::see_other;
use crate::errors::PortalError;
use crate::pages::{self, services::Notice};
use crate::session::{require_auth_with_update, AuthSession};
use crate::AppState;

pub const SERVICES_PER_PAGE: i64 = 20;

/// Fields posted by the forms on the service detail page.
#[derive(Debug, Default, Deserialize)]
pub struct ActionForm {
    pub intent: Option<String>,
    pub client_id: Option<String>,
    pub name: Option<String>,
}

/// GET /dashboard/services
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Response, PortalError> {
    let auth = require_auth_with_update(&state, &headers).await?;
    let services = state
        .api
        .list_services(auth.access_token(), params.page(), SERVICES_PER_PAGE)
        .await?;
    Ok(auth.apply(Html(pages::services::render_list(&services)).into_response()))
}

/// GET /dashboard/services/:id
pub async fn detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, PortalError> {
    let auth = require_auth_with_update(&state, &headers).await?;
    render_detail(&state, &auth, &id, None, StatusCode::OK).await
}

/// POST /dashboard/services/:id: client management, dispatched on `intent`.
pub async fn action(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Result<Response, PortalError> {
    let auth = require_auth_with_update(&state, &headers).await?;
    let token = auth.access_token();

    let outcome = match form.intent.as_deref() {
        Some("create_client") => {
            let name = form.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
            state
                .api
                .create_client(token, &id, name)
                .await
                .map(|created| {
                    tracing::info!(service_id = %id, client_id = %created.client.client_id, "client created");
                    Notice::NewSecret {
                        client_id: created.client.client_id,
                        client_secret: created.client_secret,
                    }
                })
        }
        Some("regenerate_secret") => {
            let Some(client_id) = posted_client_id(&form) else {
                return missing_client_id(&state, &auth, &id).await;
            };
            state
                .api
                .regenerate_client_secret(token, &id, client_id)
                .await
                .map(|regenerated| {
                    tracing::info!(service_id = %id, client_id = %client_id, "client secret regenerated");
                    Notice::NewSecret {
                        client_id: regenerated.client_id,
                        client_secret: regenerated.client_secret,
                    }
                })
        }
        Some("delete_client") => {
            let Some(client_id) = posted_client_id(&form) else {
                return missing_client_id(&state, &auth, &id).await;
            };
            match state.api.delete_client(token, &id, client_id).await {
                Ok(()) => {
                    tracing::info!(service_id = %id, client_id = %client_id, "client deleted");
                    let location = format!(
                        "{}/{}",
                        pages::services::LIST_PATH,
                        urlencoding::encode(&id)
                    );
                    return Ok(auth.apply(see_other(&location)));
                }
                Err(e) => Err(e),
            }
        }
        other => {
            tracing::warn!(intent = ?other, "unknown service action");
            let notice = Notice::Error("Unknown action".into());
            return render_detail(&state, &auth, &id, Some(&notice), StatusCode::BAD_REQUEST)
                .await;
        }
    };

    let notice = match outcome {
        Ok(notice) => notice,
        Err(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => return Err(e.into()),
        Err(e) => {
            tracing::warn!(service_id = %id, "service action failed: {}", e);
            Notice::Error(e.user_message())
        }
    };
    render_detail(&state, &auth, &id, Some(&notice), StatusCode::OK).await
}

fn posted_client_id(form: &ActionForm) -> Option<&str> {
    form.client_id.as_deref().map(str::trim).filter(|c| !c.is_empty())
}

async fn missing_client_id(
    state: &AppState,
    auth: &AuthSession,
    id: &str,
) -> Result<Response, PortalError> {
    let notice = Notice::Error("Missing client ID".into());
    render_detail(state, auth, id, Some(&notice), StatusCode::BAD_REQUEST).await
}

/// Load the service and its clients concurrently and render the detail page.
async fn render_detail(
    state: &AppState,
    auth: &AuthSession,
    id: &str,
    notice: Option<&Notice>,
    status: StatusCode,
) -> Result<Response, PortalError> {
    let token = auth.access_token();
    let (service, clients) = tokio::try_join!(
        state.api.get_service(token, id),
        state.api.list_clients(token, id),
    )?;

    let html = pages::services::render_detail(&service, &clients, notice);
    Ok(auth.apply((status, Html(html)).into_response()))
}
