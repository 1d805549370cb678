use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use super::found;
use crate::errors::{ApiError, LoginError, PortalError};
use crate::pages;
use crate::session::{cookie_value, Session, STATE_COOKIE};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub error: Option<String>,
}

/// Query string the identity provider sends back to `/auth/callback`.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    /// Left over from an implicit-flow redirect; never used.
    pub access_token: Option<String>,
}

/// GET /login
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<LoginParams>,
) -> Response {
    if params.error.is_none() && state.sessions.get_session(&headers).is_some() {
        return found("/dashboard");
    }
    Html(pages::login::render(params.error.as_deref())).into_response()
}

/// POST /login: start the authorization-code flow.
pub async fn login(State(state): State<Arc<AppState>>) -> Result<Response, PortalError> {
    let oauth_state = uuid::Uuid::new_v4().simple().to_string();
    let authorize_url = state.api.authorize_url(&oauth_state)?;
    let cookie = state.sessions.state_cookie(&oauth_state)?;

    let mut resp = found(&authorize_url);
    resp.headers_mut().append(header::SET_COOKIE, cookie);
    Ok(resp)
}

/// GET /auth/callback: exchange the authorization code for a session.
///
/// Every outcome is a redirect; failures land on `/login?error=<code>`.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(e) => {
            tracing::warn!("malformed callback query: {}", e);
            return found(&LoginError::CallbackException.login_path());
        }
    };

    if let Some(error) = params.error.as_deref() {
        tracing::warn!(
            error = %error,
            description = ?params.error_description,
            "authorization request was denied"
        );
        return found(&LoginError::AccessDenied.login_path());
    }

    let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) else {
        if params.access_token.is_some() {
            tracing::debug!("dropping implicit-flow access_token from callback URL");
        }
        return found("/login");
    };

    if let (Some(expected), Some(received)) =
        (cookie_value(&headers, STATE_COOKIE), params.state.as_deref())
    {
        if expected != received {
            tracing::warn!("OAuth state mismatch on callback");
            return found(&LoginError::InvalidState.login_path());
        }
    }

    let tokens = match state.api.exchange_code(code).await {
        Ok(tokens) => tokens,
        Err(ApiError::Status { status, error, .. }) => {
            tracing::warn!(status = %status, error = %error, "token exchange rejected");
            return found(&LoginError::TokenExchangeFailed.login_path());
        }
        Err(e) => {
            tracing::error!("token exchange failed: {}", e);
            return found(&LoginError::CallbackException.login_path());
        }
    };

    let session = Session::from_token_response(tokens, chrono::Utc::now().timestamp());
    let cookie = match state.sessions.commit_session(&session) {
        Ok(cookie) => cookie,
        Err(e) => {
            tracing::error!("failed to commit session: {:#}", e);
            return found(&LoginError::CallbackException.login_path());
        }
    };

    tracing::info!("login completed");
    let mut resp = found("/dashboard");
    let headers = resp.headers_mut();
    headers.append(header::SET_COOKIE, cookie);
    headers.append(header::SET_COOKIE, state.sessions.clear_state_cookie());
    resp
}

/// POST /logout: drop the session and end the identity-provider session.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let id_token = state
        .sessions
        .get_session(&headers)
        .and_then(|s| s.id_token);

    let target = match state.api.logout_url(id_token.as_deref()) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("failed to build logout URL: {:#}", e);
            "/login".to_string()
        }
    };

    let mut resp = found(&target);
    resp.headers_mut()
        .append(header::SET_COOKIE, state.sessions.destroy_session());
    resp
}
