//! Cookie-backed login sessions.
//!
//! The whole session (tokens + expiry) lives in one sealed `auth9_session`
//! cookie; the portal keeps no server-side session table.

pub mod sealed;

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::PortalError;
use crate::models::TokenResponse;
use crate::AppState;

pub use sealed::cookie_value;
use sealed::{build_cookie, CookieSealer};

pub const SESSION_COOKIE: &str = "auth9_session";
pub const STATE_COOKIE: &str = "auth9_oauth_state";

const STATE_MAX_AGE_SECS: u64 = 300;
/// Tokens this close to expiry are treated as expired.
const EXPIRY_SKEW_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    /// Unix timestamp (seconds) at which `access_token` expires.
    pub expires_at: i64,
}

impl Session {
    pub fn from_token_response(resp: TokenResponse, now: i64) -> Self {
        Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            id_token: resp.id_token,
            expires_at: now + resp.expires_in.max(0),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now + EXPIRY_SKEW_SECS >= self.expires_at
    }

    /// Apply a refresh response. The backend may omit tokens it did not rotate.
    pub fn refreshed(&self, resp: TokenResponse, now: i64) -> Self {
        Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token.or_else(|| self.refresh_token.clone()),
            id_token: resp.id_token.or_else(|| self.id_token.clone()),
            expires_at: now + resp.expires_in.max(0),
        }
    }
}

/// Reads and writes the session cookie.
pub struct SessionStore {
    sealer: CookieSealer,
    max_age: u64,
    secure: bool,
}

impl SessionStore {
    pub fn new(secret: &str, max_age: u64, secure: bool) -> anyhow::Result<Self> {
        Ok(Self {
            sealer: CookieSealer::new(secret)?,
            max_age,
            secure,
        })
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        Self::new(&cfg.session_secret, cfg.session_max_age, cfg.secure_cookies())
    }

    pub fn get_session(&self, headers: &HeaderMap) -> Option<Session> {
        let raw = cookie_value(headers, SESSION_COOKIE)?;
        let plaintext = self.sealer.open(raw)?;
        match serde_json::from_slice(&plaintext) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("discarding unreadable session cookie: {}", e);
                None
            }
        }
    }

    /// `Set-Cookie` value persisting `session`.
    pub fn commit_session(&self, session: &Session) -> anyhow::Result<HeaderValue> {
        let json = serde_json::to_vec(session)?;
        let sealed = self.sealer.seal(&json)?;
        build_cookie(SESSION_COOKIE, &sealed, self.max_age, self.secure)
    }

    pub fn destroy_session(&self) -> HeaderValue {
        expired_session_cookie()
    }

    pub fn state_cookie(&self, state: &str) -> anyhow::Result<HeaderValue> {
        build_cookie(STATE_COOKIE, state, STATE_MAX_AGE_SECS, self.secure)
    }

    pub fn clear_state_cookie(&self) -> HeaderValue {
        HeaderValue::from_static("auth9_oauth_state=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

pub fn expired_session_cookie() -> HeaderValue {
    HeaderValue::from_static("auth9_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// An authenticated request's session, plus the cookie to send back when
/// the tokens were refreshed while loading it.
#[derive(Debug)]
pub struct AuthSession {
    pub session: Session,
    pub set_cookie: Option<HeaderValue>,
}

impl AuthSession {
    pub fn access_token(&self) -> &str {
        &self.session.access_token
    }

    /// Attach the refreshed session cookie, if any, to `resp`.
    pub fn apply(&self, mut resp: Response) -> Response {
        if let Some(cookie) = &self.set_cookie {
            resp.headers_mut().append(header::SET_COOKIE, cookie.clone());
        }
        resp
    }
}

/// Load the session for a dashboard request, refreshing expired tokens.
///
/// Fails with `Unauthenticated` when there is no session and with
/// `SessionExpired` when its tokens can no longer be refreshed; the error
/// handler turns both into a redirect to the login page.
pub async fn require_auth_with_update(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthSession, PortalError> {
    let session = state
        .sessions
        .get_session(headers)
        .ok_or(PortalError::Unauthenticated)?;

    let now = chrono::Utc::now().timestamp();
    if !session.is_expired(now) {
        return Ok(AuthSession {
            session,
            set_cookie: None,
        });
    }

    let Some(refresh_token) = session.refresh_token.as_deref() else {
        tracing::debug!("session expired and no refresh token is available");
        return Err(PortalError::SessionExpired);
    };

    match state.api.refresh_token(refresh_token).await {
        Ok(resp) => {
            let refreshed = session.refreshed(resp, now);
            let cookie = state
                .sessions
                .commit_session(&refreshed)
                .map_err(|e| PortalError::Session(e.to_string()))?;
            tracing::debug!("refreshed expired session");
            Ok(AuthSession {
                session: refreshed,
                set_cookie: Some(cookie),
            })
        }
        Err(e) => {
            tracing::warn!("session refresh failed: {}", e);
            Err(PortalError::SessionExpired)
        }
    }
}
