use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::pages;
use crate::routes::found;
use crate::session;

/// Failure talking to auth9-core.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("auth9-core returned {status}: {message}")]
    Status {
        status: StatusCode,
        error: String,
        message: String,
    },

    #[error("request to auth9-core failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    #[error("invalid response from auth9-core: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(reqwest_middleware::Error::Reqwest(e))
    }
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message safe to show in the UI.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Status { status, .. } => format!("Request failed ({})", status.as_u16()),
            ApiError::Transport(_) => "The Auth9 API is unreachable. Try again shortly.".into(),
            ApiError::Decode(_) => "The Auth9 API returned an unexpected response.".into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("authentication required")]
    Unauthenticated,

    /// The session's tokens expired and could not be refreshed.
    #[error("session expired")]
    SessionExpired,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("session error: {0}")]
    Session(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, title, msg) = match &self {
            PortalError::Unauthenticated => return login_redirect("/login"),
            PortalError::SessionExpired => {
                return login_redirect(&LoginError::SessionExpired.login_path())
            }
            PortalError::Api(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => {
                tracing::info!("auth9-core rejected the session token, signing out");
                return login_redirect("/login");
            }
            PortalError::Api(e) if e.status() == Some(StatusCode::NOT_FOUND) => (
                StatusCode::NOT_FOUND,
                "Not found",
                "The requested resource does not exist.".to_string(),
            ),
            PortalError::Api(e) => {
                tracing::error!("auth9-core call failed: {}", e);
                (StatusCode::BAD_GATEWAY, "Service unavailable", e.user_message())
            }
            PortalError::Session(e) => {
                tracing::error!("Session error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "internal server error".to_string(),
                )
            }
            PortalError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "internal server error".to_string(),
                )
            }
        };

        (status, pages::error::render(status, title, &msg)).into_response()
    }
}

/// 302 to the login page, dropping whatever session cookie the browser holds.
fn login_redirect(location: &str) -> Response {
    let mut resp = found(location);
    resp.headers_mut()
        .append(header::SET_COOKIE, session::expired_session_cookie());
    resp
}

/// Error codes carried to the login page as `?error=<code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    AccessDenied,
    TokenExchangeFailed,
    CallbackException,
    InvalidState,
    SessionExpired,
}

impl LoginError {
    pub fn code(&self) -> &'static str {
        match self {
            LoginError::AccessDenied => "access_denied",
            LoginError::TokenExchangeFailed => "token_exchange_failed",
            LoginError::CallbackException => "callback_exception",
            LoginError::InvalidState => "invalid_state",
            LoginError::SessionExpired => "session_expired",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "access_denied" => Some(LoginError::AccessDenied),
            "token_exchange_failed" => Some(LoginError::TokenExchangeFailed),
            "callback_exception" => Some(LoginError::CallbackException),
            "invalid_state" => Some(LoginError::InvalidState),
            "session_expired" => Some(LoginError::SessionExpired),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LoginError::AccessDenied => "Sign-in was cancelled or denied.",
            LoginError::TokenExchangeFailed => "We could not complete sign-in. Please try again.",
            LoginError::CallbackException => "An unexpected error occurred during sign-in.",
            LoginError::InvalidState => "Your sign-in request expired. Please start again.",
            LoginError::SessionExpired => "Your session has expired. Please sign in again.",
        }
    }

    /// `/login?error=<code>`
    pub fn login_path(&self) -> String {
        format!("/login?error={}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_codes_roundtrip() {
        for e in [
            LoginError::AccessDenied,
            LoginError::TokenExchangeFailed,
            LoginError::CallbackException,
            LoginError::InvalidState,
            LoginError::SessionExpired,
        ] {
            assert_eq!(LoginError::from_code(e.code()), Some(e));
        }
        assert_eq!(LoginError::from_code("nope"), None);
    }

    #[test]
    fn test_login_path() {
        assert_eq!(
            LoginError::TokenExchangeFailed.login_path(),
            "/login?error=token_exchange_failed"
        );
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let resp = PortalError::Unauthenticated.into_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[header::LOCATION], "/login");
        let cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("auth9_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_session_expired_redirects_with_code() {
        let resp = PortalError::SessionExpired.into_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[header::LOCATION], "/login?error=session_expired");
        let cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("auth9_session=;"));
    }

    #[test]
    fn test_api_401_redirects_to_login() {
        let err = PortalError::Api(ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized".into(),
            message: "Invalid or expired token".into(),
        });
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[header::LOCATION], "/login");
    }

    #[test]
    fn test_api_404_renders_not_found() {
        let err = PortalError::Api(ApiError::Status {
            status: StatusCode::NOT_FOUND,
            error: "not_found".into(),
            message: "Service not found".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_api_errors_are_bad_gateway() {
        let err = PortalError::Api(ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "internal_error".into(),
            message: String::new(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_user_message_falls_back_to_status() {
        let err = ApiError::Status {
            status: StatusCode::CONFLICT,
            error: "conflict".into(),
            message: String::new(),
        };
        assert_eq!(err.user_message(), "Request failed (409)");
    }
}
