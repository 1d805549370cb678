#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tower::ServiceExt;
use wiremock::MockServer;

use portal::config::Config;
use portal::models::TokenResponse;
use portal::session::Session;
use portal::AppState;

/// A portal wired to a mock auth9-core.
pub struct TestPortal {
    pub core: MockServer,
    pub state: Arc<AppState>,
    pub app: Router,
}

impl TestPortal {
    pub async fn start() -> Self {
        let core = MockServer::start().await;
        let state = Arc::new(AppState::new(Config::for_backend(&core.uri())).unwrap());
        let app = portal::routes::router(state.clone());
        Self { core, state, app }
    }

    /// `auth9_session=<sealed>` for a session whose access token is valid for
    /// `expires_in` seconds from now (negative for an already expired one).
    pub fn session_cookie(&self, access_token: &str, refresh_token: Option<&str>, expires_in: i64) -> String {
        let session = Session {
            access_token: access_token.into(),
            refresh_token: refresh_token.map(String::from),
            id_token: Some("id-token-1".into()),
            expires_at: chrono::Utc::now().timestamp() + expires_in,
        };
        let set_cookie = self.state.sessions.commit_session(&session).unwrap();
        cookie_pair(set_cookie.to_str().unwrap())
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        self.app.clone().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
    }

    pub async fn post_form(&self, uri: &str, cookie: Option<&str>, form: &str) -> Response<Body> {
        let mut req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        self.app
            .clone()
            .oneshot(req.body(Body::from(form.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// Open a session cookie the portal set, as the browser would send it back.
    pub fn read_session(&self, cookie: &str) -> Option<Session> {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(header::COOKIE, cookie.parse().unwrap());
        self.state.sessions.get_session(&headers)
    }
}

/// `name=value` part of a `Set-Cookie` header.
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_string()
}

pub fn set_cookies(resp: &Response<Body>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

pub fn location(resp: &Response<Body>) -> &str {
    resp.headers()[header::LOCATION].to_str().unwrap()
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn token_json(access_token: &str) -> serde_json::Value {
    serde_json::to_value(TokenResponse {
        access_token: access_token.into(),
        token_type: "Bearer".into(),
        expires_in: 3600,
        refresh_token: Some(format!("{access_token}-refresh")),
        id_token: Some(format!("{access_token}-id")),
    })
    .unwrap()
}
