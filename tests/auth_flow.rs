//! Login, OAuth callback and logout, driven through the router against a
//! mock auth9-core.

mod common;

use axum::http::StatusCode;
use common::{body_string, cookie_pair, location, set_cookies, token_json, TestPortal};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_landing_page_offers_sign_in() {
    let portal = TestPortal::start().await;
    let resp = portal.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("action=\"/login\""));
    assert!(!html.contains("Go to dashboard"));
}

#[tokio::test]
async fn test_landing_page_links_dashboard_when_signed_in() {
    let portal = TestPortal::start().await;
    let cookie = portal.session_cookie("tok", None, 3600);
    let html = body_string(portal.get("/", Some(&cookie)).await).await;
    assert!(html.contains("href=\"/dashboard\""));
}

#[tokio::test]
async fn test_login_page_shows_error_message() {
    let portal = TestPortal::start().await;
    let resp = portal.get("/login?error=token_exchange_failed", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("We could not complete sign-in."));
}

#[tokio::test]
async fn test_login_page_redirects_signed_in_users() {
    let portal = TestPortal::start().await;
    let cookie = portal.session_cookie("tok", None, 3600);
    let resp = portal.get("/login", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/dashboard");
}

#[tokio::test]
async fn test_login_action_redirects_to_authorize_with_state_cookie() {
    let portal = TestPortal::start().await;
    let resp = portal.post_form("/login", None, "").await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let target = url::Url::parse(location(&resp)).unwrap();
    assert_eq!(target.path(), "/api/v1/auth/authorize");
    let pairs: std::collections::HashMap<_, _> = target.query_pairs().into_owned().collect();
    assert_eq!(pairs["response_type"], "code");
    assert_eq!(pairs["client_id"], "auth9-portal");
    assert_eq!(pairs["redirect_uri"], "http://localhost:3000/auth/callback");

    let cookies = set_cookies(&resp);
    let state_cookie = cookies
        .iter()
        .find(|c| c.starts_with("auth9_oauth_state="))
        .expect("state cookie set");
    assert_eq!(cookie_pair(state_cookie), format!("auth9_oauth_state={}", pairs["state"]));
    assert!(state_cookie.contains("Max-Age=300"));
}

#[tokio::test]
async fn test_callback_provider_error_is_access_denied() {
    let portal = TestPortal::start().await;
    let resp = portal
        .get("/auth/callback?error=access_denied&error_description=nope", None)
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login?error=access_denied");
}

#[tokio::test]
async fn test_callback_without_code_goes_to_login() {
    let portal = TestPortal::start().await;
    let resp = portal.get("/auth/callback", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn test_callback_access_token_only_is_dropped() {
    let portal = TestPortal::start().await;
    let resp = portal.get("/auth/callback?access_token=leaked", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login");
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn test_callback_malformed_query_still_redirects() {
    let portal = TestPortal::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("tok")))
        .expect(0)
        .mount(&portal.core)
        .await;

    let resp = portal.get("/auth/callback?code=a&code=b", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login?error=callback_exception");
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn test_callback_state_mismatch() {
    let portal = TestPortal::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("tok")))
        .expect(0)
        .mount(&portal.core)
        .await;

    let resp = portal
        .get("/auth/callback?code=abc&state=other", Some("auth9_oauth_state=expected"))
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login?error=invalid_state");
}

#[tokio::test]
async fn test_callback_exchanges_code_and_sets_session() {
    let portal = TestPortal::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .and(body_json(serde_json::json!({
            "grant_type": "authorization_code",
            "code": "abc",
            "client_id": "auth9-portal",
            "redirect_uri": "http://localhost:3000/auth/callback"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("tok-1")))
        .expect(1)
        .mount(&portal.core)
        .await;

    let resp = portal
        .get("/auth/callback?code=abc&state=s1", Some("auth9_oauth_state=s1"))
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/dashboard");

    let cookies = set_cookies(&resp);
    let session_cookie = cookies
        .iter()
        .find(|c| c.starts_with("auth9_session="))
        .expect("session cookie set");
    assert!(session_cookie.contains("HttpOnly"));
    assert!(!session_cookie.contains("tok-1"));
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("auth9_oauth_state=;") && c.contains("Max-Age=0")));

    let session = portal.read_session(&cookie_pair(session_cookie)).unwrap();
    assert_eq!(session.access_token, "tok-1");
    assert_eq!(session.refresh_token.as_deref(), Some("tok-1-refresh"));
    assert_eq!(session.id_token.as_deref(), Some("tok-1-id"));
}

#[tokio::test]
async fn test_callback_without_state_cookie_still_exchanges() {
    let portal = TestPortal::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("tok")))
        .expect(1)
        .mount(&portal.core)
        .await;

    let resp = portal.get("/auth/callback?code=abc&state=s1", None).await;
    assert_eq!(location(&resp), "/dashboard");
}

#[tokio::test]
async fn test_callback_rejected_exchange() {
    let portal = TestPortal::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "message": "Invalid authorization code"
        })))
        .expect(1)
        .mount(&portal.core)
        .await;

    let resp = portal.get("/auth/callback?code=bad", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login?error=token_exchange_failed");
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn test_callback_unreadable_token_response() {
    let portal = TestPortal::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&portal.core)
        .await;

    let resp = portal.get("/auth/callback?code=abc", None).await;
    assert_eq!(location(&resp), "/login?error=callback_exception");
}

#[tokio::test]
async fn test_callback_unreachable_backend() {
    let mut cfg = portal::config::Config::for_backend("http://127.0.0.1:1");
    cfg.api_timeout_secs = 1;
    let app = portal::app(cfg).unwrap();

    use tower::ServiceExt;
    let resp = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/auth/callback?code=abc")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login?error=callback_exception");
}

#[tokio::test]
async fn test_logout_clears_session_and_redirects_to_provider() {
    let portal = TestPortal::start().await;
    let cookie = portal.session_cookie("tok", None, 3600);
    let resp = portal.post_form("/logout", Some(&cookie), "").await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let target = location(&resp);
    assert!(target.starts_with(&format!("{}/api/v1/auth/logout?", portal.core.uri())));
    assert!(target.contains("id_token_hint=id-token-1"));

    let cookies = set_cookies(&resp);
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("auth9_session=;") && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn test_logout_without_session_omits_hint() {
    let portal = TestPortal::start().await;
    let resp = portal.post_form("/logout", None, "").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(!location(&resp).contains("id_token_hint"));
}

#[tokio::test]
async fn test_healthz_and_headers() {
    let portal = TestPortal::start().await;
    let resp = portal.get("/healthz", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let portal = TestPortal::start().await;
    let resp = portal.get("/nope", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
