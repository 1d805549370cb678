//! HTTP client for the auth9-core REST API.
//! Reads go through reqwest-middleware with transient-failure retries;
//! writes and the token exchange are sent exactly once.
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::audit::AuditLogQuery;
use crate::models::token::TokenRequest;
use crate::models::{
    AuditLogEntry, Client, ClientWithSecret, Envelope, Paginated, RegeneratedSecret, Service,
    TokenResponse,
};

const OIDC_SCOPES: &str = "openid profile email";

pub struct Auth9Client {
    base_url: String,
    public_url: String,
    client_id: String,
    redirect_uri: String,
    post_logout_redirect_uri: String,
    reads: ClientWithMiddleware,
    writes: reqwest::Client,
}

#[derive(Serialize)]
struct CreateClientBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct PageQuery {
    page: i64,
    per_page: i64,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

impl Auth9Client {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .pool_max_idle_per_host(16)
            .timeout(Duration::from_secs(cfg.api_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("auth9-portal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // 2 retries, 100ms..2s backoff. Only idempotent GETs use this client.
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(100), Duration::from_secs(2))
            .build_with_max_retries(2);
        let reads = ClientBuilder::new(http.clone())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            base_url: cfg.core_url.trim_end_matches('/').to_string(),
            public_url: cfg.core_public_url.trim_end_matches('/').to_string(),
            client_id: cfg.client_id.clone(),
            redirect_uri: cfg.redirect_uri(),
            post_logout_redirect_uri: cfg.portal_url.clone(),
            reads,
            writes: http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── OAuth ────────────────────────────────────────────────

    /// Browser URL that starts the authorization-code flow.
    pub fn authorize_url(&self, state: &str) -> anyhow::Result<String> {
        let mut url = url::Url::parse(&format!("{}/api/v1/auth/authorize", self.public_url))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", OIDC_SCOPES)
            .append_pair("state", state);
        Ok(url.into())
    }

    /// Browser URL that ends the identity-provider session.
    pub fn logout_url(&self, id_token_hint: Option<&str>) -> anyhow::Result<String> {
        let mut url = url::Url::parse(&format!("{}/api/v1/auth/logout", self.public_url))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("client_id", &self.client_id)
                .append_pair("post_logout_redirect_uri", &self.post_logout_redirect_uri);
            if let Some(hint) = id_token_hint {
                pairs.append_pair("id_token_hint", hint);
            }
        }
        Ok(url.into())
    }

    /// POST /api/v1/auth/token with `grant_type=authorization_code`.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, ApiError> {
        let body = TokenRequest::AuthorizationCode {
            code,
            client_id: &self.client_id,
            redirect_uri: &self.redirect_uri,
        };
        self.post_token(&body).await
    }

    /// POST /api/v1/auth/token with `grant_type=refresh_token`.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        let body = TokenRequest::RefreshToken {
            client_id: &self.client_id,
            refresh_token,
        };
        self.post_token(&body).await
    }

    async fn post_token(&self, body: &TokenRequest<'_>) -> Result<TokenResponse, ApiError> {
        let resp = self
            .writes
            .post(self.url("/api/v1/auth/token"))
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }

    // ── Audit logs ───────────────────────────────────────────

    pub async fn list_audit_logs(
        &self,
        token: &str,
        query: &AuditLogQuery,
    ) -> Result<Paginated<AuditLogEntry>, ApiError> {
        self.get_json_with_query("/api/v1/audit-logs", token, query)
            .await
    }

    // ── Services & clients ───────────────────────────────────

    pub async fn list_services(
        &self,
        token: &str,
        page: i64,
        per_page: i64,
    ) -> Result<Paginated<Service>, ApiError> {
        self.get_json_with_query("/api/v1/services", token, &PageQuery { page, per_page })
            .await
    }

    pub async fn get_service(&self, token: &str, id: &str) -> Result<Service, ApiError> {
        let path = format!("/api/v1/services/{}", urlencoding::encode(id));
        let env: Envelope<Service> = self.get_json(&path, token).await?;
        Ok(env.data)
    }

    pub async fn list_clients(&self, token: &str, service_id: &str) -> Result<Vec<Client>, ApiError> {
        let path = format!("/api/v1/services/{}/clients", urlencoding::encode(service_id));
        let env: Envelope<Vec<Client>> = self.get_json(&path, token).await?;
        Ok(env.data)
    }

    pub async fn create_client(
        &self,
        token: &str,
        service_id: &str,
        name: Option<&str>,
    ) -> Result<ClientWithSecret, ApiError> {
        let path = format!("/api/v1/services/{}/clients", urlencoding::encode(service_id));
        let resp = self
            .writes
            .post(self.url(&path))
            .bearer_auth(token)
            .json(&CreateClientBody { name })
            .send()
            .await?;
        let env: Envelope<ClientWithSecret> = decode(resp).await?;
        Ok(env.data)
    }

    pub async fn delete_client(
        &self,
        token: &str,
        service_id: &str,
        client_id: &str,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/api/v1/services/{}/clients/{}",
            urlencoding::encode(service_id),
            urlencoding::encode(client_id)
        );
        let resp = self
            .writes
            .delete(self.url(&path))
            .bearer_auth(token)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await?;
            return Err(status_error(status, &body));
        }
        Ok(())
    }

    pub async fn regenerate_client_secret(
        &self,
        token: &str,
        service_id: &str,
        client_id: &str,
    ) -> Result<RegeneratedSecret, ApiError> {
        let path = format!(
            "/api/v1/services/{}/clients/{}/regenerate-secret",
            urlencoding::encode(service_id),
            urlencoding::encode(client_id)
        );
        let resp = self
            .writes
            .post(self.url(&path))
            .bearer_auth(token)
            .send()
            .await?;
        let env: Envelope<RegeneratedSecret> = decode(resp).await?;
        Ok(env.data)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let resp = self
            .reads
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        decode(resp).await
    }

    async fn get_json_with_query<T, Q>(&self, path: &str, token: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let resp = self
            .reads
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.bytes().await?;
    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    Ok(serde_json::from_slice(&body)?)
}

fn status_error(status: reqwest::StatusCode, body: &[u8]) -> ApiError {
    let (error, message) = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(b) => (b.error, b.message),
        Err(_) => (String::new(), String::new()),
    };
    tracing::debug!(status = %status, error = %error, "auth9-core returned an error");
    ApiError::Status {
        status,
        error,
        message,
    }
}
