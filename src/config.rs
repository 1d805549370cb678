use serde::Deserialize;

const PLACEHOLDER_SESSION_SECRET: &str = "CHANGE_ME_SESSION_SECRET";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Base URL of auth9-core used for server-to-server calls.
    pub core_url: String,
    /// Base URL of auth9-core as reachable from the browser.
    /// Set via AUTH9_CORE_PUBLIC_URL. Falls back to `core_url`.
    pub core_public_url: String,
    /// Public origin of this portal, used to build the OAuth redirect URI.
    pub portal_url: String,
    pub client_id: String,
    pub session_secret: String,
    /// Lifetime of the session cookie in seconds.
    pub session_max_age: u64,
    /// Per-request timeout for calls to auth9-core, in seconds.
    pub api_timeout_secs: u64,
    pub production: bool,
}

impl Config {
    /// The callback URL registered for the portal client.
    pub fn redirect_uri(&self) -> String {
        format!("{}/auth/callback", self.portal_url.trim_end_matches('/'))
    }

    /// Cookies carry the `Secure` attribute outside local development.
    pub fn secure_cookies(&self) -> bool {
        self.production || self.portal_url.starts_with("https://")
    }

    /// Config pointing at a given backend, with fixed development defaults.
    /// Used by integration tests to aim the portal at a mock server.
    pub fn for_backend(core_url: &str) -> Self {
        Self {
            port: 3000,
            core_url: core_url.trim_end_matches('/').to_string(),
            core_public_url: core_url.trim_end_matches('/').to_string(),
            portal_url: "http://localhost:3000".into(),
            client_id: "auth9-portal".into(),
            session_secret: PLACEHOLDER_SESSION_SECRET.into(),
            session_max_age: 8 * 3600,
            api_timeout_secs: 5,
            production: false,
        }
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let env_mode = std::env::var("PORTAL_ENV")
        .or_else(|_| std::env::var("RUST_ENV"))
        .unwrap_or_default();
    let production = env_mode == "production";

    let session_secret = std::env::var("SESSION_SECRET")
        .unwrap_or_else(|_| PLACEHOLDER_SESSION_SECRET.into());

    if session_secret == PLACEHOLDER_SESSION_SECRET {
        if production {
            anyhow::bail!(
                "SESSION_SECRET is still the insecure placeholder. \
                 Set a random secret (64-char hex recommended) before running in production."
            );
        }
        eprintln!("⚠️  SESSION_SECRET is not set, using insecure placeholder. Sessions are forgeable by anyone who reads this source.");
    }

    let core_url = std::env::var("AUTH9_CORE_URL")
        .unwrap_or_else(|_| "http://localhost:8080".into())
        .trim_end_matches('/')
        .to_string();

    Ok(Config {
        port: std::env::var("PORTAL_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .unwrap_or(3000),
        core_public_url: std::env::var("AUTH9_CORE_PUBLIC_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| core_url.clone()),
        core_url,
        portal_url: std::env::var("AUTH9_PORTAL_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string(),
        client_id: std::env::var("AUTH9_PORTAL_CLIENT_ID")
            .unwrap_or_else(|_| "auth9-portal".into()),
        session_secret,
        session_max_age: std::env::var("SESSION_MAX_AGE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8 * 3600),
        api_timeout_secs: std::env::var("AUTH9_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10),
        production,
    })
}
