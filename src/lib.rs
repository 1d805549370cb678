//! Auth9 Portal: server-rendered admin console for the Auth9 IAM API.
//!
//! The binary in `main.rs` is a thin wrapper; everything is exposed here so
//! integration tests in `tests/` can drive the router directly.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod pages;
pub mod routes;
pub mod session;
pub mod telemetry;

use std::sync::Arc;

use api::Auth9Client;
use config::Config;
use session::SessionStore;

/// Shared application state passed to handlers.
pub struct AppState {
    pub config: Config,
    pub api: Auth9Client,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let api = Auth9Client::new(&config)?;
        let sessions = SessionStore::from_config(&config)?;
        Ok(Self {
            config,
            api,
            sessions,
        })
    }
}

/// The full application: routes plus middleware.
pub fn app(config: Config) -> anyhow::Result<axum::Router> {
    let state = Arc::new(AppState::new(config)?);
    Ok(routes::router(state))
}
