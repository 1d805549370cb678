use std::net::SocketAddr;

use clap::Parser;

use portal::{cli, config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `--help` and `--version` must work without a valid config.
    let args = cli::Cli::parse();

    // Load .env before the subscriber reads RUST_LOG.
    dotenvy::dotenv().ok();
    portal::telemetry::init()?;

    let cfg = config::load()?;

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => {
            let port = port.unwrap_or(cfg.port);
            run_server(cfg, port).await
        }
        Some(cli::Commands::CheckConfig) => check_config(&cfg),
        None => {
            let port = cfg.port;
            run_server(cfg, port).await
        }
    };

    portal::telemetry::shutdown();
    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

async fn run_server(cfg: config::Config, port: u16) -> anyhow::Result<()> {
    tracing::info!(
        core_url = %cfg.core_url,
        portal_url = %cfg.portal_url,
        client_id = %cfg.client_id,
        "Starting Auth9 portal"
    );
    let app = portal::app(cfg)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Auth9 portal listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Auth9 portal stopped");
    Ok(())
}

fn check_config(cfg: &config::Config) -> anyhow::Result<()> {
    // Builds the cookie sealer and HTTP client exactly as the server would.
    portal::AppState::new(cfg.clone())?;
    println!("port:              {}", cfg.port);
    println!("auth9-core:        {}", cfg.core_url);
    println!("auth9-core public: {}", cfg.core_public_url);
    println!("portal URL:        {}", cfg.portal_url);
    println!("redirect URI:      {}", cfg.redirect_uri());
    println!("client ID:         {}", cfg.client_id);
    println!("session max age:   {}s", cfg.session_max_age);
    println!("secure cookies:    {}", cfg.secure_cookies());
    println!("production:        {}", cfg.production);
    println!("Configuration OK");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
