use clap::{Parser, Subcommand};

/// Auth9 Portal: admin console for the Auth9 IAM API
#[derive(Parser)]
#[command(name = "auth9-portal", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the portal server
    Serve {
        /// Port to bind (overrides PORTAL_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration and print the resolved settings
    CheckConfig,
}
