use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clan_dashboard::api::{build_router, state::AppState};
use clan_dashboard::calculate::build_pairings;
use clan_dashboard::config::AppConfig;
use clan_dashboard::fetch::{current_war_or_unavailable, ClashClient};
use clan_dashboard::models::ClanTag;

#[derive(Parser)]
#[command(name = "clan-dashboard")]
#[command(about = "Clash of Clans clan dashboard API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the current war pairings for a clan as JSON
    War {
        /// Clan tag, with or without the leading '#'
        tag: Option<String>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate configuration and print it with secrets redacted
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    match cli.command {
        Commands::Serve { host, port } => {
            tracing::info!("Starting clan-dashboard v{}", env!("CARGO_PKG_VERSION"));
            if !config.upstream.has_token() {
                tracing::warn!("No upstream token configured; clan endpoints will fail");
            }

            let client = ClashClient::new(&config.upstream)?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState {
                clash: Arc::new(client),
                config: Arc::new(config),
            };
            let app = build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::War { tag, pretty } => {
            let tag = match tag.as_deref() {
                Some(raw) => ClanTag::normalize(raw)
                    .with_context(|| format!("Invalid clan tag {:?}", raw))?,
                None => config
                    .server
                    .default_tag()
                    .context("No clan tag given and no default_clan_tag configured")?,
            };

            let client = ClashClient::new(&config.upstream)?;
            let war = current_war_or_unavailable(&client, &tag).await?;
            let result = build_pairings(&war);

            let out = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{}", out);
        }
        Commands::CheckConfig => {
            println!("{:#?}", config);
            println!(
                "Upstream token: {}",
                if config.upstream.has_token() {
                    "configured"
                } else {
                    "missing"
                }
            );
        }
    }

    Ok(())
}
