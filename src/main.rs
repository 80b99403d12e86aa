use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use compliance_api::app::{router, AppState};
use compliance_api::auth::{generate_jwt, Claims};
use compliance_api::config;
use compliance_api::database::{DatabaseManager, PgCaseFileStore};

#[derive(Parser)]
#[command(name = "compliance-api")]
#[command(about = "Compliance case-file API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
        #[arg(long, help = "Apply pending migrations before serving")]
        migrate: bool,
    },

    #[command(about = "Issue a signed bearer token for local development")]
    Token {
        #[arg(long, help = "Token subject")]
        subject: String,
        #[arg(long, help = "preferred_username claim")]
        username: Option<String>,
        #[arg(long, value_delimiter = ',', help = "Comma-separated roles")]
        roles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve { port: None, migrate: false }) {
        Command::Serve { port, migrate } => serve(port, migrate).await,
        Command::Token { subject, username, roles } => {
            if compliance_api::is_production!() {
                anyhow::bail!("token issuing is disabled in production");
            }
            let token = generate_jwt(&Claims::new(subject, username, roles))?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(port: Option<u16>, migrate: bool) -> anyhow::Result<()> {
    let config = config::config();
    tracing::info!("Starting Compliance API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect_lazy(&config.database)?;

    if migrate || config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }

    let store = Arc::new(PgCaseFileStore::new(pool));
    let app = router(AppState::new(store));

    let bind_addr = format!("0.0.0.0:{}", port.unwrap_or(config.api.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Compliance API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
