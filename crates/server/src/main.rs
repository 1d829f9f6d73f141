use std::path::Path;

use clap::{Parser, Subcommand};
use tracing::info;

use lostfound_server::config::LostFoundConfig;

/// Lost & Found HTTP server.
#[derive(Parser, Debug)]
#[command(name = "lostfound-server", about = "Standalone HTTP server for Lost & Found")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "lostfound.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run database migrations for the configured item store, then exit.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config_exists = Path::new(&cli.config).exists();
    let mut config = if config_exists {
        let contents = std::fs::read_to_string(&cli.config)?;
        LostFoundConfig::from_toml(&contents)?
    } else {
        LostFoundConfig::from_toml("")?
    };
    config.apply_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Some(Commands::Migrate) = cli.command {
        tracing_subscriber::fmt()
            .with_env_filter(lostfound_server::telemetry::env_filter(&config.logging))
            .init();
        return run_migrate(&config).await;
    }

    lostfound_server::telemetry::init(&config.logging);

    if !config_exists {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    let state = lostfound_server::bootstrap::build_state(&config).await?;
    let app = lostfound_server::api::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        address = %addr,
        environment = %config.server.environment,
        "lostfound-server listening"
    );

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("lostfound-server stopped");
    Ok(())
}

/// Run the `migrate` subcommand. Opening the store applies its schema.
async fn run_migrate(config: &LostFoundConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.store.backend != "postgres" {
        info!(backend = %config.store.backend, "store backend has no migrations, skipping");
        return Ok(());
    }

    info!(backend = %config.store.backend, "running item store migrations...");
    let _store = lostfound_server::store_factory::create_item_store(&config.store).await?;
    info!("all migrations complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
