//! Lost & Found CLI
//!
//! Report, browse and manage lost and found items, either against a running
//! server or against a local JSON file when no server is available.

mod backend;
mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::backend::Backend;

/// Lost & Found CLI — report and browse lost and found items.
#[derive(Parser, Debug)]
#[command(name = "lostfound", version, about)]
struct Cli {
    /// Lost & Found server URL.
    #[arg(
        long,
        env = "LOSTFOUND_SERVER",
        default_value = "http://localhost:3001",
        global = true
    )]
    server: String,

    /// Work on a local JSON file instead of a server.
    #[arg(long, env = "LOSTFOUND_LOCAL", global = true)]
    local: Option<String>,

    /// Directory images are stored in when working locally.
    #[arg(long, default_value = "uploads", global = true)]
    uploads: String,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend is reachable.
    Health,
    /// List items, newest first.
    List(commands::items::ListArgs),
    /// Show one item.
    Show {
        /// Item ID.
        id: String,
    },
    /// Report a lost or found item.
    Report(commands::items::ReportArgs),
    /// Change fields of an item.
    Update(commands::items::UpdateArgs),
    /// Delete an item.
    Delete {
        /// Item ID.
        id: String,
    },
    /// Upload an image and print its URL.
    Upload(commands::upload::UploadArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let backend = match cli.local {
        Some(ref path) => Backend::local(path, &cli.uploads).await?,
        None => Backend::remote(&cli.server)?,
    };

    match cli.command {
        Command::Health => commands::health::run(&backend, &cli.format).await,
        Command::List(args) => commands::items::list(&backend, &args, &cli.format).await,
        Command::Show { id } => commands::items::show(&backend, &id, &cli.format).await,
        Command::Report(args) => commands::items::report(&backend, &args, &cli.format).await,
        Command::Update(args) => commands::items::update(&backend, &args, &cli.format).await,
        Command::Delete { id } => commands::items::delete(&backend, &id).await,
        Command::Upload(args) => commands::upload::run(&backend, &args, &cli.format).await,
    }
}
