//! CLI application for turning scanned invoices into ERP-ready records.

mod commands;
mod output;
mod providers;

use clap::{Parser, Subcommand};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, parse};

/// Invoice ERP extraction - OCR a scanned invoice and structure it for ERP display
#[derive(Parser)]
#[command(name = "erpscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse ERP-formatted text into a structured record
    Parse(parse::ParseArgs),

    /// Extract a structured record from a scanned invoice
    Extract(extract::ExtractArgs),

    /// Extract records from multiple scanned invoices
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Provider credentials may come from a `.env` file; real env vars win.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if let Ok(path) = &dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Parse(args) => parse::run(args).await,
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
