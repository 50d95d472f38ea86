use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "hotelmerge")]
#[command(
    about = "Merge hotel data from several suppliers into one record per hotel/destination",
    long_about = None
)]
struct Cli {
    /// Comma-separated hotel ids, or `none` for no hotel filter
    hotel_ids: String,

    /// Comma-separated destination ids, or `none` for no destination filter
    destination_ids: String,

    /// YAML supplier config (defaults to the built-in supplier list)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Supplier URL; repeat to query several. Replaces the configured list.
    #[arg(long = "supplier-url")]
    supplier_urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref(), &cli.supplier_urls)?;
    let hotel_ids = commands::parse_id_list(&cli.hotel_ids);
    let destination_ids = commands::parse_id_list(&cli.destination_ids);

    let records = commands::aggregate::execute(&config, hotel_ids, destination_ids).await;

    let rendered = commands::render_json(&records)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("write result to stdout failed")?;

    Ok(())
}

/// Diagnostics go to stderr; stdout carries only the JSON result.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}
