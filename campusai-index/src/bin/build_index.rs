//! Offline index builder
//!
//! Fetches the configured source pages, extracts and chunks their text,
//! embeds every chunk and writes the index snapshot the server loads.

use anyhow::Context;
use campusai_core::{init_logging, AppConfig};
use campusai_index::{EmbeddingClient, IndexBuilder, PageFetcher};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Build the CampusAI embedding index from the configured source pages
#[derive(Parser)]
#[command(name = "build-index")]
#[command(about = "Build the CampusAI embedding index")]
#[command(version)]
struct Args {
    /// Configuration file (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the snapshot output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_logging(&format!("campusai={0},campusai_index={0}", args.log_level));

    let mut config = AppConfig::load(args.config.as_deref()).context("failed to load config")?;
    config.validate().context("invalid configuration")?;
    if let Some(output) = args.output {
        config.index.snapshot_path = output;
    }

    println!(
        "Building index from {} source pages (model: {})",
        config.index.source_urls.len(),
        config.embedding.model
    );

    let fetcher = PageFetcher::new(Duration::from_secs(config.index.fetch_timeout_secs))
        .context("failed to create page fetcher")?;
    let snapshot = fetcher.fetch_all(&config.index.source_urls).await;
    anyhow::ensure!(!snapshot.is_empty(), "no source pages could be fetched");

    let embedder =
        EmbeddingClient::new(&config.embedding).context("failed to create embedding client")?;
    let builder = IndexBuilder::new(embedder, &config.index, config.embedding.batch_size);

    let (index, stats) = builder
        .build(&snapshot)
        .await
        .context("index build failed")?;

    index
        .save(&config.index.snapshot_path)
        .context("failed to write index snapshot")?;

    println!(
        "Done: {} -> {}",
        stats.summary(),
        config.index.snapshot_path.display()
    );
    Ok(())
}
