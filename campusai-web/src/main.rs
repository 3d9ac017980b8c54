//! CampusAI Web Server
//!
//! HTTP entry point for the Northgate University assistant.

use anyhow::Context;
use campusai_core::{init_logging, AppConfig};
use campusai_web::{CampusServer, WebConfig};
use clap::Parser;
use std::path::PathBuf;

/// CampusAI web server - question answering for Northgate University
#[derive(Parser)]
#[command(name = "campusai-web")]
#[command(about = "Web server for the CampusAI assistant")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_logging(&format!(
        "campusai_web={},campusai_rag={},tower_http=info",
        args.log_level, args.log_level
    ));

    let app_config = AppConfig::load(args.config.as_deref())
        .context("failed to load application configuration")?;
    app_config
        .validate()
        .context("invalid application configuration")?;

    let web_config = WebConfig {
        host: args.host,
        port: args.port,
        config_path: args.config.map(|p| p.display().to_string()),
    };

    let server =
        CampusServer::new(web_config, &app_config).context("failed to initialize server")?;

    server.start().await.context("server terminated")?;

    Ok(())
}
