//! sample-service - A sample HTTP microservice instrumented with Prometheus metrics
//!
//! Usage:
//!     sample-service [--config <path>] [--listen <addr>]
//!
//! See --help for more options.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};

use sample_service::config::{load_config, Config};
use sample_service::server::HttpServer;
use sample_service::util::init_logging;
use sample_service::AppState;

/// A sample HTTP microservice instrumented with Prometheus metrics.
#[derive(Parser, Debug)]
#[command(name = "sample-service")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, value_name = "ADDR")]
    listen: Option<SocketAddr>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path).with_context(|| {
            format!("failed to load configuration from '{}'", path.display())
        })?,
        None => Config::default(),
    };

    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }

    // CLI overrides config
    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.global.log_level);

    init_logging(log_level, &config.global.log_format).context("failed to initialize logging")?;

    if cli.validate {
        info!("Configuration is valid");
        println!("Configuration is valid.");
        println!("  Listen: {}", config.server.listen);
        println!("  Health path: {}", config.server.health_path);
        println!("  Metrics path: {}", config.server.metrics_path);
        return Ok(());
    }

    info!(
        listen = %config.server.listen,
        health_path = %config.server.health_path,
        metrics_path = %config.server.metrics_path,
        work_modulus = config.work.modulus,
        "sample-service starting"
    );

    run(config)
}

/// Run the service with the given configuration.
fn run(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(async { run_async(config).await })
}

/// Async entry point for the service.
async fn run_async(config: Config) -> Result<()> {
    let state = AppState::new(&config).context("failed to register metrics")?;

    let server = match HttpServer::bind(config.server.listen, state.clone()).await {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "failed to start http server");
            return Err(e).context("failed to start http server");
        }
    };

    let handle = tokio::spawn(server.run(state.shutdown().subscribe()));

    info!("sample-service is running");
    info!("press Ctrl+C to stop");

    state.shutdown().trigger_on_ctrl_c().await;

    let _ = handle.await;

    info!("sample-service shut down complete");
    Ok(())
}
