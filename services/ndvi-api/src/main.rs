//! NDVI API Server
//!
//! Serves MODIS NDVI statistics for a point and year over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use ndvi_api::state::AppState;
use ndvi_pipeline::{LivePipeline, PipelineConfig};

/// NDVI API Server
#[derive(Parser, Debug)]
#[command(name = "ndvi-api")]
#[command(about = "HTTP server for MODIS NDVI statistics")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "NDVI_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "NDVI_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Optional YAML pipeline configuration
    #[arg(short, long, env = "NDVI_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    let config = PipelineConfig::load(args.config.as_deref())?;
    info!(
        stac_url = %config.catalog.stac_url,
        signing = ?config.catalog.signing,
        "Starting NDVI API server"
    );

    let state = Arc::new(AppState::new(
        Arc::new(LivePipeline::new(config)),
        prometheus,
    ));
    let app = ndvi_api::router(state);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
