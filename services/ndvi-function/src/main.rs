//! NDVI Function
//!
//! Runs one invocation locally: reads the event JSON from `--params` or
//! stdin and writes the response envelope to stdout. Logs go to stderr.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use ndvi_function::{handle, ApiKeyGuard, FunctionResponse};
use ndvi_pipeline::{LivePipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "ndvi-function")]
#[command(about = "Invoke the NDVI statistics function once")]
struct Args {
    /// Event JSON; read from stdin when omitted
    #[arg(short, long)]
    params: Option<String>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Optional YAML pipeline configuration
    #[arg(short, long, env = "NDVI_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let response = runtime.block_on(invoke(args))?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    Ok(())
}

async fn invoke(args: Args) -> Result<FunctionResponse> {
    let raw = match args.params {
        Some(params) => params,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read event from stdin")?;
            input
        }
    };

    let event: Value = match serde_json::from_str(&raw) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "Event is not valid JSON");
            return Ok(FunctionResponse::internal_error());
        }
    };

    let config = PipelineConfig::load(args.config.as_deref())?;
    let runner = LivePipeline::new(config);
    let guard = ApiKeyGuard::from_env();

    Ok(handle(&event, &guard, &runner).await)
}
