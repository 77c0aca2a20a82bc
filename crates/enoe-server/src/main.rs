//! enoe-panel server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), loads and
//! enriches the ENOE tables once, and serves the panel over HTTP.
//!
//! # Checking a dataset
//!
//! To validate the input files without binding a port:
//!
//! ```
//! cargo run -p enoe-server --bin enoe-panel -- --check
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use enoe_core::Snapshot;
use enoe_server::{AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "ENOE labor-market panel")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load and enrich the data, print a summary and exit.
  #[arg(long)]
  check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ENOE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let snapshot = load_snapshot(&server_cfg)?;
  enoe_server::log_snapshot(&snapshot);

  if cli.check {
    let summary = serde_json::to_string_pretty(&snapshot.summary())
      .context("failed to serialise summary")?;
    println!("{summary}");
    return Ok(());
  }

  let state = AppState {
    snapshot: Arc::new(snapshot),
    config:   Arc::new(server_cfg.clone()),
  };

  let app = enoe_server::router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Decode the three inputs and run the enrichment. Any failure is fatal.
fn load_snapshot(cfg: &ServerConfig) -> anyhow::Result<Snapshot> {
  let paths = cfg.data_paths();
  let dataset = enoe_load::load_dataset(&paths)
    .with_context(|| format!("failed to load dataset from {paths:?}"))?;
  dataset.into_snapshot().context("failed to build snapshot")
}
