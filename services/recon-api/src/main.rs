//! Storm recon map server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use recon_api::build_router;
use recon_api::config::{MapConfig, ServiceConfig, CATALOG_PATH, DEFAULT_STORM};
use recon_api::state::AppState;

/// Storm recon map server
#[derive(Parser, Debug)]
#[command(name = "recon-api")]
#[command(about = "Serves hurricane reconnaissance observations for the storm map")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8090", env = "RECON_LISTEN_ADDR")]
    listen: String,

    /// Site static directory (json/ and images/ live here)
    #[arg(long, default_value = "static", env = "RECON_STATIC_DIR")]
    static_dir: PathBuf,

    /// Fetch data from this site root instead of the static directory
    #[arg(long, env = "RECON_DATA_URL")]
    data_url: Option<String>,

    /// Catalog path relative to the site root
    #[arg(long, default_value = CATALOG_PATH, env = "RECON_CATALOG_PATH")]
    catalog: String,

    /// Storm selected at startup
    #[arg(long, default_value = DEFAULT_STORM, env = "RECON_DEFAULT_STORM")]
    default_storm: String,

    /// Skip the startup selection
    #[arg(long)]
    no_default_storm: bool,

    /// Color scheme overrides (JSON)
    #[arg(long, env = "RECON_SCHEMES")]
    schemes: Option<PathBuf>,

    /// Map defaults (YAML)
    #[arg(long, default_value = "config/map.yaml", env = "RECON_MAP_CONFIG")]
    map_config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Starting storm recon map server");

    let config = ServiceConfig {
        static_dir: args.static_dir,
        data_url: args.data_url,
        catalog_path: args.catalog,
        default_storm: (!args.no_default_storm).then_some(args.default_storm),
        schemes_path: args.schemes,
        map: MapConfig::load(&args.map_config)?,
    };

    let state = match AppState::new(config).await {
        Ok(state) => Arc::new(state.with_prometheus(prometheus)),
        Err(e) => {
            tracing::error!("Failed to initialize application state: {:#}", e);
            std::process::exit(1);
        }
    };
    state.startup().await;

    let app = build_router(state);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;
    info!("Recon map listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind")?;
    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
