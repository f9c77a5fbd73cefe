//! CLI entry point for the dashboard server.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use insights_server::{ServerConfig, serve};
use order_insights::DashboardConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Customer satisfaction case study dashboard",
    long_about = "Serves the order review dashboard over HTTP. Upload an orders CSV from the\n\
                  sidebar and switch between the analysis pages.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG    Overrides --log-level (e.g. insights_server=debug)\n\n\
                  EXAMPLES:\n  \
                  insights-server --bind 0.0.0.0:8501 --max-upload-mb 50"
)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = insights_server::config::DEFAULT_BIND)]
    bind: SocketAddr,

    /// Largest accepted CSV upload, in MiB
    #[arg(long, default_value = "200")]
    max_upload_mb: usize,

    /// Drop sessions idle for this many seconds
    #[arg(long, default_value = "3600")]
    session_ttl_secs: u64,

    /// Number of groups shown in each "top" bar chart
    #[arg(long, default_value = "10")]
    top_n: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    dotenv().ok();

    let dashboard = DashboardConfig::builder()
        .top_n(args.top_n)
        .max_upload_bytes(args.max_upload_mb.saturating_mul(1024 * 1024))
        .build()?;
    let config = ServerConfig::builder()
        .bind(args.bind)
        .session_ttl(Duration::from_secs(args.session_ttl_secs))
        .dashboard(dashboard)
        .build()?;
    debug!("Using config: {:?}", config);

    serve(config)
        .await
        .with_context(|| format!("Server on {} failed", args.bind))
}
