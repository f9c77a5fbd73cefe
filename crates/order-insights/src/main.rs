//! CLI entry point: render one dashboard page from a CSV file.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use order_insights::{
    DashboardConfig, DatasetState, DocumentContext, Page, load_csv_path, render_document, render_page,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Customer satisfaction case study: render a dashboard page offline",
    long_about = "Loads an orders CSV, derives delivery metrics and renders one page of the\n\
                  dashboard as a self-contained HTML file, or prints the page model as JSON.\n\n\
                  PAGES:\n  \
                  welcome, understanding-the-problem, factors-and-causes, conclusion-and-insights\n\n\
                  EXAMPLES:\n  \
                  # Box plots of delay, processing time and freight by review category\n  \
                  order-insights -i orders.csv -p understanding-the-problem -o problem.html\n\n  \
                  # Worst 5 sellers, cities and products as JSON\n  \
                  order-insights -i orders.csv -p factors-and-causes --top-n 5 --json"
)]
struct Args {
    /// Path to the orders CSV file
    #[arg(short, long)]
    input: PathBuf,

    /// Page to render (slug or display name)
    #[arg(short, long, default_value = "understanding-the-problem")]
    page: String,

    /// Output HTML file
    ///
    /// If not specified, writes "<input stem>_<page>.html" next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the page model as JSON to stdout instead of writing HTML
    ///
    /// Disables all logs so stdout only contains the JSON document.
    #[arg(long)]
    json: bool,

    /// Number of groups shown in each "top" bar chart
    #[arg(long, default_value = "10")]
    top_n: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let page: Page = args.page.parse()?;
    let config = DashboardConfig::builder().top_n(args.top_n).build()?;
    debug!("Using config: {:?}", config);

    info!("Loading dataset from: {}", args.input.display());
    let dataset = load_csv_path(&args.input, &config)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let info = dataset.info.clone();
    let state = DatasetState::from(dataset);

    let view = render_page(page, &state, &config);
    let failed = view
        .blocks
        .iter()
        .filter(|b| matches!(b, order_insights::Block::Error { .. }))
        .count();
    if failed > 0 {
        warn!("{} chart(s) on '{}' could not be built", failed, page);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let ctx = DocumentContext {
        dataset: Some(&info),
        upload_error: None,
        interactive: false,
    };
    let html = render_document(&view, &ctx, &config)?;

    let output = args.output.clone().unwrap_or_else(|| default_output_path(&args.input, page));
    std::fs::write(&output, html).with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote '{}' page to {}", page, output.display());
    Ok(())
}

fn default_output_path(input: &Path, page: Page) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "orders".to_string());
    input.with_file_name(format!("{stem}_{}.html", page.slug()))
}
