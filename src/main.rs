//! Postdigest - post loader with comments and authors
//!
//! A CLI demo client that fetches blog posts from a local REST test server,
//! concurrently resolves each post's comments and author records through a
//! shared per-run cache, and prints a formatted digest.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, fatal fetch failure, etc.)

mod aggregator;
mod api;
mod cli;
mod config;
mod models;
mod report;

use aggregator::Aggregator;
use anyhow::{Context, Result};
use api::ApiClient;
use cli::Args;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Postdigest v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the digest
    match run_digest(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Digest failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .postdigest.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".postdigest.toml");

    if path.exists() {
        eprintln!("⚠️  .postdigest.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .postdigest.toml")?;

    println!("✅ Created .postdigest.toml with default settings.");
    println!("   Edit it to customize the server URL, timeout, and digest layout.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete digest workflow. Returns exit code 0 on success.
async fn run_digest(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    println!("╔════════════════════════════════════════╗");
    println!("║   📱 Post loader with authors          ║");
    println!("╚════════════════════════════════════════╝");

    let client = Arc::new(ApiClient::new(
        &config.server.base_url,
        config.server.timeout_seconds,
    ));

    // Step 1: Fetch the post collection (fatal on failure)
    println!("⏳ Fetching posts from {}", config.server.base_url);
    let posts = client
        .posts()
        .await
        .context("Failed to fetch the post list")?;
    println!("✅ Loaded {} posts", posts.len());

    // Step 2: Enrich posts with comments and resolved authors. The
    // aggregation runs as its own task; its join handle is the completion
    // signal the caller waits on.
    let spinner = make_spinner("Resolving comments and authors...");
    let handle = Aggregator::new(Arc::clone(&client)).spawn(posts);

    let result = handle.await.context("Aggregation task panicked")?;
    spinner.finish_and_clear();
    let details = result.context("Aggregation failed")?;

    // Step 3: Render and print the digest
    let digest = report::generate_digest(&details, &config.report);
    println!("{}", digest);

    if let Some(ref path) = args.output {
        std::fs::write(path, &digest)
            .with_context(|| format!("Failed to write digest to {}", path.display()))?;
        println!("💾 Digest saved to: {}", path.display());
    }

    println!("⏱️ Done in {:.1}s", start_time.elapsed().as_secs_f64());

    Ok(0)
}

/// Build the spinner shown while the aggregation is in flight.
fn make_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .postdigest.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
