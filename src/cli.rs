//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Postdigest - fetch posts with comments and resolved authors
///
/// Loads the post collection from a local REST test server, fetches each
/// post's comments and author records concurrently (deduplicating author
/// requests through a shared cache), and prints a formatted digest.
///
/// Examples:
///   postdigest
///   postdigest --base-url http://127.0.0.1:9999
///   postdigest --timeout 60 --output digest.txt
///   postdigest --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the test server
    ///
    /// Can also be set via POSTDIGEST_BASE_URL env var or .postdigest.toml config.
    #[arg(
        short,
        long,
        default_value = "http://127.0.0.1:9999",
        env = "POSTDIGEST_BASE_URL",
        value_name = "URL"
    )]
    pub base_url: String,

    /// Request timeout in seconds
    ///
    /// Applied per HTTP request; the slow endpoints can take a while.
    #[arg(short, long, default_value = "30", value_name = "SECS")]
    pub timeout: u64,

    /// Also write the rendered digest to a file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .postdigest.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .postdigest.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Base URL must start with 'http://' or 'https://'".to_string());
        }

        if self.timeout == 0 {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
