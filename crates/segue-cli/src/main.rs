use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use segue_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "segue")]
#[command(author, version, about = "Headless preloader and page transition driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ~/.config/segue/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page and run its preloader, reporting asset progress
    Preload {
        /// Page URL
        url: String,
    },
    /// Boot a page, then navigate through the given paths
    Visit {
        /// Page URL to boot from
        url: String,
        /// Paths or URLs to navigate to, in order
        paths: Vec<String>,
        /// Glide to this offset after each page is shown
        #[arg(long)]
        scroll: Option<f64>,
    },
    /// Solve the back-out overshoot that reaches a peak
    Curve {
        #[arg(long, default_value_t = 0.0)]
        min: f64,
        #[arg(long, default_value_t = 1.0)]
        max: f64,
        #[arg(long)]
        peak: f64,
    },
    /// Print the reveal pose at evenly spaced times
    Pose {
        #[arg(short, long, default_value_t = 10)]
        samples: usize,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 900.0)]
        viewport: f64,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match cli.config {
        Some(ref path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let config = Arc::new(config);

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.config {
        Some(ref path) => tracing::debug!("Configuration loaded from {}", path.display()),
        None => tracing::debug!("Configuration loaded from {}", AppConfig::config_path().display()),
    }

    match cli.command {
        Commands::Preload { url } => commands::preload::run(config, &url).await,
        Commands::Visit { url, paths, scroll } => commands::visit::run(config, &url, &paths, scroll).await,
        Commands::Curve { min, max, peak } => commands::curve::run(min, max, peak),
        Commands::Pose {
            samples,
            viewport,
            json,
        } => commands::pose::run(&config, samples, viewport, json),
    }
}
