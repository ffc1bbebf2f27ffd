//! Security Camera Dashboard
//!
//! Terminal dashboard for a remote security-camera backend: live feed,
//! alert log, analytics and the self-destruct sequence.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[cfg(feature = "dashboard")]
use camwatch::viewer::App;

#[derive(Parser, Debug)]
#[command(name = "camwatch")]
#[command(about = "Terminal dashboard for a security-camera backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend URL (overrides CAMWATCH_API_URL and the config file)
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing - redirect logs to file when in TUI mode to avoid console output
    let log_path = dirs::data_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
        .join("camwatch")
        .join("camwatch.log");

    // Create directory if it doesn't exist
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    match log_file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_level(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
        }
        Err(_) => {
            // If we can't create a log file, use a minimal stderr logger that only shows errors
            tracing_subscriber::fmt()
                .with_target(false)
                .with_level(true)
                .with_max_level(tracing::Level::ERROR)
                .init();
        }
    }

    #[cfg(feature = "dashboard")]
    {
        let args = Args::parse();

        // Load configuration
        let config = camwatch::viewer::Config::load(args.config.as_deref())?;

        // CLI beats environment beats config file
        let config = camwatch::viewer::Config {
            api_url: args
                .url
                .or_else(camwatch::util::get_api_url)
                .unwrap_or(config.api_url),
            ..config
        };

        tracing::info!("Starting dashboard against {}", config.api_url);

        // Create and run the app
        let mut app = App::new(config, camwatch::util::get_alert_email())?;
        app.run().await?;
    }

    #[cfg(not(feature = "dashboard"))]
    {
        eprintln!("Error: This binary was compiled without dashboard support.");
        eprintln!("Please rebuild with: cargo build --features dashboard");
        std::process::exit(1);
    }

    Ok(())
}
