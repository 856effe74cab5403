use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use egressd::{config::Settings, daemon, platform, response, Detector, HttpResponse};

#[derive(Parser)]
#[command(name = "egressd")]
#[command(about = "Egress IP detector - reports the public IPv4/IPv6 addresses of this host")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (defaults to the system location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the detection result over HTTP on GET /
    Serve {
        /// Address to listen on, overrides the configuration file
        #[arg(long)]
        bind: Option<String>,
    },

    /// Detect egress IPs once and print the JSON response
    Detect {
        /// Platform identifier to report
        #[arg(long)]
        platform: Option<String>,
    },

    /// Show configuration file location and effective settings
    Config,
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_platform(flag: Option<String>, settings: &Settings) -> String {
    flag.or_else(|| settings.server.platform.clone())
        .or_else(|| platform::from_env().map(str::to_string))
        .unwrap_or_else(|| platform::LOCAL.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    init_logging(&settings.server.log_level);

    match cli.command {
        Commands::Serve { bind } => {
            let mut settings = settings;
            if let Some(bind) = bind {
                settings.server.bind = bind;
            }
            settings.validate()?;

            let platform = resolve_platform(None, &settings);
            info!("Starting egressd server");
            daemon::run(settings, platform).await?;
        }

        Commands::Detect { platform } => {
            let platform = resolve_platform(platform, &settings);
            let response = match Detector::new(settings.detector.clone()) {
                Ok(detector) => response::handle_request(&detector, &platform).await,
                Err(e) => HttpResponse::fault(&platform, &e.to_string()),
            };
            println!("{}", response.body);

            if !response.status.is_success() {
                bail!("Detection failed with status {}", response.status);
            }
        }

        Commands::Config => {
            show_config(&cli.config, &settings)?;
        }
    }

    Ok(())
}

fn show_config(path: &Option<PathBuf>, settings: &Settings) -> Result<()> {
    let config_path = path.clone().unwrap_or_else(Settings::config_path);

    println!("Configuration file location: {}", config_path.display());
    if !config_path.exists() {
        println!("Configuration file not found, using built-in defaults.");
    }

    println!("\nEffective configuration:\n");
    println!("{}", toml::to_string_pretty(settings)?);

    Ok(())
}
