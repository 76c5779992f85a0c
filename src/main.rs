//! WolfHDFS - In-memory WebHDFS emulation
//!
//! Serves a volatile, path-indexed store over the WebHDFS REST protocol so
//! HDFS clients and proxies can be tested without a cluster.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wolfhdfs::api::HttpServer;
use wolfhdfs::config::{LoggingConfig, WolfHdfsConfig};
use wolfhdfs::error::Result;

/// WolfHDFS - In-memory WebHDFS emulation
#[derive(Parser)]
#[command(name = "wolfhdfs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "wolfhdfs.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the WebHDFS endpoint
    Start {
        /// Address to listen on (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "wolfhdfs.toml")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start { bind } => {
            let mut config = load_config(&cli.config)?;
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            init_logging(&config.logging, cli.log_level.as_deref());
            run_start(config).await
        }
        Commands::Init { output } => {
            init_logging(&LoggingConfig::default(), cli.log_level.as_deref());
            run_init(output)
        }
        Commands::Validate => {
            init_logging(&LoggingConfig::default(), cli.log_level.as_deref());
            run_validate(cli.config)
        }
    }
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig, override_level: Option<&str>) {
    let level = override_level.unwrap_or(&logging.level);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Load the config file, falling back to defaults when it does not exist
fn load_config(path: &Path) -> Result<WolfHdfsConfig> {
    if path.exists() {
        WolfHdfsConfig::from_file(path)
    } else {
        eprintln!("No config file at {:?}, using defaults", path);
        Ok(WolfHdfsConfig::default())
    }
}

/// Start the WebHDFS endpoint
async fn run_start(config: WolfHdfsConfig) -> Result<()> {
    tracing::info!("Starting WolfHDFS...");
    tracing::info!(
        "Entry defaults: group={} permission={} replication={}",
        config.storage.default_group,
        config.storage.default_permission,
        config.storage.default_replication
    );

    let server = HttpServer::new(config);

    tokio::select! {
        result = server.start() => {
            if let Err(ref e) = result {
                tracing::error!("HTTP server stopped: {}", e);
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            let entries = server.handler().store().lock().await.len();
            tracing::info!("Shutting down, discarding {} in-memory entries", entries);
            Ok(())
        }
    }
}

/// Write a default configuration file
fn run_init(output: PathBuf) -> Result<()> {
    if output.exists() {
        tracing::error!("Configuration file {:?} already exists", output);
        return Err(wolfhdfs::Error::Config(format!("{:?} already exists", output)));
    }

    let content = WolfHdfsConfig::default().to_toml()?;
    std::fs::write(&output, content)?;
    tracing::info!("Wrote default configuration to {:?}", output);
    Ok(())
}

/// Validate a configuration file
fn run_validate(path: PathBuf) -> Result<()> {
    match WolfHdfsConfig::from_file(&path) {
        Ok(config) => {
            tracing::info!("Configuration {:?} is valid", path);
            tracing::info!(
                "  Endpoint: {}{}",
                config.server.bind_address,
                config.path_prefix()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Configuration {:?} is invalid: {}", path, e);
            Err(e)
        }
    }
}
