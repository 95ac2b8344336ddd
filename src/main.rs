use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use tubecast::config::Config;
use tubecast::feed::{self, HostnameUrlBuilder, JsonFeedStore};
use tubecast::source::classify;

/// Get the default config file path (~/.config/tubecast/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("tubecast")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "tubecast",
    about = "Resolve video links into feed sources and export feeds as OPML"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one or more YouTube/Vimeo links
    Resolve {
        #[arg(required = true, value_name = "ADDRESS")]
        addresses: Vec<String>,

        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Export feeds flagged with `opml = true` as an OPML document
    Export {
        /// Config file (default: ~/.config/tubecast/config.toml)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write to FILE atomically instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Validate the config file and show how each feed url resolves
    Check {
        /// Config file (default: ~/.config/tubecast/config.toml)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = match path {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    config.validate().context("Invalid config")?;
    Ok(config)
}

fn resolve(addresses: &[String], json: bool) -> Result<bool> {
    let mut all_ok = true;
    for address in addresses {
        match classify(address) {
            Ok(source) if json => println!("{}", serde_json::to_string(&source)?),
            Ok(source) => println!("{source}"),
            Err(e) => {
                all_ok = false;
                tracing::debug!(%address, error = %e, "Failed to classify link");
                eprintln!("Error: {e}");
            }
        }
    }
    Ok(all_ok)
}

async fn export(config: Config, output: Option<PathBuf>) -> Result<()> {
    let store = JsonFeedStore::new(&config.storage.data_dir);
    let urls = HostnameUrlBuilder::new(&config.server.base_url())?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling export");
            on_interrupt.cancel();
        }
    });

    let document = feed::export_outline(&cancel, &config.feeds, &store, &urls)
        .await
        .context("Failed to export OPML")?;

    match output {
        Some(path) => {
            feed::export_to_file(&document, &path).await?;
            println!("Exported OPML to: {}", path.display());
        }
        None => println!("{document}"),
    }
    Ok(())
}

fn check(config: &Config) -> Result<()> {
    let resolved = config.resolve_feeds()?;
    if resolved.is_empty() {
        eprintln!("Warning: No feeds configured");
    }
    for (feed, source) in resolved {
        let marker = if feed.opml { " [opml]" } else { "" };
        println!("{}: {source}{marker}", feed.id);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Resolve { addresses, json } => {
            if !resolve(&addresses, json)? {
                std::process::exit(1);
            }
        }
        Command::Export { config, output } => {
            let config = load_config(config)?;
            export(config, output).await?;
        }
        Command::Check { config } => {
            let config = load_config(config)?;
            check(&config)?;
        }
    }

    Ok(())
}
