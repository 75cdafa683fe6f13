//! gpto CLI entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gpto_core::{AuditConfig, AuditRequest, Auditor, ErrorBody};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const APP_NAME: &str = "gpto";

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version, about = "Audit a website for AI answerability and technical readiness", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "GPTO_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a site and print its audit report as JSON
    Audit {
        /// Site to audit; https:// is assumed when no scheme is given
        url: String,

        /// Maximum number of pages to fetch
        #[arg(long)]
        max_pages: Option<usize>,

        /// Maximum link depth from the seed page
        #[arg(long)]
        max_depth: Option<u32>,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Serve the audit API over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8787")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = AuditConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Audit {
            url,
            max_pages,
            max_depth,
            compact,
        } => {
            if let Some(max_pages) = max_pages {
                config.crawl.max_pages = max_pages;
            }
            if let Some(max_depth) = max_depth {
                config.crawl.max_depth = max_depth;
            }
            run_audit(config, url, compact).await
        }
        Commands::Serve { addr } => gpto_server::serve(addr, config).await,
    }
}

async fn run_audit(config: AuditConfig, url: String, compact: bool) -> Result<()> {
    let auditor = Auditor::new(config).context("Failed to set up auditor")?;

    match auditor.run(&AuditRequest::new(url)).await {
        Ok(report) => {
            print_json(&report, compact)?;
            Ok(())
        }
        Err(err) => {
            print_json(&ErrorBody::new(&err), compact)?;
            Err(err.into())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}
