mod config;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use tracing::{debug, info};

use config::{Config, SignerSource};
use storage::{StorageError, http_client, put_website};

#[derive(Parser, Debug)]
#[command(
    name = "put-website",
    version = env!("CARGO_PKG_VERSION"),
    about = "Put a local website build into a Wallet Attached Storage collection",
    long_about = "Walks a build output directory and PUTs every file to <TARGET_URL><relative path>. \
                  Each request carries a signed capability invocation; the collection only accepts it \
                  if the signing key controls the collection.",
    after_help = "Examples:\n  \
                  put-website https://storage.example/space/abc/                     # Upload the default build directory\n  \
                  put-website --source ./dist https://storage.example/space/abc/     # Upload ./dist\n  \
                  put-website --key ./controller.key https://storage.example/space/abc/\n\n\
                  Configuration (.env):\n  \
                  WAS_KEY_FILE=./controller.key\n  \
                  LOG_LEVEL=debug"
)]
struct Cli {
    /// Target collection URL; file paths are appended to it verbatim
    #[arg(value_name = "TARGET_URL")]
    target: String,

    /// Directory to upload
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/../website/build/client/"))]
    source: PathBuf,

    /// File holding the 32 byte Ed25519 seed of the collection controller (raw or base64)
    #[arg(long, env = "WAS_KEY_FILE")]
    key: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Load .env file early to get LOG_LEVEL and WAS_KEY_FILE
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL")
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        // Printed directly so a LOG_LEVEL of "off" cannot hide it
        eprintln!("{} {}", style("✗").red(), style(error_report(&e)).red());
        std::process::exit(1);
    }
}

/// Error chain, followed by suggestions when the failure has any
fn error_report(e: &anyhow::Error) -> String {
    let mut report = format!("{:#}", e);
    if let Some(storage_error) = e.downcast_ref::<StorageError>() {
        let hint = storage_error.user_message();
        if hint != storage_error.to_string() {
            report.push_str("\n\n");
            report.push_str(&hint);
        }
    }
    report
}

async fn run(cli: Cli) -> Result<()> {
    info!("put-website v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::new(cli.source, &cli.target, cli.key)?;

    let signer = config.signer()?;
    if config.signer_source == SignerSource::Ephemeral {
        eprintln!(
            "{}",
            style(format!(
                "⚠ No --key given; using ephemeral signer {}. The collection will reject it with 401.",
                signer.did()
            ))
            .yellow()
        );
    }
    debug!("signing as {}", signer.did());

    let client = http_client().context("Failed to build HTTP client")?;

    info!(
        "uploading {} to {}",
        config.source.display(),
        config.collection
    );
    let uploaded = put_website(&config.source, &config.collection, &signer, &client).await?;
    debug!("uploaded {} file(s)", uploaded);

    Ok(())
}
