//! subdomain-encoding - carry arbitrary bytes inside DNS names
//!
//! Reads raw bytes on stdin and prints one domain name per chunk, or reads
//! names and writes the recovered bytes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

use subdomain_encoding::{
    packing, pipeline, BlockCipherTransform, CipherKind, EncoderConfig, KeyFormat,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "subdomain-encoding")]
#[command(author = "Sina Rabbani")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Encode bytes as DNS names and back", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base domain every name ends with (e.g. test.com)
    #[arg(short, long, env = "SUBDOMAIN_DOMAIN", global = true)]
    domain: Option<String>,

    /// Symmetric key
    #[arg(short, long, env = "SUBDOMAIN_KEY", hide_env_values = true, global = true)]
    key: Option<String>,

    /// How the key is written
    #[arg(long, value_enum, global = true)]
    key_format: Option<KeyFormat>,

    /// Block cipher
    #[arg(long, value_enum, global = true)]
    cipher: Option<CipherKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode stdin into domain names, one per line
    Encode {
        /// Chunks encoded in parallel
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,
    },

    /// Decode domain names (one per line) from stdin back to bytes
    Decode,

    /// Show how many payload bytes fit in one name
    Capacity {
        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct CapacityReport {
    domain: String,
    cipher: CipherKind,
    block_size: usize,
    label_capacity: usize,
    max_payload_bytes: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = load_config(&cli)?;
    let transform = config
        .build_transform()
        .context("Failed to build encoder from configuration")?;
    debug!(
        "Base domain {}, {:?} cipher, {} bytes per name",
        transform.base_domain(),
        config.cipher,
        transform.max_payload_bytes()
    );

    match cli.command {
        Commands::Encode { concurrency } => {
            let concurrency = concurrency.unwrap_or(config.concurrency);
            let stats = pipeline::encode_stream(
                tokio::io::stdin(),
                tokio::io::stdout(),
                Arc::new(transform),
                concurrency,
            )
            .await
            .context("Encoding failed")?;
            info!("Wrote {} names", stats.names);
        }
        Commands::Decode => {
            let stats = pipeline::decode_stream(
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
                &transform,
            )
            .await
            .context("Decoding failed")?;
            info!("Recovered {} bytes", stats.bytes);
        }
        Commands::Capacity { json } => {
            show_capacity(&config, &transform, json)?;
        }
    }

    Ok(())
}

/// Config file first, then command-line and environment overrides
fn load_config(cli: &Cli) -> Result<EncoderConfig> {
    let mut config = if let Some(path) = &cli.config {
        info!("Loading configuration from {}", path.display());
        EncoderConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?
    } else {
        EncoderConfig::default()
    };

    if let Some(domain) = &cli.domain {
        config.domain = domain.clone();
    }
    if let Some(key) = &cli.key {
        config.key = key.clone();
    }
    if let Some(key_format) = cli.key_format {
        config.key_format = key_format;
    }
    if let Some(cipher) = cli.cipher {
        config.cipher = cipher;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

fn show_capacity(config: &EncoderConfig, transform: &BlockCipherTransform, json: bool) -> Result<()> {
    let block_size = transform.block_size()?;
    let report = CapacityReport {
        domain: transform.base_domain().to_string(),
        cipher: config.cipher,
        block_size,
        label_capacity: packing::label_capacity(block_size),
        max_payload_bytes: transform.max_payload_bytes(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.max_payload_bytes);
    }
    Ok(())
}
