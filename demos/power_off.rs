//! Power off a paired TV.
//!
//! Demonstrates:
//! - Connecting with a stored client key
//! - Pairing on first run and printing the issued key
//! - Sending a request and reading the reply
//!
//! Usage:
//!   cargo run --example power_off -- <address> [client-key]
//!   cargo run --example power_off -- <address> [client-key] --debug

// ============================================================================
// Imports
// ============================================================================

use anyhow::{Context, Result};
use lgtv_remote::{Error, Remote, Reply};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    address: String,
    client_key: Option<String>,
    debug: bool,
}

impl Args {
    fn parse() -> Result<Self> {
        let debug = std::env::args().any(|a| a == "--debug");
        let mut positional = std::env::args().skip(1).filter(|a| !a.starts_with("--"));

        let address = positional
            .next()
            .context("usage: power_off <address> [client-key]")?;

        Ok(Self {
            address,
            client_key: positional.next(),
            debug,
        })
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse()?;
    init_logging(args.debug);

    println!("=== Power Off ===\n");

    if args.client_key.is_none() {
        println!("[1] No client key: accept the prompt on the TV...");
    } else {
        println!("[1] Connecting to {}...", args.address);
    }

    let remote = Remote::connect(&args.address, args.client_key.clone())
        .await
        .with_context(|| format!("connecting to {}", args.address))?;

    println!("    ✓ Ready");
    if remote.client_key() != args.client_key {
        println!("    New client key: {}", remote.client_key().unwrap_or_default());
    }

    println!("\n[2] Powering off...");
    match remote.power_off().await {
        Ok(Reply::Success(_)) => println!("    ✓ TV is turning off"),
        Ok(Reply::Rejected(rejection)) => println!("    ✗ {rejection}"),
        // The TV may drop the socket before answering.
        Err(Error::ConnectionClosed) => println!("    ✓ TV closed the connection"),
        Err(e) => return Err(e.into()),
    }

    remote.close();
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug {
        "lgtv_remote=debug"
    } else {
        "lgtv_remote=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}
