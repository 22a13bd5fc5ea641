//! # Bridge Runtime
//!
//! Development host for the frame bridge. Plays both sides over the in-memory
//! medium: the frame asks for the version and public key, then requests a
//! signature, and the host prompts for the password on the terminal.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file, then `BB_*` environment)
//! 2. Initialize logging
//! 3. Build the development backend and terminal presenter
//! 4. Bind the frame and install the client
//! 5. Run the requests and print each reply

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use bridge_runtime::{BridgeRuntime, DevIdentityBackend, RuntimeConfig, TerminalPresenter};
use shared_protocol::ActionResponse;

#[derive(Parser, Debug)]
#[command(name = "bridge-runtime")]
#[command(about = "Run the frame bridge end to end with a development identity")]
struct Args {
    /// JSON configuration file
    #[arg(short, long, env = "BB_CONFIG")]
    config: Option<PathBuf>,

    /// Messages to sign (repeatable)
    #[arg(short, long = "sign", default_values_t = vec!["hello from the frame".to_string()])]
    messages: Vec<String>,

    /// Keep running after the requests until Ctrl+C
    #[arg(long)]
    stay: bool,
}

fn print_reply(action: &str, response: &ActionResponse) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&response.clone().into_value())?;
    println!("{action} -> {rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = RuntimeConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    bridge_telemetry::init_tracing(&config.telemetry).context("Failed to initialize logging")?;

    let backend = DevIdentityBackend::from_config(&config.dev_identity)
        .context("Failed to create development identity")?;
    let presenter = TerminalPresenter::stdio();

    let runtime = BridgeRuntime::start(&config, Arc::new(backend), Arc::new(presenter))
        .context("Failed to start bridge runtime")?;
    let client = runtime.client().clone();

    let version = client.get_version().await?;
    print_reply("getVersion", &version)?;

    let public_key = client.get_public_key().await?;
    print_reply("getPublicKey", &public_key)?;

    let signed = client.sign_with_active_identity(&args.messages).await?;
    print_reply("signWithActiveIdentity", &signed)?;

    if let Some(stats) = runtime.dispatch_stats() {
        info!(?stats, "Dispatch statistics");
    }

    if args.stay {
        info!("Bridge is running. Press Ctrl+C to stop.");
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to wait for Ctrl+C");
        }
    }

    runtime.shutdown();
    Ok(())
}
