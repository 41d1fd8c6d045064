use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpPincodeDirectory, LookupOutcome, PincodeDirectory, PincodeLookupController};
use shared::error::ApiError;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod render;
mod session;

use config::load_settings;

/// Look up Indian postal codes and the post offices they cover.
#[derive(Parser, Debug)]
#[command(name = "pincode", version)]
struct Cli {
    /// Base URL of the pincode API.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Config file (defaults to ./pincode.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up one pincode and print its post offices.
    Lookup {
        pincode: String,
        /// Only show post offices whose name contains this text.
        #[arg(long, short)]
        filter: Option<String>,
        /// Print the visible post offices as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Read `lookup`/`filter` commands from stdin.
    Interactive,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }
    tracing::debug!(api_base_url = %settings.api_base_url, "settings loaded");

    let directory: Arc<dyn PincodeDirectory> = Arc::new(
        HttpPincodeDirectory::with_timeout(&settings.api_base_url, settings.request_timeout())
            .context("failed to configure pincode API client")?,
    );

    match cli.command {
        Command::Lookup {
            pincode,
            filter,
            json,
        } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to build runtime")?;
            runtime.block_on(lookup_once(directory, &pincode, filter, json))
        }
        Command::Interactive => {
            session::run(directory)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn lookup_once(
    directory: Arc<dyn PincodeDirectory>,
    input: &str,
    filter: Option<String>,
    json: bool,
) -> Result<ExitCode> {
    let controller = PincodeLookupController::new(directory);
    if let Some(filter) = filter {
        controller.set_filter(filter);
    }

    if !json {
        eprintln!("{}", render::LOADING_INDICATOR);
    }
    let outcome = controller.submit(input).await;
    let state = controller.snapshot();

    match outcome {
        LookupOutcome::Succeeded(_) => {
            if json {
                println!("{}", render::render_json(&state)?);
            } else {
                print!("{}", render::render_results(&state));
            }
            Ok(ExitCode::SUCCESS)
        }
        LookupOutcome::Rejected(err) | LookupOutcome::Failed(err) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&ApiError::from(err))?);
            } else {
                eprintln!("{}", err.message());
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
