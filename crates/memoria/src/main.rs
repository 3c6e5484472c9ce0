// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memoria - conversation chunking and classification.
//!
//! This is the binary entry point. Results go to stdout as JSON (or TOML for
//! `memoria config`); logs go to stderr.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod input;
mod inspect;
mod process;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use memoria_config::MemoriaConfig;
use memoria_core::MemoriaError;
use serde::Serialize;
use tracing::error;

/// Memoria - conversation chunking and classification.
#[derive(Parser, Debug)]
#[command(name = "memoria", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Chunk a conversation and print the chunks as JSON.
    Process(ProcessArgs),
    /// Print the segments a conversation splits into.
    Segment {
        /// Conversation file; stdin when omitted or `-`.
        file: Option<PathBuf>,
    },
    /// Classify and score text without embedding it.
    Classify {
        /// Text file; stdin when omitted or `-`.
        file: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Session the chunks belong to.
    #[arg(long)]
    session: String,

    /// Repository recorded in every chunk's metadata.
    #[arg(long)]
    repository: Option<String>,

    /// Tag added to every chunk; repeatable.
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Conversation file; stdin when omitted or `-`.
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => memoria_config::load_and_validate_path(path),
        None => memoria_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            memoria_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.server.log_level);
    memoria_chunking::recording::register_metrics();

    if let Err(e) = run(cli.command, &config).await {
        error!(error = %e, "command failed");
        eprintln!("memoria: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &MemoriaConfig) -> Result<(), MemoriaError> {
    match command {
        Commands::Process(args) => process::run(config, args).await,
        Commands::Segment { file } => {
            let text = input::read_input(file.as_deref()).await?;
            print_json(&inspect::segments(&config.chunking, &text))
        }
        Commands::Classify { file } => {
            let text = input::read_input(file.as_deref()).await?;
            print_json(&inspect::classify(&text)?)
        }
        Commands::Config => {
            let rendered = toml::to_string_pretty(&redacted(config))
                .map_err(|e| MemoriaError::Internal(format!("failed to render config: {e}")))?;
            print!("{rendered}");
            Ok(())
        }
    }
}

/// Copy of `config` safe to print.
fn redacted(config: &MemoriaConfig) -> MemoriaConfig {
    let mut config = config.clone();
    if config.embedding.api_key.is_some() {
        config.embedding.api_key = Some("<redacted>".to_string());
    }
    config
}

fn print_json<T: Serialize>(value: &T) -> Result<(), MemoriaError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| MemoriaError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("memoria={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
