//! Ragline CLI — the main entry point.
//!
//! Commands:
//! - `serve`  — Start the HTTP answering gateway
//! - `index`  — Ingest documents into the search index
//! - `doctor` — Check the configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "ragline",
    about = "Ragline — retrieval-augmented chatbot backend",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ingest documents into the search index
    Index {
        /// Files to ingest
        #[arg(long, required = true, num_args = 1..)]
        docs: Vec<PathBuf>,

        /// Chunk size in characters
        #[arg(long, default_value_t = 1000)]
        chunk_size: usize,

        /// Overlap between consecutive chunks, in characters
        #[arg(long, default_value_t = 200)]
        overlap: usize,
    },

    /// Check the configuration
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Index {
            docs,
            chunk_size,
            overlap,
        } => commands::index::run(docs, chunk_size, overlap).await?,
        Commands::Doctor => commands::doctor::run()?,
    }

    Ok(())
}
