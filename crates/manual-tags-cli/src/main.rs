mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use manual_tags_openai::OpenAiVectorStoreClient;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "manual-tagger")]
#[command(about = "Tag service manuals in a vector store with their device id")]
struct Cli {
    /// Config file (defaults to ~/.config/manual-tagger/tags.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct StoreArgs {
    /// Vector store id (overrides the configured one)
    #[arg(long = "vector-store")]
    vector_store: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Attach a device_id attribute to every mapped file in the store
    Tag {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// List the store's files and the device id each would receive
    Files {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Print the file name to device id mapping
    Mapping,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn openai_api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY").ok()
}

fn openai_base_url() -> Option<String> {
    std::env::var("OPENAI_BASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
}

fn build_client(config: &AppConfig) -> Result<OpenAiVectorStoreClient> {
    let api_key = openai_api_key().unwrap_or_default();
    OpenAiVectorStoreClient::new(config.client_config(api_key, openai_base_url()))
        .context("failed to build vector store client")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Tag { store } => {
            let store_id = config.resolve_store(store.vector_store.as_deref())?;
            let client = build_client(&config)?;
            let mut stdout = std::io::stdout().lock();
            commands::tag::run(client, config.tags, &store_id, &mut stdout).await?;
            Ok(())
        }
        Command::Files { store } => {
            let store_id = config.resolve_store(store.vector_store.as_deref())?;
            let client = build_client(&config)?;
            let mut stdout = std::io::stdout().lock();
            commands::files::run(&client, &config.tags, &store_id, &mut stdout).await
        }
        Command::Mapping => {
            commands::mapping::run(&config.tags, &mut std::io::stdout().lock())?;
            Ok(())
        }
    }
}
