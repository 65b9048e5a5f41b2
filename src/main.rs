use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use face_search::config::{ServerConfig, StoreConfig};
use face_search::store::DocStore;
use face_search::{api, embedding};

#[derive(Parser)]
#[command(version, about = "Local face retrieval service")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the HTTP API
    Api,
    /// Print the embedding of a local image file (generator probe)
    Embed { path: std::path::PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().cmd {
        Cmd::Api => {
            let store = DocStore::connect(&StoreConfig::from_env());
            api::run(store, ServerConfig::from_env()).await?;
        }
        Cmd::Embed { path } => {
            let bytes = std::fs::read(&path)?;
            let vector = embedding::generate(&bytes)?;
            println!("{}", serde_json::to_string(&vector)?);
        }
    }
    Ok(())
}
