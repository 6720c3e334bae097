mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use inner_map_core::{DEFAULT_MAX_TURNS, DEFAULT_MIN_TURNS, TurnLimits, env_parse_with_default};
use inner_map_llm::{DEFAULT_IMAGE_MODEL, DEFAULT_MODEL, LlmClient};
use inner_map_service::{InsightSynthesizer, JournalService, Journey};
use inner_map_storage::{FileStore, KeyValueStore, SessionStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inner-map")]
#[command(about = "Guided self-reflection journal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API for the browser front end
    Serve {
        #[arg(short, long, default_value = "37777")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Run an interview in the terminal
    Interview,
    /// List journal entries, newest first
    Journal {
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// List milestones, oldest first
    Evolution,
    /// Print one journal entry
    Show {
        /// Entry id: its creation time in epoch milliseconds
        created_at: i64,
    },
}

fn get_data_dir() -> PathBuf {
    std::env::var_os("INNER_MAP_DATA_DIR").map(PathBuf::from).unwrap_or_else(|| {
        dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("inner-map")
    })
}

fn get_api_key() -> Result<String> {
    std::env::var("INNER_MAP_API_KEY")
        .map_err(|_| anyhow::anyhow!("INNER_MAP_API_KEY environment variable must be set"))
}

fn get_base_url() -> String {
    std::env::var("INNER_MAP_API_URL").unwrap_or_else(|_| "https://api.openai.com".to_owned())
}

fn get_turn_limits() -> Result<TurnLimits> {
    let min = env_parse_with_default("INNER_MAP_MIN_TURNS", DEFAULT_MIN_TURNS);
    let max = env_parse_with_default("INNER_MAP_MAX_TURNS", DEFAULT_MAX_TURNS);
    Ok(TurnLimits::new(min, max)?)
}

fn build_llm() -> Result<Arc<LlmClient>> {
    let model = std::env::var("INNER_MAP_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
    let image_model =
        std::env::var("INNER_MAP_IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_owned());
    let llm = LlmClient::new(get_api_key()?, get_base_url())?
        .with_model(model)
        .with_image_model(image_model);
    tracing::debug!(base_url = llm.base_url(), model = llm.model(), "provider configured");
    Ok(Arc::new(llm))
}

async fn open_journal() -> Result<JournalService> {
    let dir = get_data_dir();
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&dir).await?);
    tracing::debug!(dir = %dir.display(), "journal store opened");
    Ok(JournalService::new(Arc::new(SessionStore::new(kv))))
}

/// A journey wired to the configured provider and on-disk journal.
async fn launch_journey() -> Result<(Journey, JournalService)> {
    let limits = get_turn_limits()?;
    let llm = build_llm()?;
    let journal = open_journal().await?;
    let synthesizer = InsightSynthesizer::new(llm.clone(), llm.clone());
    let journey = Journey::launch(limits, llm, synthesizer, journal.clone()).await;
    Ok((journey, journal))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await?,
        Commands::Interview => commands::interview::run().await?,
        Commands::Journal { limit } => commands::journal::run_journal(limit).await?,
        Commands::Evolution => commands::journal::run_evolution().await?,
        Commands::Show { created_at } => commands::journal::run_show(created_at).await?,
    }

    Ok(())
}
