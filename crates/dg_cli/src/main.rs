use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use clap::Parser;
use tracing::info;

use dg_core::config::AppConfig;
use dg_core::Result;
use dg_sources::{CaptionClient, GmailClient, LiveContentSource};
use dg_web::{create_app, handlers, ApiResponse, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the settings file (defaults to config/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(
        long,
        default_value = "memory",
        help = "Storage backend: memory (default) or dynamodb"
    )]
    storage: String,
    #[arg(
        long,
        default_value = "claude",
        help = "Summarizer model: claude (default) or dummy"
    )]
    model: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the web service
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
    /// Generate and send the daily meeting digest once
    Digest,
    /// Generate and send the newsletter digest once
    Newsletter,
    /// Feed a webhook payload from a file through the ingestion path
    Ingest { file: PathBuf },
}

fn report(what: &str, response: ApiResponse) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    if response.status.is_success() {
        Ok(())
    } else {
        Err(dg_core::Error::External(anyhow::anyhow!(
            "{what} failed with status {}",
            response.status
        )))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;

    let store = dg_storage::create_store(&cli.storage).await?;
    info!("💾 Storage initialized successfully (using {})", cli.storage);

    let api_key =
        (!config.anthropic_api_key.is_empty()).then(|| config.anthropic_api_key.clone());
    let summarizer = dg_inference::create_model(&cli.model, api_key)?;
    info!(
        "🧠 Summarizer initialized successfully (using {})",
        summarizer.name()
    );

    let mailer = Arc::new(GmailClient::new(config.gmail.clone()));
    let sources = Arc::new(LiveContentSource::new(config.gmail.clone()));
    let transcripts = Arc::new(CaptionClient::new());

    let state = AppState {
        config,
        store,
        summarizer,
        mailer,
        sources,
        transcripts,
    };

    match cli.command {
        Commands::Serve { addr } => {
            let app = create_app(state).await;
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("🌐 Listening on {addr}");
            axum::serve(listener, app).await?;
        }
        Commands::Digest => {
            let response = handlers::digest::run_digest(State(Arc::new(state))).await;
            report("digest", response)?;
        }
        Commands::Newsletter => {
            let response = handlers::newsletter::run_newsletter(State(Arc::new(state))).await;
            report("newsletter", response)?;
        }
        Commands::Ingest { file } => {
            let body = std::fs::read_to_string(&file)?;
            let response = handlers::webhook::receive_meeting(State(Arc::new(state)), body).await;
            report("ingest", response)?;
        }
    }

    Ok(())
}
