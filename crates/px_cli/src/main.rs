use anyhow::Context;
use clap::Parser;
use px_archive::{ArchiveConfig, ArchiveWriter, FileNaming, DEFAULT_ARCHIVE_DIR};
use px_core::{Article, PaperSource};
use px_inference::{InferenceConfig, ProfileReranker};
use px_search::arxiv::DEFAULT_ENDPOINT;
use px_search::{ArxivClient, ArxivConfig};
use px_web::handlers::{DEFAULT_DISPLAY_RESULTS, DEFAULT_MAX_RESULTS};
use px_web::{AppState, DEFAULT_CORS_ORIGIN};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search arXiv, rank results against a research profile and archive PDFs", long_about = None)]
pub struct Cli {
    #[arg(long, env = "PX_MODEL", default_value = "openai", help = "Model to use for ranking. Available models: openai (default), dummy")]
    model: String,
    /// Model name sent to the completion endpoint
    #[arg(long, env = "PX_MODEL_NAME")]
    model_name: Option<String>,
    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "PX_MODEL_URL")]
    model_url: Option<String>,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "PX_ARXIV_URL", default_value = DEFAULT_ENDPOINT)]
    arxiv_url: String,
    #[arg(long, env = "PX_ARCHIVE_DIR", default_value = DEFAULT_ARCHIVE_DIR)]
    archive_dir: PathBuf,
    /// Name archived PDFs by arXiv id or by normalized title
    #[arg(long, env = "PX_FILE_NAMING", default_value = "id")]
    file_naming: FileNaming,
    #[arg(long, env = "PX_LOG", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(long, env = "PX_BIND", default_value = "0.0.0.0:8000")]
        bind: String,
        /// Allowed CORS origins, comma separated
        #[arg(long, env = "PX_CORS_ORIGIN", value_delimiter = ',', default_value = DEFAULT_CORS_ORIGIN)]
        cors_origin: Vec<String>,
    },
    /// Search once and print the ranked response as JSON
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,
        #[arg(long, default_value_t = DEFAULT_DISPLAY_RESULTS)]
        display_results: usize,
        #[arg(long)]
        profile: Option<String>,
    },
    /// Archive the articles listed in a JSON file into today's folder
    Save {
        file: PathBuf,
    },
}

impl Cli {
    fn inference_config(&self) -> InferenceConfig {
        InferenceConfig {
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            model_name: self.model_name.clone(),
            model_url: self.model_url.clone(),
        }
    }

    fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig::new(&self.archive_dir).with_naming(self.file_naming)
    }
}

fn build_state(cli: &Cli) -> anyhow::Result<AppState> {
    let source: Arc<dyn PaperSource> =
        Arc::new(ArxivClient::new(ArxivConfig::default().with_endpoint(cli.arxiv_url.as_str()))?);
    info!("🔎 Search source initialized ({} at {})", source.name(), cli.arxiv_url);

    let model = px_inference::create_model(&cli.inference_config())?;
    info!("🧠 Ranking model initialized successfully (using {})", model.name());

    let archive = ArchiveWriter::new(cli.archive_config(), source.clone());
    info!("💾 Archive root: {}", archive.root().display());

    Ok(AppState {
        source,
        reranker: ProfileReranker::new(model),
        archive,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let state = build_state(&cli)?;

    match cli.command {
        Commands::Serve { bind, cors_origin } => {
            let app = px_web::create_app(state, &cors_origin)?;
            px_web::serve(app, &bind).await?;
        }
        Commands::Search {
            query,
            max_results,
            display_results,
            profile,
        } => {
            let articles = state.source.search(&query, max_results).await?;
            let response = state
                .reranker
                .rerank(&articles, profile.as_deref(), display_results)
                .await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Save { file } => {
            let raw = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let articles: Vec<Article> = serde_json::from_slice(&raw)
                .with_context(|| format!("Failed to parse articles from {}", file.display()))?;
            let report = state.archive.save(&articles).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
