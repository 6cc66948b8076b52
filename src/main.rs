use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use nuranest::api::{AnswerClient, ApiError};
use nuranest::config::{ClientConfig, ConfigError, DEFAULT_API_URL};
use nuranest::render;
use nuranest::repl::Repl;
use nuranest::session::ChatSession;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "nuranest", about = "Ask the Nuranest pregnancy-health assistant from your terminal")]
struct Cli {
    #[arg(long, env = "NURANEST_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Skip the connection check at start-up.
    #[arg(long)]
    no_health_check: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::new(&cli.api_url)?;
    let client = AnswerClient::from_config(&config)?;
    let (session, events) = ChatSession::new(client);

    let mut repl = Repl::new(&session, events, config.docs_url(), std::io::stdout());

    println!("Nuranest: {}", render::DISCLAIMER);
    println!("Backend: {}  (type /help for commands)\n", config.base_url());
    if !cli.no_health_check {
        session.check_health().await;
        repl.print_pending()?;
    }
    println!("{}", render::render_suggestions());

    repl.run(BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}
