mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newsbrief-cli")]
#[command(about = "Company news sentiment command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch recent news items for a company without analysis
    News {
        /// Company name to search for
        company: String,
    },
    /// Fetch, classify, and tag news items and print the sentiment tally
    Analyze {
        /// Company name to search for
        company: String,
    },
    /// Build the Hindi report for a company and synthesize it to MP3
    Speak {
        /// Company name to search for
        company: String,

        /// Print the report text without calling the speech endpoint
        #[arg(long)]
        text_only: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = newsbrief_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::News { company } => commands::run_news(&config, &company).await,
        Commands::Analyze { company } => commands::run_analyze(&config, &company).await,
        Commands::Speak { company, text_only } => {
            commands::run_speak(&config, &company, text_only).await
        }
    }
}
