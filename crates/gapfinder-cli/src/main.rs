mod commands;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gapfinder")]
#[command(about = "Find content gaps for a YouTube channel")]
struct Cli {
    /// YAML file overriding analyzer heuristics (defaults to `GAPFINDER_TUNING_PATH`).
    #[arg(long, global = true)]
    tuning: Option<PathBuf>,

    /// Tab-separated `word<TAB>TAG` lexicon enabling part-of-speech keyword filtering.
    #[arg(long, global = true)]
    pos_lexicon: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a live channel, index its videos, and rank content gaps.
    AnalyzeChannel {
        #[arg(long)]
        channel_url: String,
        /// Most recent videos to analyze (defaults to `GAPFINDER_MAX_VIDEOS`).
        #[arg(long)]
        max_videos: Option<usize>,
    },
    /// Search the corpus for a topic and analyze the competition.
    AnalyzeTopic {
        #[arg(long)]
        topic: String,
    },
    /// Run the analytics engine on a JSON array of video records.
    AnalyzeFile {
        #[arg(long)]
        videos: PathBuf,
        /// JSON array of topic aggregates to score alongside the analysis.
        #[arg(long)]
        aggregates: Option<PathBuf>,
    },
    /// Score a JSON array of topic aggregates.
    ScoreGaps {
        #[arg(long)]
        aggregates: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = gapfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let analyzer = commands::build_analyzer(
        cli.tuning.as_deref().or(config.tuning_path.as_deref()),
        cli.pos_lexicon.as_deref(),
    )?;

    match cli.command {
        Commands::AnalyzeChannel {
            channel_url,
            max_videos,
        } => {
            commands::run_analyze_channel(&config, &analyzer, &channel_url, max_videos).await?;
        }
        Commands::AnalyzeTopic { topic } => {
            commands::run_analyze_topic(&config, &topic).await?;
        }
        Commands::AnalyzeFile { videos, aggregates } => {
            commands::run_analyze_file(&analyzer, &videos, aggregates.as_deref())?;
        }
        Commands::ScoreGaps { aggregates } => {
            commands::run_score_gaps(&analyzer, &aggregates)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
