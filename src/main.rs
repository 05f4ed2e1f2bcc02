use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use wca_nlp_landscape::actors;
use wca_nlp_landscape::config::Config;
use wca_nlp_landscape::docs::{self, DocSelection};
use wca_nlp_landscape::evaluations;
use wca_nlp_landscape::fetch::{self, simbabench, FetchOptions};
use wca_nlp_landscape::languages::LanguageRegistry;
use wca_nlp_landscape::render;
use wca_nlp_landscape::report::RunReport;

/// Collect, merge and publish NLP resource data for West and Central African languages
#[derive(Parser, Debug)]
#[command(name = "wca-nlp-landscape", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch metadata, hub listings and corpus statistics, then distribute evaluations
    Fetch {
        /// Only process this ISO 639-3 code
        #[arg(long)]
        lang: Option<String>,

        /// Re-query the hub even when listings already exist
        #[arg(long)]
        force: bool,
    },
    /// Rebuild every language's evaluations from the bulk evaluation files
    Distribute,
    /// Regenerate the static site from the current YAML state
    Site,
    /// Generate the office documents (both when no flag is given)
    Docs {
        #[arg(long)]
        languages: bool,

        #[arg(long)]
        actors: bool,
    },
    /// Print the actor prioritization ranking
    Score,
    /// Convert the SimbaBench leaderboard into a bulk evaluation file
    ImportSimbabench {
        /// Read a saved API response instead of querying the leaderboard
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn finish(report: &RunReport) {
    print!("{}", report);
    report.log_summary();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (absent in CI)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wca_nlp_landscape=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let registry = LanguageRegistry::load(&config.focused_languages_path())
        .context("Failed to load the focus language registry")?;
    info!("Tracking {} focus languages", registry.len());

    let report = match cli.command {
        Commands::Fetch { lang, force } => {
            let options = FetchOptions { lang, force };
            fetch::run_fetch(&config, &registry, &options).await?
        }
        Commands::Distribute => evaluations::run_distribute(&config, &registry.codes())?,
        Commands::Site => render::render_site(&config, &registry, Utc::now())?,
        Commands::Docs { languages, actors } => docs::run_docs(
            &config,
            &registry,
            DocSelection::from_flags(languages, actors),
            Utc::now(),
        )?,
        Commands::Score => {
            let (registry, report) = actors::run_score(&config)?;
            print!("{}", actors::ranking_table(&registry));
            report
        }
        Commands::ImportSimbabench { json } => {
            let client = fetch::http_client(&config)?;
            simbabench::run_import(&config, &client, json.as_deref()).await?
        }
    };

    finish(&report);
    Ok(())
}
