//! Scout CLI - Command-line interface for the Scout research agent
//!
//! Runs one research pass per invocation and prints the cited Markdown
//! summary, or lists recent research records.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scout_agent::{
    FileResearchLog, ResearchLogStore, ResearchPipeline, ResearchRecord, ResearchRequest,
};
use scout_core::{LoggingConfig, ScoutConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Research a query on the web and summarize it with citations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a query and print the summary
    Query {
        /// The query to research
        query: String,

        /// Model alias from the configured allow-list
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature (0.0-2.0)
        #[arg(short, long)]
        temperature: Option<f32>,
    },

    /// Show recent research records
    History {
        /// Maximum number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let logging = LoggingConfig {
        level: cli.log_level.clone(),
        ..LoggingConfig::default()
    };
    let _ = scout_core::init_logging(&logging);

    let config = match &cli.config {
        Some(path) => ScoutConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ScoutConfig::default(),
    }
    .apply_env_overrides();
    config.validate().context("invalid configuration")?;

    match cli.command {
        Commands::Query {
            query,
            model,
            temperature,
        } => run_query(config, query, model, temperature).await,
        Commands::History { limit } => show_history(config, limit).await,
    }
}

async fn run_query(
    config: ScoutConfig,
    query: String,
    model: Option<String>,
    temperature: Option<f32>,
) -> Result<()> {
    if query.trim().is_empty() {
        bail!("query must not be empty");
    }
    if let Some(t) = temperature {
        if !(0.0..=2.0).contains(&t) {
            bail!("temperature must be within [0.0, 2.0], got {}", t);
        }
    }

    // Request-supplied models go through the alias allow-list.
    let model_name = match model.as_deref() {
        Some(alias) => match config.resolve_model_alias(alias) {
            Some(resolved) => Some(resolved.to_string()),
            None => bail!(
                "unknown model alias '{}'; known aliases: {}",
                alias,
                known_aliases(&config)
            ),
        },
        None => None,
    };

    let history_log = config
        .history
        .log_path
        .as_deref()
        .and_then(|path| FileResearchLog::new(path).ok());

    let pipeline = ResearchPipeline::new(Arc::new(config));

    let mut request = ResearchRequest::new(query.trim());
    request.model_name = model_name;
    request.temperature = temperature;

    println!("🔍 Researching: {}", query.trim());
    let result = pipeline.run_research(request).await;

    if result.is_failure() {
        bail!("{}", result.final_summary);
    }

    // Unlike the long-lived server, the process exits right after printing,
    // so the record is appended before returning rather than spawned.
    if let Some(log) = &history_log {
        if let Err(e) = log.append(&ResearchRecord::from_result(&result)).await {
            eprintln!("⚠️  Failed to record research result: {}", e);
        }
    }

    println!();
    println!("{}", result.final_summary);
    if !result.sources.is_empty() {
        println!();
        println!("Sources:");
        for source in &result.sources {
            println!("  - {} <{}>", source.title, source.url);
        }
    }

    Ok(())
}

async fn show_history(config: ScoutConfig, limit: usize) -> Result<()> {
    let Some(path) = config.history.log_path.as_deref() else {
        println!("Research history is not configured (set history.log_path).");
        return Ok(());
    };

    let log = FileResearchLog::new(path)
        .with_context(|| format!("failed to open research log at {}", path))?;
    let records = log
        .read_recent(limit)
        .await
        .context("failed to read research history")?;

    if records.is_empty() {
        println!("No research records yet.");
        return Ok(());
    }

    for record in records {
        println!(
            "[{}] {}",
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            record.query
        );
        let summary: String = record.final_summary.chars().take(200).collect();
        println!("  {}", summary.replace('\n', " "));
        for source in record.sources() {
            println!("  - {} <{}>", source.title, source.url);
        }
        println!();
    }

    Ok(())
}

fn known_aliases(config: &ScoutConfig) -> String {
    let mut aliases: Vec<&str> = config
        .llm
        .model_aliases
        .keys()
        .map(String::as_str)
        .collect();
    aliases.sort_unstable();
    aliases.join(", ")
}
