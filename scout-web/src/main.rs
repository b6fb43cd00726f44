//! Scout Web Server
//!
//! HTTP front end for the Scout research agent.

use clap::Parser;
use scout_core::{LoggingConfig, ScoutConfig};
use scout_web::{create_app, AppState, WebConfig};
use tokio::net::TcpListener;
use tracing::info;

/// Scout Web Server - web research summaries over HTTP
#[derive(Parser)]
#[command(name = "scout-web")]
#[command(about = "HTTP interface for the Scout research agent")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Set up logging
    let logging = LoggingConfig {
        level: args.log_level.clone(),
        ..LoggingConfig::default()
    };
    if let Err(e) = scout_core::init_logging(&logging) {
        eprintln!("⚠️  Failed to initialize logging: {}", e);
    }

    // Load research configuration
    let scout = match &args.config {
        Some(path) => match ScoutConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => ScoutConfig::default(),
    }
    .apply_env_overrides();

    // Create web configuration
    let mut config = WebConfig::from_env();
    config.host = args.host;
    config.port = args.port;

    // Print startup information
    println!("🚀 Starting Scout Web Server");
    println!("📍 Server: http://{}", config.address());
    println!("🤖 Default model: {}", scout.llm.model);

    // Check for required environment variables
    let mut missing_vars = Vec::new();
    if std::env::var("TAVILY_API_KEY").is_err() {
        missing_vars.push("TAVILY_API_KEY");
    }
    if std::env::var("OPENROUTER_API_KEY").is_err() && std::env::var("OPENAI_API_KEY").is_err() {
        missing_vars.push("LLM API key (OPENROUTER_API_KEY or OPENAI_API_KEY)");
    }
    if !missing_vars.is_empty() {
        println!("⚠️  Warning: Missing environment variables:");
        for var in missing_vars {
            println!("   - {}", var);
        }
        println!("   The server will start but research requests will fail.");
    }

    // Build application state
    let state = match AppState::new(config.clone(), scout) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build server state: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_app(state);

    // Start the server (this will block until shutdown)
    let listener = match TcpListener::bind(config.address()).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("❌ Failed to bind {}: {}", config.address(), e);
            std::process::exit(1);
        }
    };

    info!("✅ Server listening on http://{}", config.address());

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
