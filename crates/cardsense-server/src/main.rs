//! CardSense — card category recommendation server.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cardsense_core::CardSenseConfig;
use cardsense_server::{build_router, AppState};

fn print_help() {
    println!("CardSense — card category recommendation server");
    println!();
    println!("Usage: cardsense [command]");
    println!();
    println!("Commands:");
    println!("  (none)      Start the server");
    println!("  backends    Show which analysis backends are configured");
    println!("  help        Show this help message");
    println!();
    println!("Environment:");
    println!("  PORT, CARDSENSE_DATA_DIR, CARDSENSE_REQUEST_TIMEOUT_SECS,");
    println!("  CARDSENSE_BACKEND_TIMEOUT_SECS, HUGGING_FACE_TOKEN, OPENAI_API_KEY");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = CardSenseConfig::from_env()?;
    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "backends" | "--backends" => {
                let state = AppState::new(config)?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&state.backend_config.to_response())?
                );
                println!("image chain: {}", state.engine.image_chain().join(" -> "));
                println!("text chain:  {}", state.engine.text_chain().join(" -> "));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'cardsense help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let port = config.port;
    info!("Data directory: {}", config.data_dir.display());

    // Build application state
    let state = Arc::new(AppState::new(config)?);

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("CardSense server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
