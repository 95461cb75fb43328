//! Standalone web server binary
//!
//! Usage: cargo run -p blackjack-web --bin blackjack-web-server

use blackjack_web::{AppContext, ServerConfig, WebServer};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    blackjack_web::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let mut host = "127.0.0.1".to_string();
    let mut port = 3000u16;
    let mut static_dir: Option<PathBuf> = None;
    let mut deck_api: Option<String> = std::env::var("DECK_API_URL").ok();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                if i + 1 < args.len() {
                    host = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --host requires a value");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a value");
                    std::process::exit(1);
                }
            }
            "--static-dir" | "-d" => {
                if i + 1 < args.len() {
                    static_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("Error: --static-dir requires a value");
                    std::process::exit(1);
                }
            }
            "--deck-api" => {
                if i + 1 < args.len() {
                    deck_api = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --deck-api requires a value");
                    std::process::exit(1);
                }
            }
            "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    let static_path = if let Some(dir) = static_dir {
        dir
    } else {
        let current_dir = std::env::current_dir()?;
        let candidates = vec![
            current_dir.join("rust").join("web").join("static"),
            current_dir.join("static"),
            PathBuf::from("static"),
        ];

        candidates
            .into_iter()
            .find(|p| p.exists())
            .unwrap_or_else(|| {
                eprintln!("Error: Could not find static directory.");
                eprintln!("Tried:");
                eprintln!("  - rust/web/static");
                eprintln!("  - static");
                eprintln!("Please specify with --static-dir");
                std::process::exit(1);
            })
    };

    let mut config = ServerConfig::new(host, port, static_path);
    if let Some(url) = deck_api {
        config = config.with_deck_api_url(url);
    }

    tracing::info!("Starting Blackjack Web Server");
    tracing::info!("  Host: {}", config.host());
    tracing::info!("  Port: {}", config.port());
    tracing::info!("  Static: {}", config.static_dir().display());
    tracing::info!("  Deck API: {}", config.deck_api_url());

    // One remote call initializes the deck; if the provider is down the
    // process exits instead of serving a table it cannot deal from.
    let context = AppContext::connect(config).await?;
    let handle = WebServer::from_context(context).start().await?;

    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}

fn print_help() {
    println!("Blackjack Web Server");
    println!();
    println!("Usage: blackjack-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>           Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>           Port to bind to (default: 3000)");
    println!("  --static-dir, -d <DIR>      Static files directory");
    println!("  --deck-api <URL>            Deck API base URL (or DECK_API_URL env)");
    println!("  --help                      Show this help message");
}
