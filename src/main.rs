//! route-tree
//!
//! Serves the demo route tree, or prints its route table.
//!
//! # Startup order
//!
//! ```text
//! config (TOML, optional) → logging → route build → listener → serve
//! ```
//!
//! A route build error is fatal and happens before the listener is bound.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use route_tree::config::{load_config, ServerConfig};
use route_tree::{demo, observability, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "route-tree")]
#[command(about = "Declarative route trees on axum", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the route tree and serve it
    Serve {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Build the route tree and print its endpoints
    Routes {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config).await,
        Commands::Routes { json } => print_routes(json),
    }
}

async fn serve(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    observability::init_logging(&config.observability)?;

    tracing::info!(
        config = ?path,
        bind_address = %config.listener.bind_address,
        "Configuration loaded"
    );

    let router = demo::app().build()?;

    let server = HttpServer::new(config, router);
    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_routes(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = demo::app().registry()?;

    if json {
        println!("{}", serde_json::to_string_pretty(registry.endpoints())?);
    } else {
        for endpoint in registry.endpoints() {
            println!("{endpoint}");
        }
    }
    Ok(())
}
