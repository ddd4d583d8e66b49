use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use traveloki::auth::StaticTokenAuth;
use traveloki::category::Category;
use traveloki::config::Config;
use traveloki::logging;
use traveloki::moderation::ModerationService;
use traveloki::server::{start_server, AppState};
use traveloki::storage::{DirectoryStore, InMemoryDirectory};

#[derive(Parser)]
#[command(name = "traveloki")]
#[command(about = "Medan attraction directory and moderation service")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server over an in-memory directory seeded from config
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Load the config and seed data, print counts, and exit
    SeedCheck,
}

fn load_config(path: &PathBuf) -> Config {
    match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; using defaults", e);
            Config::default()
        }
    }
}

fn build_state(config: &Config) -> AppState {
    let store: Arc<dyn DirectoryStore> = Arc::new(InMemoryDirectory::seeded(config.seed.clone()));

    let auth = StaticTokenAuth::new();
    for entry in &config.tokens {
        auth.issue(&entry.token, &entry.username, entry.admin);
    }

    let moderation = Arc::new(ModerationService::new(
        store.clone(),
        config.category_ids.clone(),
    ));

    AppState {
        store,
        auth: Arc::new(auth),
        moderation,
        area: config.area.clone(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli.config);

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            let state = build_state(&config);
            info!(
                "Serving area '{}' with {} seeded attractions",
                config.area,
                config.seed.len()
            );
            start_server(state, port).await?;
        }
        Commands::SeedCheck => {
            let state = build_state(&config);
            let listing = state.store.list_attractions().await?;
            println!("Area: {}", config.area);
            for category in Category::priority_order() {
                println!(
                    "  {}: {} attractions",
                    category,
                    listing.in_category(category).len()
                );
            }
            println!("  tokens: {}", config.tokens.len());
        }
    }

    Ok(())
}
