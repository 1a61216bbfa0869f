//! Velvet Loom CLI - Operational tooling.
//!
//! # Usage
//!
//! ```bash
//! # Seed categories and sample products through the admin API
//! vl-cli seed --base-url http://localhost:8000 -e admin@example.com -p hunter2
//!
//! # Check backend reachability
//! vl-cli health --base-url http://localhost:8000
//! ```
//!
//! # Commands
//!
//! - `seed` - Populate the catalog with sample categories and products
//! - `health` - Backend reachability check

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vl-cli")]
#[command(author, version, about = "Velvet Loom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the catalog with sample categories and products
    Seed {
        /// Base URL of the backend REST API
        #[arg(long)]
        base_url: String,

        /// Admin account email
        #[arg(short, long)]
        email: String,

        /// Admin account password
        #[arg(short, long)]
        password: String,

        /// Number of products to create
        #[arg(short, long, default_value_t = 24)]
        count: usize,
    },
    /// Check backend reachability
    Health {
        /// Base URL of the backend REST API
        #[arg(long)]
        base_url: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed {
            base_url,
            email,
            password,
            count,
        } => commands::seed::run(&base_url, &email, &password, count).await?,
        Commands::Health { base_url } => commands::health::run(&base_url).await?,
    }
    Ok(())
}
