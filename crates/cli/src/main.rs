//! Product Desk CLI - catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # List categories as `id<TAB>name`
//! pd-cli categories
//!
//! # Create a product (date defaults to today)
//! pd-cli create --product-code PROD-0001 --name Widget --category-id 1 \
//!     --price 10 --quantity 5 --date-added 2024-01-01
//! ```
//!
//! # Commands
//!
//! - `categories` - List product categories
//! - `create` - Validate and save a product

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pd-cli")]
#[command(author, version, about = "Product Desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List product categories
    Categories,
    /// Create a product through the create-form validation rules
    Create(commands::create::CreateArgs),
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Categories => commands::categories::list().await?,
        Commands::Create(args) => commands::create::create(args).await?,
    }
    Ok(())
}
