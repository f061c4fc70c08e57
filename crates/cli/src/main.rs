//! Minimart CLI - catalog and cart management tools.
//!
//! # Usage
//!
//! ```bash
//! # Build the JSON catalog from a YAML product list
//! minimart catalog import catalog.yaml --out data/products.json
//!
//! # Validate an existing catalog
//! minimart catalog check --path data/products.json
//!
//! # Show or empty the shared cart
//! minimart cart show
//! minimart cart clear
//! ```
//!
//! Paths default to `STOREFRONT_PRODUCTS_PATH` / `STOREFRONT_CART_PATH` (or
//! `STOREFRONT_DATA_DIR`), the same variables the storefront reads.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use minimart_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "minimart")]
#[command(author, version, about = "Minimart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect or reset the shared cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Convert a YAML product list into the JSON catalog
    Import {
        /// YAML file containing a list of products
        file: PathBuf,

        /// Catalog file to write (defaults to the configured products path)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Validate a JSON catalog
    Check {
        /// Catalog file to check (defaults to the configured products path)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart with names, prices, and subtotal
    Show {
        /// Cart file (defaults to the configured cart path)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Remove every line from the cart
    Clear {
        /// Cart file (defaults to the configured cart path)
        #[arg(short, long)]
        path: Option<PathBuf>,
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
    let config = StorefrontConfig::from_env()?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Import { file, out } => {
                let out = out.unwrap_or(config.products_path);
                commands::catalog::import(&file, &out).await?;
            }
            CatalogAction::Check { path } => {
                let path = path.unwrap_or(config.products_path);
                commands::catalog::check(&path).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show { path } => {
                let path = path.unwrap_or(config.cart_path);
                commands::cart::show(&path, &config.products_path).await?;
            }
            CartAction::Clear { path } => {
                let path = path.unwrap_or(config.cart_path);
                commands::cart::clear(&path).await?;
            }
        },
    }
    Ok(())
}
