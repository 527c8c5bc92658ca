//! Shopfront CLI - catalog and durable store tools.
//!
//! # Usage
//!
//! ```bash
//! # Fetch the upstream catalog and summarize it
//! sf-cli fetch
//!
//! # Inspect or clear the durable cart
//! sf-cli cart show
//! sf-cli cart clear
//!
//! # Inspect or clear the durable wishlist
//! sf-cli wishlist show --dir /var/lib/shopfront
//! sf-cli wishlist clear
//! ```
//!
//! # Commands
//!
//! - `fetch` - Fetch, normalize and sectionize the catalog once
//! - `cart show|clear` - Inspect or clear the stored cart
//! - `wishlist show|clear` - Inspect or clear the stored wishlist

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the upstream catalog and log a summary
    Fetch {
        /// Skip the bearer credential even if one is configured
        #[arg(long)]
        anonymous: bool,
    },
    /// Manage the stored cart
    Cart {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Manage the stored wishlist
    Wishlist {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// List stored records
    Show {
        /// Storage directory (defaults to `STOREFRONT_STORAGE_DIR` or `.shopfront`)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Remove every stored record
    Clear {
        /// Storage directory (defaults to `STOREFRONT_STORAGE_DIR` or `.shopfront`)
        #[arg(short, long)]
        dir: Option<PathBuf>,
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
    use commands::store::Collection;

    match cli.command {
        Commands::Fetch { anonymous } => {
            commands::fetch::run(anonymous).await?;
        }
        Commands::Cart { action } => run_store(Collection::Cart, action)?,
        Commands::Wishlist { action } => run_store(Collection::Wishlist, action)?,
    }
    Ok(())
}

fn run_store(
    collection: commands::store::Collection,
    action: StoreAction,
) -> Result<(), commands::store::StoreCommandError> {
    match action {
        StoreAction::Show { dir } => {
            commands::store::show(collection, dir)?;
        }
        StoreAction::Clear { dir } => commands::store::clear(collection, dir)?,
    }
    Ok(())
}
