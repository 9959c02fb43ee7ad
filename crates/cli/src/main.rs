//! GoMarketplace CLI - inspect and edit a file-backed cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cli show
//!
//! # Add a product (or one more unit of it)
//! gm-cli add --id p1 --title "Shirt" --image-url https://cdn.example/shirt.png --price 50
//!
//! # Change quantities
//! gm-cli increment p1
//! gm-cli decrement p1
//!
//! # Drop a line, or everything
//! gm-cli remove p1
//! gm-cli clear
//! ```
//!
//! Storage location and snapshot key come from `CART_STORAGE_DIR` and
//! `CART_SNAPSHOT_KEY` (see `go_marketplace_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use go_marketplace_core::Price;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "GoMarketplace cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart contents and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(short, long)]
        title: String,

        /// Product image URL
        #[arg(short, long)]
        image_url: String,

        /// Unit price (e.g. 19.99)
        #[arg(short, long)]
        price: Price,
    },
    /// Add one unit to a product already in the cart
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit of a product, dropping it at zero
    Decrement {
        /// Product ID
        id: String,
    },
    /// Remove a product regardless of quantity
    Remove {
        /// Product ID
        id: String,
    },
    /// Remove every product
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gm_cli=info,go_marketplace_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = commands::cart::open().await?;

    match cli.command {
        Commands::Show => commands::cart::show(&store),
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(&store, id, title, image_url, price),
        Commands::Increment { id } => commands::cart::increment(&store, &id)?,
        Commands::Decrement { id } => commands::cart::decrement(&store, &id)?,
        Commands::Remove { id } => commands::cart::remove(&store, &id)?,
        Commands::Clear => commands::cart::clear(&store),
    }

    store.flush().await;
    Ok(())
}
