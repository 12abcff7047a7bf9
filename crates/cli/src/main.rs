//! Orbit Market CLI - Seeding and seller management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the database with demo catalog data
//! orbit-cli seed
//!
//! # Approve a seller by email
//! orbit-cli seller approve -e seller@example.com
//!
//! # Revoke a seller's approval
//! orbit-cli seller revoke -e seller@example.com
//! ```
//!
//! # Commands
//!
//! - `seed` - Seed the database with demo data
//! - `seller approve` / `seller revoke` - Toggle a seller's approval flag

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "orbit-cli")]
#[command(author, version, about = "Orbit Market CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the database with demo data
    Seed {
        /// Drop existing demo documents first
        #[arg(long, default_value_t = false)]
        clear: bool,
    },
    /// Manage sellers
    Seller {
        #[command(subcommand)]
        action: SellerAction,
    },
}

#[derive(Subcommand)]
enum SellerAction {
    /// Approve a seller for the marketplace
    Approve {
        /// Seller email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke a seller's approval
    Revoke {
        /// Seller email address
        #[arg(short, long)]
        email: String,
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
        Commands::Seed { clear } => commands::seed::run(clear).await?,
        Commands::Seller { action } => match action {
            SellerAction::Approve { email } => {
                commands::seller::set_approval(&email, true).await?;
            }
            SellerAction::Revoke { email } => {
                commands::seller::set_approval(&email, false).await?;
            }
        },
    }
    Ok(())
}
