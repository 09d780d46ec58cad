//! Bazaar CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bazaar-cli migrate
//!
//! # Grant staff permissions to a user
//! bazaar-cli staff grant -u alice
//!
//! # Revoke staff permissions
//! bazaar-cli staff revoke -u alice
//!
//! # Seed the database with sample catalog data
//! bazaar-cli seed
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar-cli")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage staff permissions
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
    /// Seed the database with sample catalog data
    Seed,
}

#[derive(Subcommand)]
enum StaffAction {
    /// Grant staff permissions to a user
    Grant {
        /// Username of the account
        #[arg(short, long)]
        username: String,
    },
    /// Revoke staff permissions from a user
    Revoke {
        /// Username of the account
        #[arg(short, long)]
        username: String,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Staff { action } => match action {
            StaffAction::Grant { username } => {
                commands::staff::set_staff(&username, true).await?;
            }
            StaffAction::Revoke { username } => {
                commands::staff::set_staff(&username, false).await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
