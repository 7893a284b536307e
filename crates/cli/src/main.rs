//! BlueDrop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (creates the schema if needed)
//! bd-cli migrate
//!
//! # Create a business owner account
//! bd-cli owner create -e owner@example.com -n "Suresh Sharma" \
//!     -b "Sharma Waters" --price 25 --phone 9876543210
//!
//! # Rewrite customer running totals from the true delivery sums
//! bd-cli reconcile
//! ```
//!
//! # Environment Variables
//!
//! - `BLUEDROP_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `BLUEDROP_APP_ID` - namespace schema (default: bluedrop)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "bd-cli")]
#[command(author, version, about = "BlueDrop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage owner accounts
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },
    /// Rewrite customer running totals from the true delivery sums
    Reconcile,
}

#[derive(Subcommand)]
enum OwnerAction {
    /// Create a business owner account
    Create {
        /// Owner email address
        #[arg(short, long)]
        email: String,

        /// Owner display name
        #[arg(short, long)]
        name: String,

        /// Business display name
        #[arg(short, long)]
        business: String,

        /// Default price per can
        #[arg(long, default_value = "25")]
        price: Decimal,

        /// Business contact phone
        #[arg(long)]
        phone: String,

        /// Password; prompted for interactively when omitted
        #[arg(long)]
        password: Option<String>,
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
        Commands::Owner { action } => match action {
            OwnerAction::Create {
                email,
                name,
                business,
                price,
                phone,
                password,
            } => {
                commands::owner::create(&email, &name, &business, price, &phone, password).await?;
            }
        },
        Commands::Reconcile => commands::reconcile::run().await?,
    }
    Ok(())
}
