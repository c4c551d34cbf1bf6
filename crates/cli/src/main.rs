//! FoodHub CLI - Catalog, account and order management tools.
//!
//! # Usage
//!
//! ```bash
//! # List categories
//! fh-cli categories list
//!
//! # Create a category
//! fh-cli categories create --name Burgers --emoji 🍔 --image https://cdn.example/burgers.png
//!
//! # Take a meal off the menu
//! fh-cli meals set-availability <id> --available false
//!
//! # Suspend a user
//! fh-cli users status <id> SUSPENDED
//!
//! # Advance an order as its provider
//! fh-cli orders status <id> PREPARING --as PROVIDER
//! ```
//!
//! Results are printed to stdout as JSON. Logs and errors go to stderr; a
//! failed command exits with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use foodhub_core::models::CategoryInput;
use foodhub_core::{CategoryId, MealId, OrderId, OrderStatus, Role, UserId, UserStatus};

mod commands;

use commands::{CliError, Context};

#[derive(Parser)]
#[command(name = "fh-cli")]
#[command(author, version, about = "FoodHub CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage meal categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage meals
    Meals {
        #[command(subcommand)]
        action: MealAction,
    },
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List {
        /// Filter by name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a category
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        emoji: String,
        /// Image URL
        #[arg(short, long)]
        image: String,
    },
    /// Update a category
    Update {
        id: CategoryId,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        emoji: Option<String>,
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Delete a category
    Delete { id: CategoryId },
}

#[derive(Subcommand)]
enum MealAction {
    /// List meals
    List {
        /// Filter by name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Mark a meal available or unavailable
    SetAvailability {
        id: MealId,
        #[arg(long, action = clap::ArgAction::Set)]
        available: bool,
    },
    /// Delete a meal
    Delete { id: MealId },
}

#[derive(Subcommand)]
enum UserAction {
    /// List users
    List,
    /// Set a user's status (`ACTIVE` or `SUSPENDED`)
    Status { id: UserId, status: UserStatus },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Move an order to a new status
    Status {
        id: OrderId,
        status: OrderStatus,
        /// Role to act as (`CUSTOMER`, `PROVIDER`, `ADMIN`)
        #[arg(long = "as", value_name = "ROLE")]
        role: Role,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays parseable JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fh_cli=info,foodhub_storefront=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::from_env()?;

    match cli.command {
        Commands::Categories { action } => match action {
            CategoryAction::List { search } => commands::categories::list(&ctx, search).await,
            CategoryAction::Create { name, emoji, image } => {
                commands::categories::create(&ctx, CategoryInput { name, emoji, image }).await
            }
            CategoryAction::Update {
                id,
                name,
                emoji,
                image,
            } => commands::categories::update(&ctx, &id, name, emoji, image).await,
            CategoryAction::Delete { id } => commands::categories::delete(&ctx, &id).await,
        },
        Commands::Meals { action } => match action {
            MealAction::List { search } => commands::meals::list(&ctx, search).await,
            MealAction::SetAvailability { id, available } => {
                commands::meals::set_availability(&ctx, &id, available).await
            }
            MealAction::Delete { id } => commands::meals::delete(&ctx, &id).await,
        },
        Commands::Users { action } => match action {
            UserAction::List => commands::users::list(&ctx).await,
            UserAction::Status { id, status } => {
                commands::users::set_status(&ctx, &id, status).await
            }
        },
        Commands::Orders { action } => match action {
            OrderAction::Status { id, status, role } => {
                commands::orders::set_status(&ctx, &id, status, role).await
            }
        },
    }
}
