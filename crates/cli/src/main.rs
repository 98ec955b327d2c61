//! Oakline CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! oakline-cli migrate
//!
//! # Create an admin user
//! oakline-cli admin create -e admin@example.com -n "Admin Name" -p <password>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create admin users

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "oakline-cli")]
#[command(author, version, about = "Oakline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin password (prefer passing via OAKLINE_ADMIN_PASSWORD)
        #[arg(short, long, env = "OAKLINE_ADMIN_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oakline_cli=info,sqlx=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Admin {
            action: AdminAction::Create {
                email,
                name,
                password,
            },
        } => commands::admin::create(&email, &name, &password).await,
    };

    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
