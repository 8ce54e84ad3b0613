//! nearshop CLI - database migrations and vendor management.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! nearshop migrate
//!
//! # Create a vendor
//! NEARSHOP_VENDOR_PASSWORD=... nearshop vendor create -n "Corner Bakery" -e owner@bakery.example
//!
//! # List vendors
//! nearshop vendor list
//!
//! # Print a bearer token for an existing vendor
//! nearshop token issue -e owner@bakery.example
//! ```
//!
//! # Commands
//!
//! - `migrate` - Apply database migrations
//! - `vendor create` / `vendor list` - Manage vendors
//! - `token issue` - Issue a bearer token

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::Utc;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nearshop")]
#[command(author, version, about = "nearshop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Manage vendors
    Vendor {
        #[command(subcommand)]
        action: VendorAction,
    },
    /// Issue bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum VendorAction {
    /// Create a new vendor
    Create {
        /// Vendor display name
        #[arg(short, long)]
        name: String,

        /// Vendor login email
        #[arg(short, long)]
        email: String,

        /// Vendor password
        #[arg(long, env = "NEARSHOP_VENDOR_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// List vendors by ID
    List {
        /// Number of vendors to skip
        #[arg(long, default_value_t = 0)]
        skip: i64,

        /// Maximum number of vendors to print
        #[arg(long, default_value_t = 100)]
        limit: i64,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Print a bearer token for an existing vendor
    Issue {
        /// Vendor login email
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Vendor { action } => {
            let state = commands::connect().await?;
            match action {
                VendorAction::Create {
                    name,
                    email,
                    password,
                } => {
                    commands::vendor::create(&state, &name, &email, password.as_deref()).await?;
                }
                VendorAction::List { skip, limit } => {
                    commands::vendor::list(&state, skip, limit).await?;
                }
            }
        }
        Commands::Token { action } => {
            let state = commands::connect().await?;
            match action {
                TokenAction::Issue { email } => {
                    commands::token::issue(&state, &email, Utc::now()).await?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_vendor_create() {
        let cli = Cli::try_parse_from([
            "nearshop", "vendor", "create", "-n", "V", "-e", "v@e.com", "--password", "pw",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Vendor {
                action: VendorAction::Create { .. }
            })
        ));
    }

    #[test]
    fn test_parse_token_issue_requires_email() {
        assert!(Cli::try_parse_from(["nearshop", "token", "issue"]).is_err());
    }
}
