//! estore CLI - database migrations, account sessions and wishlists.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! estore migrate
//!
//! # Create an account (logs in)
//! estore register -n "Sana Malik" -e sana@example.com --role USER
//!
//! # Log in / out, show the current user
//! estore login -e sana@example.com
//! estore whoami
//! estore logout
//!
//! # Manage the logged-in user's wishlist
//! estore wishlist add p-123
//! estore wishlist list
//! estore wishlist remove p-123
//! ```
//!
//! Passwords are read from `--password` or `ESTORE_PASSWORD`. The session is
//! saved to `ESTORE_SESSION_FILE` (default `.estore/session.json`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use estore_core::Role;

mod commands;

#[derive(Parser)]
#[command(name = "estore")]
#[command(author, version, about = "estore CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Create an account and log in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long, env = "ESTORE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Account role (`USER`, `seller`)
        #[arg(short, long, default_value = "USER")]
        role: Role,
    },
    /// Log in and save the session
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, env = "ESTORE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and remove the saved session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage the logged-in user's wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Add a product
    Add {
        /// Product ID
        product_id: String,
    },
    /// List products in insertion order
    List,
    /// Remove a product
    Remove {
        /// Product ID
        product_id: String,
    },
}

impl From<WishlistAction> for commands::wishlist::Action {
    fn from(action: WishlistAction) -> Self {
        match action {
            WishlistAction::Add { product_id } => Self::Add(product_id),
            WishlistAction::List => Self::List,
            WishlistAction::Remove { product_id } => Self::Remove(product_id),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            commands::account::register(commands::transport()?, &name, &email, &password, role)
                .await?;
        }
        Commands::Login { email, password } => {
            commands::account::login(commands::transport()?, &email, &password).await?;
        }
        Commands::Logout => commands::account::logout(commands::transport()?).await?,
        Commands::Whoami => commands::account::whoami(commands::transport()?).await?,
        Commands::Wishlist { action } => {
            commands::wishlist::run(commands::transport()?, action.into()).await?;
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
    fn test_parse_wishlist_add() {
        let cli = Cli::try_parse_from(["estore", "wishlist", "add", "p-1"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Wishlist {
                action: WishlistAction::Add { ref product_id }
            }) if product_id == "p-1"
        ));
    }

    #[test]
    fn test_parse_register_role() {
        let cli = Cli::try_parse_from([
            "estore", "register", "-n", "Sana", "-e", "s@example.com", "-p", "secret", "-r",
            "seller",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Register {
                role: Role::Seller,
                ..
            })
        ));
    }
}
