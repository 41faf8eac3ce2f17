// CLI module for administrative operations requiring server access

pub mod bootstrap;
pub mod migrate;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// PIX storefront backend
#[derive(Parser)]
#[command(name = "pixstore")]
#[command(about = "PIX storefront backend and admin CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Seed the owner/admin accounts and default PIX key
    ///
    /// Accounts without a configured password get a generated one,
    /// printed once.
    Bootstrap,
}

/// Execute a one-shot CLI command
///
/// `Serve` and `Migrate` are handled by main.rs before AppData exists.
pub async fn execute_command(command: Commands, app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Bootstrap => bootstrap::bootstrap_system(app_data).await?,
        Commands::Serve | Commands::Migrate => {
            tracing::warn!("{:?} is not a one-shot command", command);
        }
    }

    Ok(())
}
