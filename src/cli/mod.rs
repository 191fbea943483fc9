// CLI module for administrative operations requiring server access

pub mod bootstrap;
pub mod directory_config;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Roster CLI
#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Roster user directory backend", long_about = None)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create the first admin account
    CreateAdmin {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Store new directory credentials as the active config
    DirectoryConfig {
        #[arg(long)]
        tenant_id: String,

        #[arg(long)]
        client_id: String,

        #[arg(long)]
        client_secret: String,
    },
}

/// Execute an administrative command
///
/// `Serve` and `Migrate` are handled by main before AppData exists.
pub async fn execute_command(
    command: Commands,
    app_data: std::sync::Arc<AppData>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve | Commands::Migrate => {}
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => {
            bootstrap::create_admin(app_data, name, email, password).await?;
        }
        Commands::DirectoryConfig {
            tenant_id,
            client_id,
            client_secret,
        } => {
            directory_config::save_directory_config(app_data, tenant_id, client_id, client_secret)
                .await?;
        }
    }

    Ok(())
}
