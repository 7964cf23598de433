mod auth;
mod log;
mod show;

use crate::error::Result;
use clap::{Parser, Subcommand};

pub use log::LogArgs;
pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "sheetlog")]
#[command(about = "Append structured rows to per-topic Google Sheets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Log(args) => log::execute(args).await,
            Commands::Auth { reset } => auth::execute(*reset).await,
            Commands::Show { resource } => resource.execute().await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a row into the spreadsheet backing a title
    Log(LogArgs),
    /// Verify Google authentication
    Auth {
        /// Delete cached tokens before authenticating
        #[arg(long)]
        reset: bool,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
}
