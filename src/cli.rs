use clap::{Parser, Subcommand};

/// Command-line interface definition for the tripsheet service.
#[derive(Parser)]
#[command(
    name = "tripsheet",
    version = env!("CARGO_PKG_VERSION"),
    about = "Trip validation and timesheet reconciliation service for mine dispatch",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override listen address, e.g. 0.0.0.0:5000
    #[arg(global = true, long = "listen")]
    pub listen: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and database schema
    Init,

    /// Run the HTTP service
    Serve,
}
