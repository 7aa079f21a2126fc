//! tripsheet library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod http;
pub mod models;
pub mod session;
pub mod store;
pub mod utils;

use crate::auth::sqlite::SqliteAuthProvider;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::http::AppState;
use crate::session::MemorySessionStore;
use crate::store::sqlite::SqliteStore;
use clap::Parser;
use std::sync::Arc;

/// Entry point used by main.rs.
pub async fn run() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripsheet=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(listen) = &cli.listen {
        cfg.listen = listen.clone();
    }

    match cli.command {
        Commands::Init => init(&cli),
        Commands::Serve => serve(&cfg).await,
    }
}

fn init(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone())?;

    // opening either side bootstraps its schema
    let db = db_path.to_string_lossy();
    SqliteStore::open(&db)?;
    SqliteAuthProvider::open(&db)?;

    println!("Config file : {}", Config::config_file().display());
    println!("Database    : {}", db_path.display());
    Ok(())
}

async fn serve(cfg: &Config) -> AppResult<()> {
    let store = Arc::new(SqliteStore::open(&cfg.database)?);
    let auth = Arc::new(SqliteAuthProvider::open(&cfg.database)?);
    let sessions = Arc::new(MemorySessionStore::new());

    let state = AppState::new(auth, store, sessions);
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.listen)
        .await
        .map_err(|e| AppError::Config(format!("cannot bind {}: {e}", cfg.listen)))?;
    tracing::info!("listening on {}", cfg.listen);

    axum::serve(listener, app)
        .await
        .map_err(AppError::Io)?;
    Ok(())
}
