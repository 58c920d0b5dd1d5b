//! Bank Transfer Service
//!
//! Startup sequence:
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │ Env cfg  │───▶│ Logging  │───▶│ Postgres │───▶│ Gateway  │
//! │(required)│    │          │    │ +migrate │    │  (axum)  │
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Any failure before the gateway binds aborts the process.

use std::sync::Arc;

use anyhow::Context;

use bank_transfer::bank::{BankStore, PgStore};
use bank_transfer::config::AppConfig;
use bank_transfer::db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ FATAL: {}", e);
            std::process::exit(1);
        }
    };
    let _log_guard = bank_transfer::logging::init_logging(&config.log);

    tracing::info!(
        db_host = %config.database.host,
        db_name = %config.database.name,
        version = env!("GIT_HASH"),
        "Starting bank transfer service"
    );

    let db = Database::connect_with(&config.database)
        .await
        .context("failed to connect to PostgreSQL")?;
    db.migrate().await.context("schema migration failed")?;

    let store: Arc<dyn BankStore> = Arc::new(PgStore::new(db));
    bank_transfer::gateway::run_server(&config.http, store)
        .await
        .context("HTTP server error")?;

    Ok(())
}
