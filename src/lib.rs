//! Bank Transfer Service
//!
//! HTTP service for per-user bank accounts and atomic funds transfer,
//! persisted in PostgreSQL.
//!
//! # Modules
//!
//! - [`bank`] - Accounts, transfer records, services and the persistence layer
//! - [`money`] - Currency and amount validation
//! - [`db`] - PostgreSQL pool and schema migration
//! - [`gateway`] - axum router, handlers, OpenAPI
//! - [`config`] - Environment configuration
//! - [`logging`] - tracing subscriber setup

pub mod bank;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod money;

// Convenient re-exports at crate root
pub use bank::{
    Account, AccountService, BankError, BankStore, MemoryStore, PgStore, TransferRecord,
    TransferService,
};
pub use config::{AppConfig, ConfigError};
pub use db::Database;
pub use gateway::app;
