//! Bank accounts and funds transfer
//!
//! # Architecture
//!
//! ```text
//! HTTP handlers ──▶ AccountService ──┐
//!               └─▶ TransferService ─┴─▶ Arc<dyn BankStore> ──▶ PgStore | MemoryStore
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Non-negative balances**: a transfer never debits more than the source holds
//! 2. **All-or-nothing**: both balance writes and the transfer record commit together
//! 3. **Sender ownership**: the source account must belong to the requesting user

pub mod account_service;
pub mod error;
pub mod models;
pub mod store;
pub mod transfer_service;

// Re-exports for convenience
pub use account_service::AccountService;
pub use error::BankError;
pub use models::{Account, NewAccount, TransferCommand, TransferRecord};
pub use store::{BankStore, BankUnit, MemoryStore, PgStore, StoreError};
pub use transfer_service::TransferService;
