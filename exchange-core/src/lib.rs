//! Exchange Core
//!
//! In-memory wallet ledger and rate-alert evaluation for the currency
//! exchange backend.
//!
//! # Architecture
//!
//! - **Ledger Store**: users, wallets, transactions and alerts behind one lock
//! - **Trade Executor**: BUY/SELL settlement through the base-currency wallet
//! - **Alert Engine**: threshold rules evaluated against a mid-rate snapshot
//!
//! # Invariants
//!
//! - A trade never leaves a wallet balance negative
//! - Transactions are append-only and ids strictly increase
//! - Alert evaluation is stateless: checking never mutates an alert

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod alerts;
pub mod config;
pub mod error;
pub mod store;
pub mod trade;
pub mod types;
pub mod validation;

// Re-exports
pub use alerts::AlertEngine;
pub use config::LedgerConfig;
pub use error::{Error, Result};
pub use store::LedgerStore;
pub use trade::{TradeExecutor, TradeOrder, TradeReceipt};
pub use types::{
    AlertDirection, AlertId, RateAlert, Transaction, TransactionId, TradeSide, TriggeredAlert,
    User, UserId, UserProfile, Wallet, WalletId,
};
