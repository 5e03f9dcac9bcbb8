//! In-memory ledger store
//!
//! Owns every collection of the exchange (users, wallets, transactions and
//! alerts) together with their id counters. All state sits behind a single
//! mutex so each operation is one atomic read-modify-write; the trade and
//! alert modules borrow the same lock through [`LedgerStore::lock`].

use crate::{
    types::{RateAlert, Transaction, User, UserId, Wallet},
    validation, Error, LedgerConfig, Result,
};
use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};
use tracing::{info, warn};

/// Mutable ledger contents, guarded by [`LedgerStore`]
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    pub(crate) users: Vec<User>,
    pub(crate) wallets: Vec<Wallet>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) alerts: Vec<RateAlert>,
    last_user_id: u64,
    last_wallet_id: u64,
    last_transaction_id: u64,
    last_alert_id: u64,
}

impl LedgerState {
    pub(crate) fn next_user_id(&mut self) -> u64 {
        self.last_user_id += 1;
        self.last_user_id
    }

    pub(crate) fn next_wallet_id(&mut self) -> u64 {
        self.last_wallet_id += 1;
        self.last_wallet_id
    }

    pub(crate) fn next_transaction_id(&mut self) -> u64 {
        self.last_transaction_id += 1;
        self.last_transaction_id
    }

    pub(crate) fn next_alert_id(&mut self) -> u64 {
        self.last_alert_id += 1;
        self.last_alert_id
    }

    pub(crate) fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    pub(crate) fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub(crate) fn wallet_mut(&mut self, user_id: UserId, currency: &str) -> Option<&mut Wallet> {
        self.wallets
            .iter_mut()
            .find(|w| w.user_id == user_id && w.currency == currency)
    }
}

/// Process-wide ledger, created by the entry point and shared with handlers
#[derive(Debug)]
pub struct LedgerStore {
    config: LedgerConfig,
    state: Mutex<LedgerState>,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl LedgerStore {
    /// Create an empty store
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Settlement currency for every trade
    pub fn base_currency(&self) -> &str {
        &self.config.base_currency
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock()
    }

    /// Register a user and open their base-currency wallet
    pub fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User> {
        const MISSING: &str = "All fields are required.";
        let name = validation::required(Some(name), MISSING)?;
        let email = validation::required(Some(email), MISSING)?;
        validation::required(Some(password), MISSING)?;

        let mut state = self.lock();

        if state.user_by_email(email).is_some() {
            warn!("Registration rejected, email already in use: {}", email);
            return Err(Error::DuplicateEmail);
        }

        let user = User {
            user_id: state.next_user_id(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: Utc::now(),
        };

        let wallet = Wallet {
            wallet_id: state.next_wallet_id(),
            user_id: user.user_id,
            currency: self.config.base_currency.clone(),
            balance: self.config.starting_balance,
        };

        info!(
            "Registered user {} with {} wallet {} ({})",
            user.user_id, wallet.currency, wallet.wallet_id, wallet.balance
        );

        state.users.push(user.clone());
        state.wallets.push(wallet);

        Ok(user)
    }

    /// Check a login attempt
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        const MISSING: &str = "Email and password are required.";
        let email = validation::required(Some(email), MISSING)?;
        validation::required(Some(password), MISSING)?;

        let state = self.lock();
        match state.user_by_email(email) {
            Some(user) if user.password == password => Ok(user.clone()),
            _ => {
                warn!("Failed login for {}", email);
                Err(Error::InvalidCredentials)
            }
        }
    }

    /// Look up a user by email
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.lock().user_by_email(email).cloned()
    }

    /// Look up a user by id
    pub fn find_user_by_id(&self, user_id: UserId) -> Option<User> {
        self.lock().user(user_id).cloned()
    }

    /// Look up a user by id, failing with `UserNotFound`
    pub fn require_user(&self, user_id: UserId) -> Result<User> {
        self.find_user_by_id(user_id).ok_or(Error::UserNotFound)
    }

    /// All wallets of a user
    pub fn wallets_for_user(&self, user_id: UserId) -> Vec<Wallet> {
        self.lock()
            .wallets
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect()
    }

    /// The user's wallet in `currency`, if any
    pub fn find_wallet(&self, user_id: UserId, currency: &str) -> Option<Wallet> {
        self.lock()
            .wallets
            .iter()
            .find(|w| w.user_id == user_id && w.currency == currency)
            .cloned()
    }

    /// Trade history of a user in insertion order
    pub fn transactions_for_user(&self, user_id: UserId) -> Vec<Transaction> {
        self.lock()
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }
}
