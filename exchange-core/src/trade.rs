//! Trade execution against the base-currency wallet
//!
//! Every trade settles through the user's base-currency wallet regardless of
//! the traded pair. BUY spends `amount * rate` and is refused when the wallet
//! cannot cover it; SELL credits the same cost without checking any
//! foreign-currency holding, since no such wallet exists in this model.

use crate::{
    types::{TradeSide, Transaction, UserId, Wallet},
    validation, Error, LedgerStore, Result,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

const MISSING_FIELDS: &str = "Missing transaction information.";

/// Validated buy/sell request
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOrder {
    /// BUY or SELL
    pub side: TradeSide,
    /// Traded pair, e.g. `USD/PLN`
    pub currency_pair: String,
    /// Strictly positive quantity
    pub amount: Decimal,
    /// Strictly positive price
    pub rate: Decimal,
}

impl TradeOrder {
    /// Build an order from already-typed values
    pub fn new(
        side: TradeSide,
        currency_pair: &str,
        amount: Decimal,
        rate: Decimal,
    ) -> Result<Self> {
        let currency_pair = validation::required(Some(currency_pair), MISSING_FIELDS)?;
        if amount <= Decimal::ZERO || rate <= Decimal::ZERO {
            return Err(Error::InvalidInput);
        }

        Ok(Self {
            side,
            currency_pair: currency_pair.to_string(),
            amount,
            rate,
        })
    }

    /// Build an order from raw request fields
    pub fn parse(
        side: Option<&str>,
        currency_pair: Option<&str>,
        amount: Option<&str>,
        rate: Option<&str>,
    ) -> Result<Self> {
        let side: TradeSide = side
            .ok_or_else(|| Error::Validation("Type must be BUY or SELL.".to_string()))?
            .parse()?;

        let currency_pair = validation::required(currency_pair, MISSING_FIELDS)?;
        let amount = validation::required(amount, MISSING_FIELDS)?;
        let rate = validation::required(rate, MISSING_FIELDS)?;

        let amount = validation::parse_positive(amount).ok_or(Error::InvalidInput)?;
        let rate = validation::parse_positive(rate).ok_or(Error::InvalidInput)?;

        Self::new(side, currency_pair, amount, rate)
    }

    /// Base-currency value of the order
    pub fn cost(&self) -> Result<Decimal> {
        self.amount.checked_mul(self.rate).ok_or(Error::InvalidInput)
    }
}

/// Outcome of a successful trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReceipt {
    /// Appended transaction record
    pub transaction: Transaction,
    /// Settlement wallet after the trade
    pub wallet: Wallet,
}

/// Settles orders against the ledger
#[derive(Debug, Clone)]
pub struct TradeExecutor {
    store: Arc<LedgerStore>,
}

impl TradeExecutor {
    /// Create an executor over a shared store
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Execute an order for a user.
    ///
    /// The wallet check, balance update and transaction append happen under
    /// one store lock, so a failed BUY leaves the balance untouched.
    pub fn execute(&self, user_id: UserId, order: TradeOrder) -> Result<TradeReceipt> {
        let cost = order.cost()?;
        let base_currency = self.store.base_currency().to_string();

        let mut state = self.store.lock();

        if state.user(user_id).is_none() {
            return Err(Error::UserNotFound);
        }

        let wallet = state
            .wallet_mut(user_id, &base_currency)
            .ok_or(Error::WalletNotFound)?;

        let new_balance = match order.side {
            TradeSide::Buy => {
                if wallet.balance < cost {
                    warn!(
                        "BUY {} {} by user {} refused: cost {} exceeds balance {}",
                        order.amount, order.currency_pair, user_id, cost, wallet.balance
                    );
                    return Err(Error::InsufficientBalance);
                }
                wallet.balance - cost
            }
            TradeSide::Sell => wallet.balance.checked_add(cost).ok_or(Error::InvalidInput)?,
        };

        wallet.balance = new_balance;
        let wallet = wallet.clone();

        let transaction = Transaction {
            transaction_id: state.next_transaction_id(),
            user_id,
            wallet_id: wallet.wallet_id,
            side: order.side,
            currency_pair: order.currency_pair,
            amount: order.amount,
            rate: order.rate,
            created_at: Utc::now(),
        };
        state.transactions.push(transaction.clone());

        info!(
            "Trade {} {} {} {} @ {} for user {}, balance now {} {}",
            transaction.transaction_id,
            transaction.side,
            transaction.amount,
            transaction.currency_pair,
            transaction.rate,
            user_id,
            wallet.balance,
            wallet.currency
        );

        Ok(TradeReceipt {
            transaction,
            wallet,
        })
    }
}
