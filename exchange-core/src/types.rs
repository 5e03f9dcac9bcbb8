//! Core types for the exchange ledger
//!
//! Money is carried as `Decimal` and serialized as a JSON number so the
//! mobile client can read balances directly. Field names are camelCase.

use crate::Error;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User identifier
pub type UserId = u64;

/// Wallet identifier
pub type WalletId = u64;

/// Transaction identifier
pub type TransactionId = u64;

/// Rate alert identifier
pub type AlertId = u64;

/// Registered user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID
    pub user_id: UserId,

    /// Display name
    pub name: String,

    /// Unique login email
    pub email: String,

    /// Plain-text password (demo only, never serialized)
    #[serde(skip_serializing)]
    pub password: String,

    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

/// Public view of a user returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID
    pub user_id: UserId,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Currency wallet owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Wallet ID
    pub wallet_id: WalletId,

    /// Owning user
    pub user_id: UserId,

    /// ISO 4217 code
    pub currency: String,

    /// Current balance, never negative after a trade
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    /// Spend base currency
    Buy,
    /// Convert into base currency
    Sell,
}

impl TradeSide {
    /// Wire code
    pub fn code(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TradeSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            _ => Err(Error::Validation("Type must be BUY or SELL.".to_string())),
        }
    }
}

/// Immutable record of a completed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction ID
    pub transaction_id: TransactionId,

    /// Owning user
    pub user_id: UserId,

    /// Settlement wallet
    pub wallet_id: WalletId,

    /// BUY or SELL
    #[serde(rename = "type")]
    pub side: TradeSide,

    /// Traded pair, e.g. `USD/PLN`
    pub currency_pair: String,

    /// Quantity of the traded currency
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Price in base currency
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,

    /// Execution timestamp
    pub created_at: DateTime<Utc>,
}

/// Threshold crossing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertDirection {
    /// Fire when the rate is at or above the threshold
    Up,
    /// Fire when the rate is at or below the threshold
    Down,
}

impl AlertDirection {
    /// Whether `current` satisfies this direction against `threshold`
    pub fn is_crossed(&self, current: Decimal, threshold: Decimal) -> bool {
        match self {
            AlertDirection::Up => current >= threshold,
            AlertDirection::Down => current <= threshold,
        }
    }
}

impl fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertDirection::Up => f.write_str("UP"),
            AlertDirection::Down => f.write_str("DOWN"),
        }
    }
}

impl FromStr for AlertDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "UP" => Ok(AlertDirection::Up),
            "DOWN" => Ok(AlertDirection::Down),
            _ => Err(Error::InvalidDirection),
        }
    }
}

/// User-defined rate threshold rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateAlert {
    /// Alert ID
    pub alert_id: AlertId,

    /// Owning user
    pub user_id: UserId,

    /// Watched pair, e.g. `EUR/PLN`
    pub currency_pair: String,

    /// UP or DOWN
    pub direction: AlertDirection,

    /// Threshold in base currency
    #[serde(with = "rust_decimal::serde::float")]
    pub threshold_value: Decimal,

    /// Inactive alerts are never evaluated
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl RateAlert {
    /// Currency code the pair is quoted for (`USD/PLN` -> `USD`)
    pub fn base_code(&self) -> &str {
        base_code(&self.currency_pair)
    }
}

/// Strip the quote-currency suffix from a pair
pub fn base_code(pair: &str) -> &str {
    match pair.split_once('/') {
        Some((code, _)) => code.trim(),
        None => pair.trim(),
    }
}

/// Alert whose condition holds for the observed rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredAlert {
    /// The matching alert
    #[serde(flatten)]
    pub alert: RateAlert,

    /// Mid rate the condition was evaluated against
    #[serde(with = "rust_decimal::serde::float")]
    pub current_rate: Decimal,
}
