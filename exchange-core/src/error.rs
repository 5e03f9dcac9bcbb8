//! Error types for the exchange ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Missing or malformed request field
    #[error("{0}")]
    Validation(String),

    /// Amount or rate is not a finite positive number
    #[error("Invalid amount or rate.")]
    InvalidInput,

    /// Email already registered
    #[error("An account with this email already exists.")]
    DuplicateEmail,

    /// Unknown email or wrong password
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// User not found
    #[error("User not found.")]
    UserNotFound,

    /// Settlement wallet not found
    #[error("Wallet not found.")]
    WalletNotFound,

    /// BUY cost exceeds the wallet balance
    #[error("Insufficient balance.")]
    InsufficientBalance,

    /// Alert direction is neither UP nor DOWN
    #[error("Direction must be UP or DOWN.")]
    InvalidDirection,

    /// Alert threshold is not a positive number
    #[error("Threshold must be a positive number.")]
    InvalidThreshold,

    /// No active alert with that id for the user
    #[error("Alert not found.")]
    AlertNotFound,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for the not-found family (user, wallet, alert)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::UserNotFound | Error::WalletNotFound | Error::AlertNotFound
        )
    }
}
