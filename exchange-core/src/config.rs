//! Configuration for the ledger

use crate::{validation, Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Currency of the settlement wallet opened at registration
    pub base_currency: String,

    /// Balance credited to the settlement wallet at registration
    pub starting_balance: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_currency: "PLN".to_string(),
            starting_balance: Decimal::from(10_000),
        }
    }
}

impl LedgerConfig {
    /// Reject configurations the store cannot honour
    pub fn validate(&self) -> Result<()> {
        validation::currency_code(&self.base_currency)
            .map_err(|_| Error::Config(format!("Invalid base currency: {}", self.base_currency)))?;

        if self.starting_balance.is_sign_negative() {
            return Err(Error::Config(
                "Starting balance cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}
