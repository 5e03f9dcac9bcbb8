//! Upstream exchange-rate source
//!
//! Talks to the NBP public API (table A). Every call is a fresh round trip
//! bounded by its own timeout; there is no retry and no caching. Transport
//! failures are classified so the HTTP layer can pick a user-facing message.

use crate::config::RatesConfig;
use async_trait::async_trait;
use exchange_core::validation;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const MAX_HISTORY_DAYS: u32 = 93;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateSourceError {
    #[error("Exchange rate service timed out.")]
    Timeout,

    #[error("Exchange rate service returned an error: {0}")]
    UpstreamError(u16),

    #[error("Could not reach the exchange rate service. Please check your network connection.")]
    Unreachable,

    #[error("An error occurred while accessing the exchange rate service.")]
    Unknown(String),

    #[error("No rate history available for {0}.")]
    NoHistory(String),

    #[error("Invalid currency code: {0}")]
    InvalidCode(String),
}

impl From<reqwest::Error> for RateSourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RateSourceError::Timeout
        } else if let Some(status) = err.status() {
            RateSourceError::UpstreamError(status.as_u16())
        } else if err.is_connect() || err.is_request() {
            RateSourceError::Unreachable
        } else {
            RateSourceError::Unknown(err.to_string())
        }
    }
}

/// Clamp a requested history window into `1..=93`, defaulting to 30 days
pub fn clamp_history_days(days: Option<i64>) -> u32 {
    match days {
        Some(days) => days.clamp(1, MAX_HISTORY_DAYS as i64) as u32,
        None => DEFAULT_HISTORY_DAYS,
    }
}

/// Raw upstream table, kept verbatim for passthrough
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    raw: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    code: String,
    mid: Decimal,
}

#[derive(Debug, Deserialize)]
struct RateTable {
    rates: Vec<TableEntry>,
}

impl RateSnapshot {
    pub fn new(raw: serde_json::Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    pub fn into_raw(self) -> serde_json::Value {
        self.raw
    }

    /// Mid rate per upper-cased currency code.
    ///
    /// NBP answers with an array of tables; a bare table object is accepted
    /// as well.
    pub fn mid_rates(&self) -> Result<HashMap<String, Decimal>, RateSourceError> {
        let tables: Vec<RateTable> = if self.raw.is_array() {
            serde_json::from_value(self.raw.clone())
        } else {
            serde_json::from_value(self.raw.clone()).map(|table| vec![table])
        }
        .map_err(|e| RateSourceError::Unknown(format!("Unexpected rate table format: {}", e)))?;

        Ok(tables
            .into_iter()
            .flat_map(|table| table.rates)
            .map(|entry| (entry.code.to_ascii_uppercase(), entry.mid))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRate {
    pub date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub mid: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryEntry {
    effective_date: String,
    mid: Decimal,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    rates: Vec<HistoryEntry>,
}

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_current_rates(&self) -> Result<RateSnapshot, RateSourceError>;

    /// Oldest first; `days` is already clamped by the caller
    async fn fetch_history(
        &self,
        code: &str,
        days: u32,
    ) -> Result<Vec<HistoricalRate>, RateSourceError>;
}

pub struct NbpRateClient {
    client: Client,
    current_url: String,
    history_base_url: String,
    current_timeout: Duration,
    history_timeout: Duration,
}

impl NbpRateClient {
    pub fn new(config: &RatesConfig) -> reqwest::Result<Self> {
        let client = Client::builder().build()?;

        Ok(NbpRateClient {
            client,
            current_url: config.current_url.clone(),
            history_base_url: config.history_base_url.trim_end_matches('/').to_string(),
            current_timeout: config.current_timeout(),
            history_timeout: config.history_timeout(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<T, (Option<StatusCode>, RateSourceError)> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                error!("Rate request to {} failed: {}", url, e);
                (None, RateSourceError::from(e))
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Rate source {} answered {}", url, status);
            return Err((
                Some(status),
                RateSourceError::UpstreamError(status.as_u16()),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            error!("Failed to decode rate source response from {}: {}", url, e);
            let err = if e.is_timeout() {
                RateSourceError::Timeout
            } else {
                RateSourceError::Unknown(e.to_string())
            };
            (Some(status), err)
        })
    }
}

#[async_trait]
impl RateSource for NbpRateClient {
    async fn fetch_current_rates(&self) -> Result<RateSnapshot, RateSourceError> {
        let raw: serde_json::Value = self
            .get_json(&self.current_url, self.current_timeout)
            .await
            .map_err(|(_, e)| e)?;

        info!("Fetched current rate table");
        Ok(RateSnapshot::new(raw))
    }

    async fn fetch_history(
        &self,
        code: &str,
        days: u32,
    ) -> Result<Vec<HistoricalRate>, RateSourceError> {
        let code = validation::currency_code(code)
            .map_err(|_| RateSourceError::InvalidCode(code.to_string()))?;
        let url = format!(
            "{}/{}/last/{}?format=json",
            self.history_base_url, code, days
        );

        let history: HistoryResponse = self
            .get_json(&url, self.history_timeout)
            .await
            .map_err(|(status, e)| match status {
                Some(StatusCode::NOT_FOUND) => RateSourceError::NoHistory(code.clone()),
                _ => e,
            })?;

        info!("Fetched {} history points for {}", history.rates.len(), code);

        Ok(history
            .rates
            .into_iter()
            .map(|entry| HistoricalRate {
                date: entry.effective_date,
                mid: entry.mid,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_clamp_history_days() {
        assert_eq!(clamp_history_days(Some(200)), 93);
        assert_eq!(clamp_history_days(Some(0)), 1);
        assert_eq!(clamp_history_days(Some(-5)), 1);
        assert_eq!(clamp_history_days(Some(7)), 7);
        assert_eq!(clamp_history_days(None), 30);
    }

    #[test]
    fn test_mid_rates_from_table_array() {
        let snapshot = RateSnapshot::new(json!([{
            "table": "A",
            "no": "001/A/NBP/2025",
            "effectiveDate": "2025-01-02",
            "rates": [
                {"currency": "dolar amerykański", "code": "USD", "mid": 4.1012},
                {"currency": "euro", "code": "EUR", "mid": 4.2718}
            ]
        }]));

        let mids = snapshot.mid_rates().unwrap();
        assert_eq!(mids.len(), 2);
        assert_eq!(mids["USD"], dec!(4.1012));
        assert_eq!(mids["EUR"], dec!(4.2718));
    }

    #[test]
    fn test_mid_rates_rejects_unexpected_shape() {
        let snapshot = RateSnapshot::new(json!({"status": "maintenance"}));
        assert!(matches!(
            snapshot.mid_rates(),
            Err(RateSourceError::Unknown(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RateSourceError::UpstreamError(500).to_string(),
            "Exchange rate service returned an error: 500"
        );
        assert_eq!(
            RateSourceError::Timeout.to_string(),
            "Exchange rate service timed out."
        );
    }
}
