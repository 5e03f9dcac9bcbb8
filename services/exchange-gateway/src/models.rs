use crate::rate_source::HistoricalRate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registration form
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login form
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Buy/sell request; numbers may arrive as JSON numbers or numeric strings
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    #[serde(rename = "type")]
    pub side: Option<String>,
    pub currency_pair: Option<String>,
    pub amount: Option<Value>,
    pub rate: Option<Value>,
}

/// Alert creation request
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub currency_pair: Option<String>,
    pub direction: Option<String>,
    pub threshold_value: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<String>,
}

impl HistoryQuery {
    /// Requested window; non-numeric input counts as not given.
    ///
    /// Fractions are truncated and out-of-range numbers saturate, so the
    /// caller's clamp still applies to them.
    pub fn requested_days(&self) -> Option<i64> {
        let days: f64 = self.days.as_deref()?.trim().parse().ok()?;
        days.is_finite().then(|| days.trunc() as i64)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub code: String,
    pub rates: Vec<HistoricalRate>,
}

/// Textual form of a loosely typed numeric field.
///
/// `null` counts as missing; strings pass through; any other JSON value is
/// rendered so that numeric validation rejects it.
pub fn numeric_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
