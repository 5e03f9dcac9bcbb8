//! Rate alert rules and their evaluation
//!
//! Alerts are evaluated on demand against a mid-rate snapshot supplied by the
//! caller. Evaluation never mutates an alert, so a rule keeps firing on every
//! check for as long as its condition holds.

use crate::{
    types::{AlertDirection, AlertId, RateAlert, TriggeredAlert, UserId},
    validation, Error, LedgerStore, Result,
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Stores and evaluates rate alerts
#[derive(Debug, Clone)]
pub struct AlertEngine {
    store: Arc<LedgerStore>,
}

impl AlertEngine {
    /// Create an engine over a shared store
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Create an active alert from raw request fields
    pub fn create_from_input(
        &self,
        user_id: UserId,
        currency_pair: Option<&str>,
        direction: Option<&str>,
        threshold: Option<&str>,
    ) -> Result<RateAlert> {
        let direction: AlertDirection = direction.ok_or(Error::InvalidDirection)?.parse()?;
        let threshold = threshold
            .and_then(validation::parse_positive)
            .ok_or(Error::InvalidThreshold)?;

        self.create(user_id, currency_pair.unwrap_or_default(), direction, threshold)
    }

    /// Create an active alert
    pub fn create(
        &self,
        user_id: UserId,
        currency_pair: &str,
        direction: AlertDirection,
        threshold: Decimal,
    ) -> Result<RateAlert> {
        let currency_pair = validation::required(Some(currency_pair), "Currency pair is required.")?
            .to_ascii_uppercase();
        if threshold <= Decimal::ZERO {
            return Err(Error::InvalidThreshold);
        }

        let mut state = self.store.lock();
        if state.user(user_id).is_none() {
            return Err(Error::UserNotFound);
        }

        let alert = RateAlert {
            alert_id: state.next_alert_id(),
            user_id,
            currency_pair,
            direction,
            threshold_value: threshold,
            is_active: true,
            created_at: Utc::now(),
        };
        state.alerts.push(alert.clone());

        info!(
            "Alert {} created for user {}: {} {} {}",
            alert.alert_id, user_id, alert.currency_pair, alert.direction, alert.threshold_value
        );

        Ok(alert)
    }

    /// Remove one of the user's active alerts
    pub fn delete(&self, user_id: UserId, alert_id: AlertId) -> Result<()> {
        let mut state = self.store.lock();

        let position = state
            .alerts
            .iter()
            .position(|a| a.alert_id == alert_id && a.user_id == user_id && a.is_active)
            .ok_or(Error::AlertNotFound)?;
        state.alerts.remove(position);

        info!("Alert {} deleted for user {}", alert_id, user_id);
        Ok(())
    }

    /// The user's alerts in insertion order
    pub fn list(&self, user_id: UserId) -> Vec<RateAlert> {
        self.store
            .lock()
            .alerts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Active alerts of the user whose condition holds for `current_rates`.
    ///
    /// Rates are keyed by currency code; codes missing from the snapshot are
    /// skipped.
    pub fn check_triggered(
        &self,
        user_id: UserId,
        current_rates: &HashMap<String, Decimal>,
    ) -> Vec<TriggeredAlert> {
        let state = self.store.lock();

        state
            .alerts
            .iter()
            .filter(|a| a.user_id == user_id && a.is_active)
            .filter_map(|alert| {
                let code = alert.base_code().to_ascii_uppercase();
                let Some(&current_rate) = current_rates.get(&code) else {
                    debug!("No rate for {} (alert {}), skipping", code, alert.alert_id);
                    return None;
                };

                alert
                    .direction
                    .is_crossed(current_rate, alert.threshold_value)
                    .then(|| TriggeredAlert {
                        alert: alert.clone(),
                        current_rate,
                    })
            })
            .collect()
    }
}
