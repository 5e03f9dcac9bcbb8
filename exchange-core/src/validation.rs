//! Input validation shared by the trade and alert paths

use crate::{Error, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a strictly positive decimal from its textual form.
///
/// Accepts plain (`"4.25"`) and scientific (`"1e3"`) notation. Anything
/// non-numeric, zero or negative yields `None`.
pub fn parse_positive(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?;

    (value > Decimal::ZERO).then_some(value)
}

/// Normalise a three-letter ISO currency code
pub fn currency_code(raw: &str) -> Result<String> {
    let code = raw.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(Error::Validation(format!("Invalid currency code: {}", raw)))
    }
}

/// Trim a required text field, failing with `message` when it is empty
pub fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Validation(message.to_string())),
    }
}
