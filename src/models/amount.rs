//! Amount parsing.
//!
//! Two policies live here. User input is parsed strictly and rejected with a
//! [`ValidationError`]. Stored values are coerced fail-soft: anything that is
//! not a number reads as zero so malformed legacy entries still load and
//! aggregate.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub(crate) enum ValidationError {
    #[error("a value is required")]
    MissingAmount,

    #[error("\"{0}\" is not a number")]
    InvalidAmount(String),

    #[error("must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("a value is required")]
    MissingCategory,

    #[error("a value is required")]
    MissingBudget,
}

impl ValidationError {
    /// Name of the offending input field.
    pub(crate) fn field(&self) -> &'static str {
        match self {
            Self::MissingAmount | Self::InvalidAmount(_) | Self::NonPositiveAmount(_) => "amount",
            Self::MissingCategory => "category",
            Self::MissingBudget => "budget",
        }
    }
}

fn parse_number(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Strict parse of a user-entered amount: present, numeric, positive.
pub(crate) fn parse_input(raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingAmount);
    }
    let value =
        parse_number(trimmed).ok_or_else(|| ValidationError::InvalidAmount(trimmed.to_string()))?;
    if value <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(value));
    }
    Ok(value)
}

/// Fail-soft reading of a stored amount. Non-numeric, null or missing is zero.
pub(crate) fn coerce(value: &serde_json::Value) -> Decimal {
    match value {
        serde_json::Value::Number(n) => parse_number(&n.to_string()).unwrap_or_default(),
        serde_json::Value::String(s) => parse_number(s).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce(&value))
}

/// Amounts are written as JSON numbers carrying the exact decimal text.
pub(crate) fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = amount.normalize().to_string();
    match serde_json::Number::from_str(&text) {
        Ok(number) => number.serialize(serializer),
        Err(_) => serializer.serialize_str(&text),
    }
}
