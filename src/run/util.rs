use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::models::TransactionRecord;

/// Format an amount in baht with thousand separators and 2 decimal places.
/// e.g. `1234567.891` → `"฿1,234,567.89"`, `-40` → `"-฿40.00"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let rounded = val
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let formatted = format!("{rounded:.2}");
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if val < Decimal::ZERO && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}฿{grouped}.{dec_part}")
}

/// Amount prefixed with `+` for income and `-` for expense.
pub(crate) fn format_signed(record: &TransactionRecord) -> String {
    let sign = if record.is_income() { '+' } else { '-' };
    format!("{sign}{}", format_amount(record.amount))
}

/// First 8 hex digits of an id, enough to select a record on the command line.
pub(crate) fn short_id(id: &Uuid) -> String {
    id.simple().to_string().chars().take(8).collect()
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max - 1).collect();
    format!("{kept}…")
}
