use rust_decimal::Decimal;

use super::amount;

/// The monthly budget, kept as the text the user entered.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Budget {
    pub value: String,
}

impl Budget {
    pub(crate) fn new(value: String) -> Self {
        Self { value }
    }

    /// Numeric reading of the stored text; unparseable text is zero.
    pub(crate) fn amount(&self) -> Decimal {
        amount::coerce(&serde_json::Value::String(self.value.clone()))
    }
}

impl std::fmt::Display for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
