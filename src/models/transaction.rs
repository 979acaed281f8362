use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::amount;
use super::date;
use super::amount::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ledger entry as persisted under the `transactions` key.
///
/// Records are replaced wholesale on edit. `id` is a surrogate key assigned at
/// creation; entries written before ids existed get one from
/// [`TransactionRecord::from_stored`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TransactionRecord {
    pub id: Uuid,
    #[serde(
        default,
        serialize_with = "amount::serialize",
        deserialize_with = "amount::deserialize"
    )]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(deserialize_with = "date::deserialize")]
    pub date: DateTime<Utc>,
}

impl TransactionRecord {
    /// Read the entry at `index` of a stored ledger.
    ///
    /// An entry without an `id` gets one derived from its position and
    /// content, so repeated loads of the same blob agree on it.
    pub(crate) fn from_stored(index: usize, mut value: serde_json::Value) -> serde_json::Result<Self> {
        if value.get("id").is_none() {
            let seed = format!("{index}:{value}");
            let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes());
            if let Some(fields) = value.as_object_mut() {
                fields.insert("id".to_string(), serde_json::Value::String(id.to_string()));
            }
        }
        serde_json::from_value(value)
    }

    pub(crate) fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub(crate) fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Legacy identity used by structural updates.
    pub(crate) fn matches_date_and_amount(&self, other: &TransactionRecord) -> bool {
        self.date == other.date && self.amount == other.amount
    }
}

/// Raw fields submitted by the user when creating or editing an entry.
#[derive(Debug, Clone)]
pub(crate) struct TransactionInput {
    pub amount: String,
    pub kind: TransactionKind,
    pub category: String,
    pub note: String,
}

impl TransactionInput {
    pub(crate) fn new(amount: &str, kind: TransactionKind, category: &str) -> Self {
        Self {
            amount: amount.to_string(),
            kind,
            category: category.to_string(),
            note: String::new(),
        }
    }

    pub(crate) fn with_note(mut self, note: &str) -> Self {
        self.note = note.to_string();
        self
    }

    /// Check the input and build a record stamped with `id` and `date`.
    ///
    /// Nothing is persisted here; callers write the record only on `Ok`.
    pub(crate) fn into_record(
        self,
        id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<TransactionRecord, ValidationError> {
        let amount = amount::parse_input(&self.amount)?;
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let note = self.note.trim();

        Ok(TransactionRecord {
            id,
            amount,
            kind: self.kind,
            category: category.to_string(),
            note: (!note.is_empty()).then(|| note.to_string()),
            date,
        })
    }
}
