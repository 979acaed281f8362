use crate::db::{KeyValueStore, BUDGET_KEY};
use crate::models::{Budget, ValidationError};

use super::LedgerError;

/// Get/set for the single persisted monthly budget.
///
/// Independent of the ledger: nothing here compares the budget with spending.
pub(crate) struct BudgetStore<S> {
    store: S,
}

impl<S: KeyValueStore> BudgetStore<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { store }
    }

    /// `None` when unset, blank, or unreadable.
    pub(crate) fn get(&self) -> Option<Budget> {
        match self.store.get(BUDGET_KEY) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()).map(Budget::new),
            Err(e) => {
                tracing::warn!(error = %e, "could not read budget");
                None
            }
        }
    }

    pub(crate) fn set(&mut self, value: &str) -> Result<Budget, LedgerError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::MissingBudget.into());
        }
        self.store
            .set(BUDGET_KEY, value)
            .map_err(LedgerError::StorageWrite)?;
        tracing::debug!(budget = value, "saved budget");
        Ok(Budget::new(value.to_string()))
    }
}
