//! The ledger repository.
//!
//! Every mutation reads the whole ledger, changes it in memory and writes the
//! whole sequence back under [`TRANSACTIONS_KEY`]. This read-modify-write is
//! only safe with a single writer; concurrent mutators would need a lock
//! around load + mutate + persist.

mod budget;

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::db::{KeyValueStore, StoreError, TRANSACTIONS_KEY};
use crate::models::{TransactionInput, TransactionRecord, ValidationError};

pub(crate) use budget::BudgetStore;

#[derive(Debug, thiserror::Error)]
pub(crate) enum LedgerError {
    #[error("invalid {}: {}", .0.field(), .0)]
    Validation(#[from] ValidationError),

    /// Absorbed by [`Ledger::load`]; callers see an empty ledger instead.
    #[error("could not read stored data: {0}")]
    StorageRead(String),

    /// The write did not happen. Nothing should be assumed committed.
    #[error("could not save: {0}")]
    StorageWrite(StoreError),

    #[error("no transaction with id {0}")]
    NotFound(Uuid),
}

pub(crate) struct Ledger<S> {
    store: S,
}

/// A stored ledger as read: the entries that parsed, plus the raw ones that
/// did not. Raw entries are written back untouched after the readable ones.
#[derive(Debug, Default)]
struct Snapshot {
    records: Vec<TransactionRecord>,
    unreadable: Vec<serde_json::Value>,
}

impl<S: KeyValueStore> Ledger<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { store }
    }

    /// Current ledger, newest-created first.
    ///
    /// Never fails: an absent key is an empty ledger, and an unreadable store
    /// or blob is logged and treated as empty.
    pub(crate) fn load(&self) -> Vec<TransactionRecord> {
        self.snapshot().records
    }

    fn snapshot(&self) -> Snapshot {
        match self.read() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "treating stored ledger as empty");
                Snapshot::default()
            }
        }
    }

    fn read(&self) -> Result<Snapshot, LedgerError> {
        let raw = self
            .store
            .get(TRANSACTIONS_KEY)
            .map_err(|e| LedgerError::StorageRead(e.to_string()))?;
        let Some(raw) = raw else {
            return Ok(Snapshot::default());
        };

        let values: Option<Vec<serde_json::Value>> =
            serde_json::from_str(&raw).map_err(|e| LedgerError::StorageRead(e.to_string()))?;

        let mut snapshot = Snapshot::default();
        for (index, value) in values.unwrap_or_default().into_iter().enumerate() {
            match TransactionRecord::from_stored(index, value.clone()) {
                Ok(record) => snapshot.records.push(record),
                Err(e) => {
                    tracing::warn!(index, error = %e, "keeping unreadable ledger entry as is");
                    snapshot.unreadable.push(value);
                }
            }
        }
        Ok(snapshot)
    }

    fn persist(&mut self, snapshot: &Snapshot) -> Result<(), LedgerError> {
        let write_error = |e: serde_json::Error| {
            LedgerError::StorageWrite(StoreError::Write {
                key: TRANSACTIONS_KEY.to_string(),
                reason: e.to_string(),
            })
        };
        let mut entries = snapshot
            .records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(write_error)?;
        entries.extend(snapshot.unreadable.iter().cloned());

        let blob = serde_json::to_string(&entries).map_err(write_error)?;
        self.store
            .set(TRANSACTIONS_KEY, &blob)
            .map_err(LedgerError::StorageWrite)?;
        tracing::debug!(
            count = snapshot.records.len(),
            unreadable = snapshot.unreadable.len(),
            "persisted ledger"
        );
        Ok(())
    }

    /// Validate `input`, stamp it with the current time and prepend it.
    pub(crate) fn create(
        &mut self,
        input: TransactionInput,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        self.create_at(input, Utc::now().trunc_subsecs(3))
    }

    pub(crate) fn create_at(
        &mut self,
        input: TransactionInput,
        date: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        let record = input.into_record(Uuid::new_v4(), date)?;
        let mut snapshot = self.snapshot();
        tracing::debug!(id = %record.id, kind = %record.kind, "creating transaction");
        snapshot.records.insert(0, record);
        self.persist(&snapshot)?;
        Ok(snapshot.records)
    }

    /// Replace the first stored record whose `date` and `amount` equal `old`'s.
    ///
    /// The replacement keeps the matched record's id and date and its position.
    /// No match leaves the ledger as it was; several matches replace only the
    /// first. Neither case is an error.
    pub(crate) fn update(
        &mut self,
        old: &TransactionRecord,
        input: TransactionInput,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        let mut replacement = input.into_record(old.id, old.date)?;
        let mut snapshot = self.snapshot();
        let records = &mut snapshot.records;

        match records.iter().position(|r| r.matches_date_and_amount(old)) {
            Some(index) => {
                if tracing::enabled!(tracing::Level::DEBUG)
                    && records[index + 1..].iter().any(|r| r.matches_date_and_amount(old))
                {
                    tracing::debug!(date = %old.date, "ambiguous update, replacing first match");
                }
                replacement.id = records[index].id;
                records[index] = replacement;
            }
            None => {
                tracing::warn!(date = %old.date, amount = %old.amount, "update matched no transaction");
            }
        }

        self.persist(&snapshot)?;
        Ok(snapshot.records)
    }

    /// Remove every stored record whose `date` equals `record.date`.
    ///
    /// Amount is not compared here, unlike [`Ledger::update`].
    pub(crate) fn delete(
        &mut self,
        record: &TransactionRecord,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        let mut snapshot = self.snapshot();
        let before = snapshot.records.len();
        snapshot.records.retain(|r| r.date != record.date);
        tracing::debug!(removed = before - snapshot.records.len(), date = %record.date, "deleting transactions");
        self.persist(&snapshot)?;
        Ok(snapshot.records)
    }

    pub(crate) fn update_by_id(
        &mut self,
        id: Uuid,
        input: TransactionInput,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        let mut replacement = input.into_record(id, Utc::now())?;
        let mut snapshot = self.snapshot();
        let index = snapshot
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        replacement.date = snapshot.records[index].date;
        snapshot.records[index] = replacement;
        self.persist(&snapshot)?;
        Ok(snapshot.records)
    }

    pub(crate) fn delete_by_id(&mut self, id: Uuid) -> Result<Vec<TransactionRecord>, LedgerError> {
        let mut snapshot = self.snapshot();
        let index = snapshot
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        snapshot.records.remove(index);
        self.persist(&snapshot)?;
        Ok(snapshot.records)
    }
}
