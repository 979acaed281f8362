//! Derived views over a ledger snapshot.
//!
//! Everything here is a pure function of `(records, selection)`; nothing is
//! cached between calls.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

use crate::models::{TransactionKind, TransactionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum FilterType {
    #[default]
    All,
    Income,
    Expense,
}

impl FilterType {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            other => TransactionKind::parse(other).map(Self::from),
        }
    }

    fn keeps(&self, record: &TransactionRecord) -> bool {
        match self {
            Self::All => true,
            Self::Income => record.kind == TransactionKind::Income,
            Self::Expense => record.kind == TransactionKind::Expense,
        }
    }
}

impl From<TransactionKind> for FilterType {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
        }
    }
}

impl std::fmt::Display for FilterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::Income => "income",
            Self::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortBy {
    #[default]
    Date,
    Amount,
}

impl SortBy {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Date => "date",
            Self::Amount => "amount",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ViewSelection {
    pub filter: FilterType,
    pub sort: SortBy,
}

/// Calendar month of a timestamp, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub(crate) fn of(date: &DateTime<Utc>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// `year * 12 + (month - 1)`; consecutive months differ by one.
    pub(crate) fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthGroup<'a> {
    pub key: MonthKey,
    pub records: Vec<&'a TransactionRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// Render-ready projection of a ledger for one selection.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LedgerView<'a> {
    pub selection: ViewSelection,
    pub records: Vec<&'a TransactionRecord>,
    pub groups: Vec<MonthGroup<'a>>,
    pub totals: Totals,
}

/// Keep records of the selected kind, preserving order.
pub(crate) fn filter(records: &[TransactionRecord], filter: FilterType) -> Vec<&TransactionRecord> {
    records.iter().filter(|r| filter.keeps(r)).collect()
}

/// Stable descending sort; equal keys keep their relative order.
pub(crate) fn sort(records: &mut [&TransactionRecord], sort_by: SortBy) {
    match sort_by {
        SortBy::Date => records.sort_by(|a, b| b.date.cmp(&a.date)),
        SortBy::Amount => records.sort_by(|a, b| b.amount.cmp(&a.amount)),
    }
}

/// Bucket already-sorted records by month.
///
/// Buckets appear in the order their month is first seen, so the applied sort
/// decides bucket order. Each month appears once.
pub(crate) fn group_by_month<'a>(sorted: &[&'a TransactionRecord]) -> Vec<MonthGroup<'a>> {
    let mut groups: Vec<MonthGroup<'a>> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for &record in sorted {
        let key = MonthKey::of(&record.date);
        let slot = *index.entry(key.ordinal()).or_insert_with(|| {
            groups.push(MonthGroup {
                key,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }
    groups
}

/// Sums saturate at the bounds of `Decimal` rather than overflow.
pub(crate) fn compute_totals<'a>(records: impl IntoIterator<Item = &'a TransactionRecord>) -> Totals {
    let mut totals = Totals::default();
    for record in records {
        match record.kind {
            TransactionKind::Income => {
                totals.income = totals.income.saturating_add(record.amount);
            }
            TransactionKind::Expense => {
                totals.expense = totals.expense.saturating_add(record.amount);
            }
        }
    }
    totals.balance = totals.income.saturating_sub(totals.expense);
    totals
}

/// Filter, sort, group and total in one pass. Totals cover only the filtered
/// records.
pub(crate) fn derive_view(records: &[TransactionRecord], selection: ViewSelection) -> LedgerView<'_> {
    let mut visible = filter(records, selection.filter);
    sort(&mut visible, selection.sort);
    let groups = group_by_month(&visible);
    let totals = compute_totals(visible.iter().copied());

    LedgerView {
        selection,
        records: visible,
        groups,
        totals,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Expense spending per category across the whole ledger, categories in the
/// order first seen.
pub(crate) fn expense_breakdown(records: &[TransactionRecord]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for record in records.iter().filter(|r| r.is_expense()) {
        match totals.iter_mut().find(|t| t.category == record.category) {
            Some(total) => total.amount = total.amount.saturating_add(record.amount),
            None => totals.push(CategoryTotal {
                category: record.category.clone(),
                amount: record.amount,
            }),
        }
    }
    totals
}

#[cfg(test)]
mod tests;
