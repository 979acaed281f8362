#![allow(clippy::unwrap_used)]

use chrono::TimeZone;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::*;

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn record(amount: Decimal, kind: TransactionKind, category: &str, date: DateTime<Utc>) -> TransactionRecord {
    TransactionRecord {
        id: Uuid::new_v4(),
        amount,
        kind,
        category: category.into(),
        note: None,
        date,
    }
}

fn income(amount: Decimal, date: DateTime<Utc>) -> TransactionRecord {
    record(amount, TransactionKind::Income, "เงินเดือน", date)
}

fn expense(amount: Decimal, date: DateTime<Utc>) -> TransactionRecord {
    record(amount, TransactionKind::Expense, "อาหาร", date)
}

fn ids(records: &[&TransactionRecord]) -> Vec<Uuid> {
    records.iter().map(|r| r.id).collect()
}

fn sample_ledger() -> Vec<TransactionRecord> {
    vec![
        expense(dec!(30), at(2024, 3, 2)),
        income(dec!(1000), at(2024, 2, 25)),
        expense(dec!(75.5), at(2024, 2, 10)),
        income(dec!(30), at(2024, 1, 31)),
        expense(dec!(12), at(2024, 3, 15)),
    ]
}

// ── Filter ────────────────────────────────────────────────────

#[test]
fn test_filter_all_is_identity() {
    let ledger = sample_ledger();
    let all = filter(&ledger, FilterType::All);
    let expected: Vec<&TransactionRecord> = ledger.iter().collect();
    assert_eq!(all, expected);
}

#[test]
fn test_filter_by_kind_preserves_order() {
    let ledger = sample_ledger();
    let expenses = filter(&ledger, FilterType::Expense);
    assert_eq!(ids(&expenses), vec![ledger[0].id, ledger[2].id, ledger[4].id]);

    let incomes = filter(&ledger, FilterType::Income);
    assert_eq!(ids(&incomes), vec![ledger[1].id, ledger[3].id]);
}

#[test]
fn test_filter_and_sort_parse() {
    assert_eq!(FilterType::parse("ALL"), Some(FilterType::All));
    assert_eq!(FilterType::parse("income"), Some(FilterType::Income));
    assert_eq!(FilterType::parse("expense"), Some(FilterType::Expense));
    assert_eq!(FilterType::parse("both"), None);
    assert_eq!(SortBy::parse("Amount"), Some(SortBy::Amount));
    assert_eq!(SortBy::parse("category"), None);
    assert_eq!(FilterType::Expense.to_string(), "expense");
    assert_eq!(SortBy::Date.to_string(), "date");
}

// ── Sort ──────────────────────────────────────────────────────

#[test]
fn test_sort_by_date_descending() {
    let ledger = sample_ledger();
    let mut records = filter(&ledger, FilterType::All);
    sort(&mut records, SortBy::Date);
    let dates: Vec<_> = records.iter().map(|r| r.date).collect();
    let mut expected = dates.clone();
    expected.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, expected);
    assert_eq!(records[0].id, ledger[4].id);
}

#[test]
fn test_sort_by_amount_descending() {
    let ledger = sample_ledger();
    let mut records = filter(&ledger, FilterType::All);
    sort(&mut records, SortBy::Amount);
    let amounts: Vec<_> = records.iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![dec!(1000), dec!(75.5), dec!(30), dec!(30), dec!(12)]);
}

#[test]
fn test_sort_by_amount_is_stable() {
    let ledger = sample_ledger();
    let mut records = filter(&ledger, FilterType::All);
    sort(&mut records, SortBy::Amount);
    // Both 30s keep ledger order: the expense (index 0) before the income (index 3).
    assert_eq!(records[2].id, ledger[0].id);
    assert_eq!(records[3].id, ledger[3].id);
}

#[test]
fn test_sort_by_date_is_stable() {
    let same = at(2024, 5, 1);
    let ledger = vec![
        expense(dec!(1), same),
        income(dec!(2), at(2024, 4, 1)),
        expense(dec!(3), same),
        income(dec!(4), same),
    ];
    let mut records = filter(&ledger, FilterType::All);
    sort(&mut records, SortBy::Date);
    assert_eq!(
        ids(&records),
        vec![ledger[0].id, ledger[2].id, ledger[3].id, ledger[1].id]
    );
}

#[test]
fn test_resort_amount_then_date_keeps_prior_order_for_ties() {
    let same = at(2024, 5, 1);
    let ledger = vec![
        expense(dec!(5), same),
        expense(dec!(50), same),
        income(dec!(20), at(2024, 6, 1)),
        expense(dec!(500), same),
    ];
    let mut records = filter(&ledger, FilterType::All);
    sort(&mut records, SortBy::Amount);
    assert_eq!(
        ids(&records),
        vec![ledger[3].id, ledger[1].id, ledger[2].id, ledger[0].id]
    );

    sort(&mut records, SortBy::Date);
    // Same-date records stay in their amount order.
    assert_eq!(
        ids(&records),
        vec![ledger[2].id, ledger[3].id, ledger[1].id, ledger[0].id]
    );
}

// ── Group by month ────────────────────────────────────────────

#[test]
fn test_month_key() {
    let key = MonthKey::of(&at(2024, 2, 29));
    assert_eq!(key, MonthKey { year: 2024, month: 2 });
    assert_eq!(key.ordinal(), 2024 * 12 + 1);
    assert_eq!(key.to_string(), "2024-02");

    let dec_key = MonthKey::of(&at(2023, 12, 31));
    let jan_key = MonthKey::of(&at(2024, 1, 1));
    assert_eq!(jan_key.ordinal() - dec_key.ordinal(), 1);
}

#[test]
fn test_month_key_uses_utc() {
    let late = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
    assert_eq!(MonthKey::of(&late), MonthKey { year: 2024, month: 1 });
}

#[test]
fn test_group_by_month_after_date_sort() {
    let ledger = sample_ledger();
    let view = derive_view(&ledger, ViewSelection::default());
    let keys: Vec<String> = view.groups.iter().map(|g| g.key.to_string()).collect();
    assert_eq!(keys, vec!["2024-03", "2024-02", "2024-01"]);
    assert_eq!(ids(&view.groups[0].records), vec![ledger[4].id, ledger[0].id]);
    assert_eq!(ids(&view.groups[1].records), vec![ledger[1].id, ledger[2].id]);
    assert_eq!(ids(&view.groups[2].records), vec![ledger[3].id]);
}

#[test]
fn test_group_order_follows_amount_sort() {
    let ledger = sample_ledger();
    let view = derive_view(
        &ledger,
        ViewSelection {
            filter: FilterType::All,
            sort: SortBy::Amount,
        },
    );
    // Amount order: 1000 (Feb), 75.5 (Feb), 30 (Mar), 30 (Jan), 12 (Mar)
    let keys: Vec<String> = view.groups.iter().map(|g| g.key.to_string()).collect();
    assert_eq!(keys, vec!["2024-02", "2024-03", "2024-01"]);
    assert_eq!(ids(&view.groups[1].records), vec![ledger[0].id, ledger[4].id]);

    let grouped: usize = view.groups.iter().map(|g| g.records.len()).sum();
    assert_eq!(grouped, view.records.len());
}

#[test]
fn test_group_empty() {
    assert!(group_by_month(&[]).is_empty());
}

// ── Totals ────────────────────────────────────────────────────

#[test]
fn test_totals_scenario() {
    let t1 = at(2024, 1, 5);
    let t2 = at(2024, 1, 20);
    let ledger = vec![income(dec!(100), t1), expense(dec!(40), t2)];

    let all = derive_view(&ledger, ViewSelection::default());
    assert_eq!(
        all.totals,
        Totals {
            income: dec!(100),
            expense: dec!(40),
            balance: dec!(60),
        }
    );

    let expenses = derive_view(
        &ledger,
        ViewSelection {
            filter: FilterType::Expense,
            sort: SortBy::Date,
        },
    );
    assert_eq!(
        expenses.totals,
        Totals {
            income: Decimal::ZERO,
            expense: dec!(40),
            balance: dec!(-40),
        }
    );
    assert_eq!(expenses.records.len(), 1);
    assert_eq!(expenses.records[0].date, t2);
}

#[test]
fn test_balance_identity_for_every_selection() {
    let ledger = sample_ledger();
    for filter in [FilterType::All, FilterType::Income, FilterType::Expense] {
        for sort in [SortBy::Date, SortBy::Amount] {
            let view = derive_view(&ledger, ViewSelection { filter, sort });
            assert_eq!(view.totals.balance, view.totals.income - view.totals.expense);
        }
    }
}

#[test]
fn test_totals_follow_filter() {
    let ledger = sample_ledger();
    let incomes = derive_view(
        &ledger,
        ViewSelection {
            filter: FilterType::Income,
            sort: SortBy::Amount,
        },
    );
    assert_eq!(incomes.totals.income, dec!(1030));
    assert_eq!(incomes.totals.expense, Decimal::ZERO);
}

#[test]
fn test_totals_with_zero_coerced_amount() {
    let ledger = vec![income(dec!(10), at(2024, 1, 1)), expense(Decimal::ZERO, at(2024, 1, 2))];
    let totals = compute_totals(&ledger);
    assert_eq!(totals.income, dec!(10));
    assert_eq!(totals.expense, Decimal::ZERO);
    assert_eq!(totals.balance, dec!(10));
}

#[test]
fn test_totals_empty() {
    assert_eq!(compute_totals(&[]), Totals::default());
}

#[test]
fn test_derive_view_is_repeatable() {
    let ledger = sample_ledger();
    let selection = ViewSelection {
        filter: FilterType::Expense,
        sort: SortBy::Amount,
    };
    assert_eq!(derive_view(&ledger, selection), derive_view(&ledger, selection));
}

#[test]
fn test_totals_saturate_instead_of_overflowing() {
    let ledger = vec![
        income(Decimal::MAX, at(2024, 1, 1)),
        income(Decimal::MAX, at(2024, 1, 2)),
        expense(Decimal::MAX, at(2024, 1, 3)),
        expense(dec!(1), at(2024, 1, 4)),
    ];
    let totals = compute_totals(&ledger);
    assert_eq!(totals.income, Decimal::MAX);
    assert_eq!(totals.expense, Decimal::MAX);
    assert_eq!(totals.balance, Decimal::ZERO);

    let view = derive_view(&ledger, ViewSelection::default());
    assert_eq!(view.totals, totals);
}

#[test]
fn test_balance_saturates_at_min() {
    let ledger = vec![
        income(Decimal::MIN, at(2024, 1, 1)),
        expense(Decimal::MAX, at(2024, 1, 2)),
    ];
    assert_eq!(compute_totals(&ledger).balance, Decimal::MIN);
}

// ── Expense breakdown ─────────────────────────────────────────

#[test]
fn test_expense_breakdown() {
    let ledger = vec![
        record(dec!(20), TransactionKind::Expense, "เดินทาง", at(2024, 1, 1)),
        record(dec!(50), TransactionKind::Income, "เงินเดือน", at(2024, 1, 2)),
        record(dec!(35), TransactionKind::Expense, "อาหาร", at(2024, 1, 3)),
        record(dec!(5), TransactionKind::Expense, "เดินทาง", at(2024, 2, 1)),
    ];
    let breakdown = expense_breakdown(&ledger);
    assert_eq!(
        breakdown,
        vec![
            CategoryTotal {
                category: "เดินทาง".into(),
                amount: dec!(25),
            },
            CategoryTotal {
                category: "อาหาร".into(),
                amount: dec!(35),
            },
        ]
    );
}

#[test]
fn test_expense_breakdown_no_expenses() {
    let ledger = vec![income(dec!(1), at(2024, 1, 1))];
    assert!(expense_breakdown(&ledger).is_empty());
}

#[test]
fn test_expense_breakdown_saturates() {
    let ledger = vec![
        expense(Decimal::MAX, at(2024, 1, 1)),
        expense(Decimal::MAX, at(2024, 1, 2)),
    ];
    let breakdown = expense_breakdown(&ledger);
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].amount, Decimal::MAX);
}
