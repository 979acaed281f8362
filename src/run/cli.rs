use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::db::Database;
use crate::ledger::{BudgetStore, Ledger};
use crate::models::{category, TransactionInput, TransactionKind, TransactionRecord};
use crate::view::{self, FilterType, SortBy, ViewSelection};

use super::util::{format_amount, format_signed, short_id, truncate};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    let Some(command) = args.get(1) else {
        return cli_list(&[], db);
    };
    let rest = &args[2..];
    match command.as_str() {
        "list" | "ls" => cli_list(rest, db),
        "add" => cli_add(rest, db),
        "edit" => cli_edit(rest, db),
        "delete" | "rm" => cli_delete(rest, db),
        "budget" => cli_budget(rest, db),
        "breakdown" => cli_breakdown(db),
        "categories" => cli_categories(rest),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("pocketledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("PocketLedger — local income/expense ledger");
    println!();
    println!("Usage: pocketledger [command]");
    println!();
    println!("Commands:");
    println!("  list                                List transactions grouped by month (default)");
    println!("    --filter <all|income|expense>     Which transactions to show (default: all)");
    println!("    --sort <date|amount>              Sort order, newest/largest first (default: date)");
    println!("  add <amount> <category>             Record a transaction");
    println!("    --type <income|expense>           Transaction type (default: expense)");
    println!("    --note <text>                     Optional note");
    println!("  edit <selector> <amount> <category> Replace a transaction (same flags as add)");
    println!("  delete <selector>                   Delete a transaction");
    println!("  budget [value]                      Show or set the monthly budget");
    println!("  breakdown                           Expense totals by category");
    println!("  categories [income|expense]         List the standard categories");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    println!("A selector is an id prefix from `list`, or @<timestamp> to match by date.");
}

// ── Argument helpers ─────────────────────────────────────────

/// Value following `--name`, if present.
pub(super) fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither `--flags` nor flag values.
pub(super) fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_kind(args: &[String], default: TransactionKind) -> Result<TransactionKind> {
    match flag_value(args, "--type") {
        Some(raw) => TransactionKind::parse(raw)
            .ok_or_else(|| anyhow::anyhow!("Unknown type '{raw}' (expected income or expense)")),
        None => Ok(default),
    }
}

/// Use the canonical spelling of a standard category, warning on others.
fn canonical_category(kind: TransactionKind, raw: &str) -> String {
    match category::find_by_name(kind, raw) {
        Some(name) => name.to_string(),
        None => {
            if !raw.trim().is_empty() {
                eprintln!(
                    "Warning: '{raw}' is not a standard {kind} category (see `categories`, or use '{}')",
                    category::OTHER
                );
            }
            raw.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Selector {
    Id(String),
    Date(DateTime<Utc>),
}

pub(super) fn parse_selector(raw: &str) -> Result<Selector> {
    if let Some(stamp) = raw.strip_prefix('@') {
        let date = DateTime::parse_from_rfc3339(stamp)
            .with_context(|| format!("Invalid timestamp: {stamp}"))?;
        return Ok(Selector::Date(date.with_timezone(&Utc)));
    }
    let prefix = raw.trim().to_lowercase().replace('-', "");
    if prefix.is_empty() {
        anyhow::bail!("Empty selector");
    }
    Ok(Selector::Id(prefix))
}

pub(super) fn resolve<'a>(
    records: &'a [TransactionRecord],
    selector: &Selector,
) -> Result<&'a TransactionRecord> {
    match selector {
        Selector::Date(date) => records
            .iter()
            .find(|r| r.date == *date)
            .ok_or_else(|| anyhow::anyhow!("No transaction at {}", date.to_rfc3339())),
        Selector::Id(prefix) => {
            let matches: Vec<&TransactionRecord> = records
                .iter()
                .filter(|r| r.id.simple().to_string().starts_with(prefix.as_str()))
                .collect();
            match matches.as_slice() {
                [only] => Ok(*only),
                [] => anyhow::bail!("No transaction with id starting '{prefix}'"),
                many => anyhow::bail!(
                    "Id prefix '{prefix}' matches {} transactions; use more characters",
                    many.len()
                ),
            }
        }
    }
}

// ── Commands ─────────────────────────────────────────────────

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let filter = match flag_value(args, "--filter") {
        Some(raw) => FilterType::parse(raw)
            .ok_or_else(|| anyhow::anyhow!("Unknown filter '{raw}' (expected all, income or expense)"))?,
        None => FilterType::default(),
    };
    let sort = match flag_value(args, "--sort") {
        Some(raw) => SortBy::parse(raw)
            .ok_or_else(|| anyhow::anyhow!("Unknown sort '{raw}' (expected date or amount)"))?,
        None => SortBy::default(),
    };

    let records = Ledger::new(&mut *db).load();
    let budget = BudgetStore::new(&mut *db).get();
    let view = view::derive_view(&records, ViewSelection { filter, sort });

    println!(
        "PocketLedger — filter: {}, sort: {}",
        view.selection.filter, view.selection.sort
    );
    println!("{}", "─".repeat(48));
    println!("  Income:    {}", format_amount(view.totals.income));
    println!("  Expenses:  {}", format_amount(view.totals.expense));
    println!("  Balance:   {}", format_amount(view.totals.balance));
    if let Some(budget) = &budget {
        println!("  Budget:    {}", format_amount(budget.amount()));
    }

    if view.records.is_empty() {
        println!();
        println!("No transactions");
        return Ok(());
    }

    for group in &view.groups {
        println!();
        println!("{}", group.key);
        for record in &group.records {
            let note = record.note.as_deref().unwrap_or("");
            println!(
                "  {:<8}  {}  {:>16}  {:<20} {}",
                short_id(&record.id),
                record.date.format("%Y-%m-%d %H:%M"),
                format_signed(record),
                truncate(&record.category, 20),
                truncate(note, 30),
            );
        }
    }
    Ok(())
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    let [amount, category_name, ..] = pos.as_slice() else {
        anyhow::bail!("Usage: pocketledger add <amount> <category> [--type income|expense] [--note <text>]");
    };
    let kind = parse_kind(args, TransactionKind::Expense)?;
    let input = TransactionInput::new(amount, kind, &canonical_category(kind, category_name))
        .with_note(flag_value(args, "--note").unwrap_or(""));

    let records = Ledger::new(&mut *db).create(input)?;
    if let Some(created) = records.first() {
        println!(
            "Added {} {} ({}) [{}]",
            created.kind,
            format_signed(created),
            created.category,
            short_id(&created.id)
        );
    }
    Ok(())
}

fn cli_edit(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    let [selector, amount, category_name, ..] = pos.as_slice() else {
        anyhow::bail!("Usage: pocketledger edit <selector> <amount> <category> [--type income|expense] [--note <text>]");
    };
    let selector = parse_selector(selector)?;

    let mut ledger = Ledger::new(&mut *db);
    let records = ledger.load();
    let existing = resolve(&records, &selector)?.clone();

    let kind = parse_kind(args, existing.kind)?;
    let note = flag_value(args, "--note").unwrap_or_else(|| existing.note.as_deref().unwrap_or(""));
    let input = TransactionInput::new(amount, kind, &canonical_category(kind, category_name))
        .with_note(note);

    let updated = match selector {
        Selector::Id(_) => ledger.update_by_id(existing.id, input)?,
        Selector::Date(_) => ledger.update(&existing, input)?,
    };
    if let Some(record) = updated.iter().find(|r| r.id == existing.id) {
        println!(
            "Updated [{}]: {} ({})",
            short_id(&record.id),
            format_signed(record),
            record.category
        );
    }
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positionals(args);
    let [selector, ..] = pos.as_slice() else {
        anyhow::bail!("Usage: pocketledger delete <selector>");
    };
    let selector = parse_selector(selector)?;

    let mut ledger = Ledger::new(&mut *db);
    let records = ledger.load();
    let target = resolve(&records, &selector)?;

    let remaining = match selector {
        Selector::Id(_) => ledger.delete_by_id(target.id)?,
        Selector::Date(_) => ledger.delete(target)?,
    };
    let removed = records.len() - remaining.len();
    println!("Deleted {removed} transaction(s)");
    Ok(())
}

fn cli_budget(args: &[String], db: &mut Database) -> Result<()> {
    let mut budgets = BudgetStore::new(db);
    match positionals(args).first() {
        Some(value) => {
            let budget = budgets.set(value)?;
            println!("Budget saved: {}", format_amount(budget.amount()));
        }
        None => match budgets.get() {
            Some(budget) => println!("Monthly budget: {}", format_amount(budget.amount())),
            None => println!("No budget set"),
        },
    }
    Ok(())
}

fn cli_breakdown(db: &mut Database) -> Result<()> {
    let records = Ledger::new(db).load();
    let breakdown = view::expense_breakdown(&records);
    if breakdown.is_empty() {
        println!("No expense data available");
        return Ok(());
    }

    let total = breakdown
        .iter()
        .fold(Decimal::ZERO, |sum, c| sum.saturating_add(c.amount));
    println!("Expense breakdown");
    println!("{}", "─".repeat(48));
    for entry in &breakdown {
        let share = entry
            .amount
            .checked_div(total)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|pct| pct.round_dp(1))
            .unwrap_or_default();
        println!(
            "  {:<24} {:>16}  {:>5}%",
            truncate(&entry.category, 24),
            format_amount(entry.amount),
            share
        );
    }
    println!("  {:<24} {:>16}", "Total", format_amount(total));
    Ok(())
}

fn cli_categories(args: &[String]) -> Result<()> {
    let kinds = match positionals(args).first() {
        Some(raw) => vec![TransactionKind::parse(raw)
            .ok_or_else(|| anyhow::anyhow!("Unknown type '{raw}' (expected income or expense)"))?],
        None => vec![TransactionKind::Income, TransactionKind::Expense],
    };
    for kind in kinds {
        println!("{kind}:");
        for name in category::for_kind(kind) {
            println!("  {name}");
        }
    }
    Ok(())
}
