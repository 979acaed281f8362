use super::TransactionKind;

pub(crate) const INCOME_CATEGORIES: &[&str] = &["เงินเดือน", "ลงทุน", "ของขวัญ", "อื่นๆ"];

pub(crate) const EXPENSE_CATEGORIES: &[&str] =
    &["อาหาร", "เดินทาง", "ช้อปปิ้ง", "ค่าสาธารณูปโภค", "อื่นๆ"];

/// The catch-all category that ends both lists.
pub(crate) const OTHER: &str = "อื่นๆ";

/// Fixed category list offered for a transaction kind.
pub(crate) fn for_kind(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Income => INCOME_CATEGORIES,
        TransactionKind::Expense => EXPENSE_CATEGORIES,
    }
}

/// Find a category by name (case-insensitive) in the list for `kind`.
pub(crate) fn find_by_name(kind: TransactionKind, name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    for_kind(kind)
        .iter()
        .copied()
        .find(|c| c.to_lowercase() == lower)
}
