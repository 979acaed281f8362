pub(crate) mod amount;
mod budget;
pub(crate) mod category;
mod date;
mod transaction;

pub(crate) use amount::ValidationError;
pub(crate) use budget::Budget;
pub(crate) use transaction::{TransactionInput, TransactionKind, TransactionRecord};
