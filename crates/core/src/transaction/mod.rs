//! Worker-loan transaction consistency engine.
//!
//! A transaction records one employee lent by a loaning company to a
//! borrowing company for a date range. The engine keeps the date ranges of
//! each employee's loans from colliding and manages the
//! Pending/Accepted/Rejected status of each loan.
//!
//! Storage is reached through [`TransactionStore`]; [`InMemoryTransactionStore`]
//! backs tests and local runs.

pub mod error;
pub mod memory;
pub mod overlap;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::TransactionError;
pub use memory::InMemoryTransactionStore;
pub use overlap::{conflicts, find_conflict};
pub use service::TransactionService;
pub use store::{StoreError, TransactionStore};
pub use types::{DateRange, Transaction, TransactionDraft, TransactionKey, TransactionStatus};
