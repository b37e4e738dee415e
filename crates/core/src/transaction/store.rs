//! Storage port for transactions.

use async_trait::async_trait;
use chrono::NaiveDate;
use kaizen_shared::types::{CompanyId, EmployeeId};
use thiserror::Error;

use super::types::{Transaction, TransactionKey};

/// Errors reported by a [`TransactionStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert collided with an existing key.
    #[error("duplicate transaction key {0}")]
    DuplicateKey(TransactionKey),

    /// The employee or a company referenced by the transaction does not exist.
    #[error("referenced record does not exist: {0}")]
    MissingReference(String),

    /// Any other backend failure.
    #[error("{0}")]
    Backend(String),
}

/// Persistence operations the engine relies on.
///
/// `insert` must reject an existing key; `save` replaces the row with the
/// same key or inserts it.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// All transactions of one employee.
    async fn find_all_by_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// The transaction of `employee_id` starting on `start_date`, if any.
    async fn find_one_by_employee_and_start_date(
        &self,
        employee_id: &EmployeeId,
        start_date: NaiveDate,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Lookup by full key.
    async fn find_by_key(&self, key: &TransactionKey) -> Result<Option<Transaction>, StoreError>;

    /// Uniqueness-enforcing insert.
    async fn insert(&self, transaction: Transaction) -> Result<Transaction, StoreError>;

    /// Upsert by full key.
    async fn save(&self, transaction: Transaction) -> Result<Transaction, StoreError>;

    /// Deletes by full key. Returns false if nothing was deleted.
    async fn delete_by_key(&self, key: &TransactionKey) -> Result<bool, StoreError>;

    /// Loans where `company_id` lends the employee.
    async fn find_all_by_loaning_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Loans where `company_id` borrows the employee.
    async fn find_all_by_borrowing_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Transaction>, StoreError>;
}
