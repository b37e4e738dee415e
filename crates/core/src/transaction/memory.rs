//! In-memory transaction store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use kaizen_shared::types::{CompanyId, EmployeeId};
use tokio::sync::RwLock;

use super::store::{StoreError, TransactionStore};
use super::types::{Transaction, TransactionKey};

/// [`TransactionStore`] kept in process memory.
///
/// Enforces the same uniqueness as the database: one row per full key and one
/// row per (employee, start date).
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionStore {
    rows: Arc<RwLock<BTreeMap<TransactionKey, Transaction>>>,
}

impl InMemoryTransactionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored transactions.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    async fn filtered<F>(&self, pred: F) -> Vec<Transaction>
    where
        F: Fn(&Transaction) -> bool,
    {
        let rows = self.rows.read().await;
        rows.values().filter(|tx| pred(tx)).cloned().collect()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn find_all_by_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .filtered(|tx| &tx.key.employee_id == employee_id)
            .await)
    }

    async fn find_one_by_employee_and_start_date(
        &self,
        employee_id: &EmployeeId,
        start_date: NaiveDate,
    ) -> Result<Option<Transaction>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .find(|tx| &tx.key.employee_id == employee_id && tx.key.start_date == start_date)
            .cloned())
    }

    async fn find_by_key(&self, key: &TransactionKey) -> Result<Option<Transaction>, StoreError> {
        Ok(self.rows.read().await.get(key).cloned())
    }

    async fn insert(&self, transaction: Transaction) -> Result<Transaction, StoreError> {
        let mut rows = self.rows.write().await;
        let taken = rows.values().any(|tx| {
            tx.key.employee_id == transaction.key.employee_id
                && tx.key.start_date == transaction.key.start_date
        });
        if taken {
            return Err(StoreError::DuplicateKey(transaction.key));
        }
        rows.insert(transaction.key.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn save(&self, transaction: Transaction) -> Result<Transaction, StoreError> {
        self.rows
            .write()
            .await
            .insert(transaction.key.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn delete_by_key(&self, key: &TransactionKey) -> Result<bool, StoreError> {
        Ok(self.rows.write().await.remove(key).is_some())
    }

    async fn find_all_by_loaning_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .filtered(|tx| &tx.key.loaning_company_id == company_id)
            .await)
    }

    async fn find_all_by_borrowing_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .filtered(|tx| &tx.key.borrowing_company_id == company_id)
            .await)
    }
}
