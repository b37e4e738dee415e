//! Transaction engine operations.

use std::sync::Arc;

use chrono::NaiveDate;
use kaizen_shared::types::{CompanyId, EmployeeId};
use tracing::{info, warn};

use super::error::TransactionError;
use super::overlap::find_conflict;
use super::store::TransactionStore;
use super::types::{Transaction, TransactionDraft, TransactionKey, TransactionStatus};

/// Validates and mutates worker-loan transactions.
///
/// Holds no state besides the store handle. `submit` reads the employee's
/// loans, checks them and then inserts; two concurrent submissions for the
/// same employee can both pass the check. The store's uniqueness on
/// (employee, start date) still rejects an exact start collision.
pub struct TransactionService<S: TransactionStore + ?Sized> {
    store: Arc<S>,
}

impl<S: TransactionStore + ?Sized> Clone for TransactionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TransactionStore + ?Sized> TransactionService<S> {
    /// Creates a service over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validates and stores a new transaction.
    ///
    /// # Errors
    ///
    /// - `MissingValue` / `InvalidValue` for incomplete or malformed input
    /// - `DateConflict` when the dates collide with a stored loan of the employee
    /// - `DuplicateKey` when the store already holds the key
    pub async fn submit(&self, draft: TransactionDraft) -> Result<Transaction, TransactionError> {
        let candidate = draft.into_transaction()?;
        let existing = self
            .store
            .find_all_by_employee(candidate.employee_id())
            .await?;

        if let Some(hit) = find_conflict(candidate.range(), &existing) {
            warn!(
                employee_id = %candidate.key.employee_id,
                candidate = %candidate.range(),
                existing = %hit.range(),
                "loan dates collide"
            );
            return Err(TransactionError::DateConflict {
                candidate: candidate.range(),
                existing: hit.range(),
            });
        }

        let stored = self.store.insert(candidate).await?;
        info!(key = %stored.key, status = %stored.status, "transaction submitted");
        Ok(stored)
    }

    /// Sets the status of the loan of `employee_id` starting on `start_date`.
    ///
    /// Only the status changes; the rest of the found record is written back
    /// under its own key.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee has no loan starting on that date.
    pub async fn change_status(
        &self,
        employee_id: &EmployeeId,
        start_date: NaiveDate,
        status: TransactionStatus,
    ) -> Result<Transaction, TransactionError> {
        if employee_id.is_blank() {
            return Err(TransactionError::MissingValue("employee_id"));
        }
        let mut found = self
            .find_by_employee_and_start_date(employee_id, start_date)
            .await?;
        let previous = found.status;
        found.status = status;

        let saved = self.store.save(found).await?;
        info!(key = %saved.key, from = %previous, to = %status, "transaction status changed");
        Ok(saved)
    }

    /// Deletes the transaction with the given key.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such transaction exists.
    pub async fn remove(&self, key: &TransactionKey) -> Result<(), TransactionError> {
        if !self.store.delete_by_key(key).await? {
            return Err(TransactionError::NotFound(format!("transaction {key}")));
        }
        info!(%key, "transaction removed");
        Ok(())
    }

    /// Looks up a loan by employee and start date.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing matches.
    pub async fn find_by_employee_and_start_date(
        &self,
        employee_id: &EmployeeId,
        start_date: NaiveDate,
    ) -> Result<Transaction, TransactionError> {
        self.store
            .find_one_by_employee_and_start_date(employee_id, start_date)
            .await?
            .ok_or_else(|| {
                TransactionError::NotFound(format!(
                    "transaction for employee {employee_id} starting {start_date}"
                ))
            })
    }

    /// Loans in which `company_id` is the lender.
    ///
    /// # Errors
    ///
    /// Returns `MissingValue` for a blank company id.
    pub async fn list_by_loaning_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Transaction>, TransactionError> {
        if company_id.is_blank() {
            return Err(TransactionError::MissingValue("company_id"));
        }
        let rows = self.store.find_all_by_loaning_company(company_id).await?;
        Ok(ordered(rows))
    }

    /// Loans in which `company_id` is the borrower.
    ///
    /// # Errors
    ///
    /// Returns `MissingValue` for a blank company id.
    pub async fn list_by_borrowing_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Transaction>, TransactionError> {
        if company_id.is_blank() {
            return Err(TransactionError::MissingValue("company_id"));
        }
        let rows = self.store.find_all_by_borrowing_company(company_id).await?;
        Ok(ordered(rows))
    }
}

fn ordered(mut rows: Vec<Transaction>) -> Vec<Transaction> {
    rows.sort_by(|a, b| {
        a.key
            .start_date
            .cmp(&b.key.start_date)
            .then_with(|| a.key.employee_id.cmp(&b.key.employee_id))
            .then_with(|| a.key.cmp(&b.key))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::memory::InMemoryTransactionStore;
    use crate::transaction::store::StoreError;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn draft(emp: &str, loan: &str, borrow: &str, start: &str, end: &str) -> TransactionDraft {
        TransactionDraft {
            loaning_company_id: Some(loan.into()),
            borrowing_company_id: Some(borrow.into()),
            employee_id: Some(emp.into()),
            start_date: Some(d(start)),
            end_date: Some(d(end)),
            total_cost: Some(dec!(1000)),
            status: None,
        }
    }

    fn service() -> (TransactionService<InMemoryTransactionStore>, Arc<InMemoryTransactionStore>) {
        let store = Arc::new(InMemoryTransactionStore::new());
        (TransactionService::new(Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn test_loan_lifecycle() {
        let (svc, store) = service();

        let a = svc
            .submit(TransactionDraft {
                status: Some(TransactionStatus::Pending),
                ..draft("W1", "C1", "C2", "2024-01-01", "2024-01-31")
            })
            .await
            .unwrap();
        assert_eq!(a.status, TransactionStatus::Pending);

        let b = svc
            .submit(draft("W1", "C1", "C3", "2024-01-15", "2024-02-15"))
            .await;
        assert!(matches!(b, Err(TransactionError::DateConflict { .. })));

        let accepted = svc
            .change_status(&"W1".into(), d("2024-01-01"), TransactionStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.status, TransactionStatus::Accepted);

        svc.remove(&a.key).await.unwrap();
        assert!(store.find_by_key(&a.key).await.unwrap().is_none());
        assert!(matches!(
            svc.remove(&a.key).await,
            Err(TransactionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_exact_start_rejected_and_adjacent_accepted() {
        let (svc, _) = service();
        svc.submit(draft("W1", "C1", "C2", "2024-01-10", "2024-02-10"))
            .await
            .unwrap();

        let same_start = svc
            .submit(draft("W1", "C3", "C4", "2024-01-10", "2024-01-12"))
            .await;
        assert!(matches!(same_start, Err(TransactionError::DateConflict { .. })));

        svc.submit(draft("W1", "C1", "C2", "2024-02-11", "2024-03-01"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_shared_end_date_is_accepted() {
        let (svc, store) = service();
        svc.submit(draft("W1", "C1", "C2", "2024-01-10", "2024-02-10"))
            .await
            .unwrap();

        svc.submit(draft("W1", "C1", "C2", "2024-01-05", "2024-02-10"))
            .await
            .unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_other_employee_is_independent() {
        let (svc, _) = service();
        svc.submit(draft("W1", "C1", "C2", "2024-01-10", "2024-02-10"))
            .await
            .unwrap();
        svc.submit(draft("W2", "C1", "C2", "2024-01-10", "2024-02-10"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_conflict_carries_both_ranges() {
        let (svc, _) = service();
        svc.submit(draft("W1", "C1", "C2", "2024-01-01", "2024-01-31"))
            .await
            .unwrap();
        let err = svc
            .submit(draft("W1", "C1", "C3", "2024-01-15", "2024-02-15"))
            .await
            .unwrap_err();
        match err {
            TransactionError::DateConflict { candidate, existing } => {
                assert_eq!(candidate.start, d("2024-01-15"));
                assert_eq!(existing.start, d("2024-01-01"));
                assert_eq!(existing.end, d("2024-01-31"));
            }
            other => panic!("expected DateConflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_change_status_keeps_other_fields() {
        let (svc, _) = service();
        let original = svc
            .submit(TransactionDraft {
                total_cost: Some(dec!(2500.50)),
                ..draft("W1", "C1", "C2", "2024-03-01", "2024-03-31")
            })
            .await
            .unwrap();

        let updated = svc
            .change_status(&"W1".into(), d("2024-03-01"), TransactionStatus::Rejected)
            .await
            .unwrap();

        assert_eq!(updated.key, original.key);
        assert_eq!(updated.end_date, original.end_date);
        assert_eq!(updated.total_cost, dec!(2500.50));
        assert_eq!(updated.status, TransactionStatus::Rejected);

        // any status may follow any other
        let back = svc
            .change_status(&"W1".into(), d("2024-03-01"), TransactionStatus::Pending)
            .await
            .unwrap();
        assert_eq!(back.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_change_status_unknown_loan() {
        let (svc, _) = service();
        let result = svc
            .change_status(&"W9".into(), d("2024-01-01"), TransactionStatus::Accepted)
            .await;
        assert!(matches!(result, Err(TransactionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_never_inserted() {
        let (svc, _) = service();
        let key = TransactionKey {
            loaning_company_id: "C1".into(),
            borrowing_company_id: "C2".into(),
            employee_id: "W1".into(),
            start_date: d("2024-01-01"),
        };
        assert!(matches!(
            svc.remove(&key).await,
            Err(TransactionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_projections_are_ordered_and_repeatable() {
        let (svc, _) = service();
        svc.submit(draft("W2", "C1", "C2", "2024-05-01", "2024-05-31"))
            .await
            .unwrap();
        svc.submit(draft("W1", "C1", "C3", "2024-02-01", "2024-02-28"))
            .await
            .unwrap();
        svc.submit(draft("W3", "C9", "C2", "2024-01-01", "2024-01-31"))
            .await
            .unwrap();

        let incoming = svc.list_by_loaning_company(&"C1".into()).await.unwrap();
        let starts: Vec<_> = incoming.iter().map(|tx| tx.key.start_date).collect();
        assert_eq!(starts, vec![d("2024-02-01"), d("2024-05-01")]);
        assert_eq!(
            incoming,
            svc.list_by_loaning_company(&"C1".into()).await.unwrap()
        );

        let outgoing = svc.list_by_borrowing_company(&"C2".into()).await.unwrap();
        assert_eq!(outgoing.len(), 2);
        assert_eq!(outgoing[0].key.employee_id.as_str(), "W3");
    }

    #[tokio::test]
    async fn test_blank_company_is_missing_value() {
        let (svc, _) = service();
        assert!(matches!(
            svc.list_by_loaning_company(&" ".into()).await,
            Err(TransactionError::MissingValue(_))
        ));
        assert!(matches!(
            svc.list_by_borrowing_company(&"".into()).await,
            Err(TransactionError::MissingValue(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_field_fails_before_store() {
        let (svc, store) = service();
        let result = svc
            .submit(TransactionDraft {
                total_cost: None,
                ..draft("W1", "C1", "C2", "2024-01-01", "2024-01-31")
            })
            .await;
        assert!(matches!(
            result,
            Err(TransactionError::MissingValue("total_cost"))
        ));
        assert!(store.is_empty().await);
    }

    /// Counts full-key lookups and forwards everything to the in-memory store.
    struct CountingStore {
        inner: InMemoryTransactionStore,
        key_lookups: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TransactionStore for CountingStore {
        async fn find_all_by_employee(
            &self,
            employee_id: &EmployeeId,
        ) -> Result<Vec<Transaction>, StoreError> {
            self.inner.find_all_by_employee(employee_id).await
        }

        async fn find_one_by_employee_and_start_date(
            &self,
            employee_id: &EmployeeId,
            start_date: NaiveDate,
        ) -> Result<Option<Transaction>, StoreError> {
            self.inner
                .find_one_by_employee_and_start_date(employee_id, start_date)
                .await
        }

        async fn find_by_key(
            &self,
            key: &TransactionKey,
        ) -> Result<Option<Transaction>, StoreError> {
            self.key_lookups
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.find_by_key(key).await
        }

        async fn insert(&self, transaction: Transaction) -> Result<Transaction, StoreError> {
            self.inner.insert(transaction).await
        }

        async fn save(&self, transaction: Transaction) -> Result<Transaction, StoreError> {
            self.inner.save(transaction).await
        }

        async fn delete_by_key(&self, key: &TransactionKey) -> Result<bool, StoreError> {
            self.inner.delete_by_key(key).await
        }

        async fn find_all_by_loaning_company(
            &self,
            company_id: &CompanyId,
        ) -> Result<Vec<Transaction>, StoreError> {
            self.inner.find_all_by_loaning_company(company_id).await
        }

        async fn find_all_by_borrowing_company(
            &self,
            company_id: &CompanyId,
        ) -> Result<Vec<Transaction>, StoreError> {
            self.inner.find_all_by_borrowing_company(company_id).await
        }
    }

    #[tokio::test]
    async fn test_remove_is_a_single_delete() {
        let store = Arc::new(CountingStore {
            inner: InMemoryTransactionStore::new(),
            key_lookups: std::sync::atomic::AtomicUsize::new(0),
        });
        let svc = TransactionService::new(Arc::clone(&store));
        let tx = svc
            .submit(draft("W1", "C1", "C2", "2024-01-01", "2024-01-31"))
            .await
            .unwrap();

        svc.remove(&tx.key).await.unwrap();
        assert!(matches!(
            svc.remove(&tx.key).await,
            Err(TransactionError::NotFound(_))
        ));
        assert_eq!(
            store.key_lookups.load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }
}
