//! Property-based tests for the transaction engine.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::transaction::memory::InMemoryTransactionStore;
use crate::transaction::overlap::conflicts;
use crate::transaction::service::TransactionService;
use crate::transaction::store::TransactionStore;
use crate::transaction::types::{DateRange, Transaction, TransactionDraft, TransactionStatus};
use crate::transaction::TransactionError;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Ranges within a 120-day window, at least one day long.
fn arb_range() -> impl Strategy<Value = DateRange> {
    (0i64..120, 1i64..40).prop_map(|(offset, len)| {
        let start = base_date() + Duration::days(offset);
        DateRange::new(start, start + Duration::days(len))
    })
}

fn arb_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Accepted),
        Just(TransactionStatus::Rejected),
    ]
}

fn arb_employee() -> impl Strategy<Value = String> {
    prop_oneof![Just("W1".to_string()), Just("W2".to_string())]
}

fn arb_company() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("C1".to_string()),
        Just("C2".to_string()),
        Just("C3".to_string()),
    ]
}

fn draft(emp: &str, loan: &str, borrow: &str, range: DateRange) -> TransactionDraft {
    TransactionDraft {
        loaning_company_id: Some(loan.into()),
        borrowing_company_id: Some(borrow.into()),
        employee_id: Some(emp.into()),
        start_date: Some(range.start),
        end_date: Some(range.end),
        total_cost: Some(Decimal::new(150_000, 2)),
        status: None,
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Two loans starting on the same day always collide.
    #[test]
    fn prop_same_start_always_conflicts(a in arb_range(), len in 1i64..60) {
        let b = DateRange::new(a.start, a.start + Duration::days(len));
        prop_assert!(conflicts(b, a));
        prop_assert!(conflicts(a, b));
    }

    /// A candidate entirely before or after the existing range never collides.
    #[test]
    fn prop_disjoint_ranges_never_conflict(a in arb_range(), gap in 1i64..30, len in 1i64..30) {
        let after_start = a.end + Duration::days(gap);
        let after = DateRange::new(after_start, after_start + Duration::days(len));
        prop_assert!(!conflicts(after, a));

        let before_end = a.start - Duration::days(gap);
        let before = DateRange::new(before_end - Duration::days(len), before_end);
        prop_assert!(!conflicts(before, a));
    }

    /// Whatever gets stored, each loan passed the rule against every loan of the
    /// same employee stored before it, and no two share a start date.
    #[test]
    fn prop_stored_loans_respect_rule(
        submissions in prop::collection::vec((arb_employee(), arb_company(), arb_company(), arb_range()), 1..25)
    ) {
        let rt = runtime();
        let accepted: Vec<Transaction> = rt.block_on(async {
            let svc = TransactionService::new(Arc::new(InMemoryTransactionStore::new()));
            let mut accepted = Vec::new();
            for (emp, loan, borrow, range) in &submissions {
                match svc.submit(draft(emp, loan, borrow, *range)).await {
                    Ok(tx) => accepted.push(tx),
                    Err(TransactionError::DateConflict { .. } | TransactionError::DuplicateKey(_)) => {}
                    Err(other) => panic!("unexpected error: {other:?}"),
                }
            }
            accepted
        });

        for (i, later) in accepted.iter().enumerate() {
            for earlier in &accepted[..i] {
                if earlier.key.employee_id != later.key.employee_id {
                    continue;
                }
                prop_assert!(!conflicts(later.range(), earlier.range()));
                prop_assert_ne!(later.key.start_date, earlier.key.start_date);
            }
        }
    }

    /// A rejected submission leaves the store unchanged.
    #[test]
    fn prop_conflict_does_not_write(existing in arb_range(), len in 1i64..30) {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(InMemoryTransactionStore::new());
            let svc = TransactionService::new(Arc::clone(&store));
            svc.submit(draft("W1", "C1", "C2", existing)).await.unwrap();

            let candidate = DateRange::new(existing.start, existing.start + Duration::days(len));
            let result = svc.submit(draft("W1", "C3", "C2", candidate)).await;
            assert!(matches!(result, Err(TransactionError::DateConflict { .. })));
            assert_eq!(store.len().await, 1);
        });
    }

    /// Listing twice without writes yields identical results.
    #[test]
    fn prop_projections_idempotent(
        submissions in prop::collection::vec((arb_employee(), arb_company(), arb_company(), arb_range()), 0..15),
        company in arb_company(),
    ) {
        let rt = runtime();
        rt.block_on(async {
            let svc = TransactionService::new(Arc::new(InMemoryTransactionStore::new()));
            for (emp, loan, borrow, range) in &submissions {
                let _ = svc.submit(draft(emp, loan, borrow, *range)).await;
            }
            let company: kaizen_shared::types::CompanyId = company.into();
            let first = svc.list_by_loaning_company(&company).await.unwrap();
            let second = svc.list_by_loaning_company(&company).await.unwrap();
            assert_eq!(first, second);
            let first = svc.list_by_borrowing_company(&company).await.unwrap();
            let second = svc.list_by_borrowing_company(&company).await.unwrap();
            assert_eq!(first, second);
        });
    }

    /// Changing status touches nothing but the status.
    #[test]
    fn prop_change_status_only_touches_status(range in arb_range(), status in arb_status()) {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(InMemoryTransactionStore::new());
            let svc = TransactionService::new(Arc::clone(&store));
            let before = svc.submit(draft("W1", "C1", "C2", range)).await.unwrap();

            let after = svc
                .change_status(&"W1".into(), range.start, status)
                .await
                .unwrap();

            assert_eq!(after.key, before.key);
            assert_eq!(after.end_date, before.end_date);
            assert_eq!(after.total_cost, before.total_cost);
            assert_eq!(after.status, status);
            assert_eq!(store.len().await, 1);
            let stored = store.find_by_key(&before.key).await.unwrap().unwrap();
            assert_eq!(stored.status, status);
        });
    }
}
