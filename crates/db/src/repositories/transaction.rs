//! PostgreSQL implementation of the transaction store.

use async_trait::async_trait;
use chrono::NaiveDate;
use kaizen_core::transaction::{StoreError, Transaction, TransactionKey, TransactionStore};
use kaizen_shared::types::{CompanyId, EmployeeId};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::error;

use crate::entities::loan_transactions;

/// [`TransactionStore`] backed by the `loan_transactions` table.
#[derive(Debug, Clone)]
pub struct SeaOrmTransactionStore {
    db: DatabaseConnection,
}

impl SeaOrmTransactionStore {
    /// Creates a new store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: loan_transactions::Model) -> Transaction {
    Transaction {
        key: TransactionKey {
            loaning_company_id: CompanyId::new(model.loaning_company_id),
            borrowing_company_id: CompanyId::new(model.borrowing_company_id),
            employee_id: EmployeeId::new(model.employee_id),
            start_date: model.loan_start_date,
        },
        end_date: model.loan_end_date,
        total_cost: model.total_cost,
        status: model.status.into(),
    }
}

fn to_active(tx: &Transaction) -> loan_transactions::ActiveModel {
    loan_transactions::ActiveModel {
        loaning_company_id: Set(tx.key.loaning_company_id.as_str().to_string()),
        borrowing_company_id: Set(tx.key.borrowing_company_id.as_str().to_string()),
        employee_id: Set(tx.key.employee_id.as_str().to_string()),
        loan_start_date: Set(tx.key.start_date),
        loan_end_date: Set(tx.end_date),
        total_cost: Set(tx.total_cost),
        status: Set(tx.status.into()),
    }
}

fn key_tuple(key: &TransactionKey) -> (String, String, String, NaiveDate) {
    (
        key.loaning_company_id.as_str().to_string(),
        key.borrowing_company_id.as_str().to_string(),
        key.employee_id.as_str().to_string(),
        key.start_date,
    )
}

fn write_error(err: DbErr, tx: &Transaction) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateKey(tx.key.clone()),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => StoreError::MissingReference(format!(
            "employee {} or company {}/{}",
            tx.key.employee_id, tx.key.loaning_company_id, tx.key.borrowing_company_id
        )),
        _ => backend(err),
    }
}

fn backend(err: DbErr) -> StoreError {
    error!(error = %err, "loan_transactions query failed");
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl TransactionStore for SeaOrmTransactionStore {
    async fn find_all_by_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows = loan_transactions::Entity::find()
            .filter(loan_transactions::Column::EmployeeId.eq(employee_id.as_str()))
            .order_by_asc(loan_transactions::Column::LoanStartDate)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn find_one_by_employee_and_start_date(
        &self,
        employee_id: &EmployeeId,
        start_date: NaiveDate,
    ) -> Result<Option<Transaction>, StoreError> {
        let row = loan_transactions::Entity::find()
            .filter(loan_transactions::Column::EmployeeId.eq(employee_id.as_str()))
            .filter(loan_transactions::Column::LoanStartDate.eq(start_date))
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(row.map(to_domain))
    }

    async fn find_by_key(&self, key: &TransactionKey) -> Result<Option<Transaction>, StoreError> {
        let row = loan_transactions::Entity::find_by_id(key_tuple(key))
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(row.map(to_domain))
    }

    async fn insert(&self, transaction: Transaction) -> Result<Transaction, StoreError> {
        loan_transactions::Entity::insert(to_active(&transaction))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| write_error(e, &transaction))?;
        Ok(transaction)
    }

    async fn save(&self, transaction: Transaction) -> Result<Transaction, StoreError> {
        loan_transactions::Entity::insert(to_active(&transaction))
            .on_conflict(
                OnConflict::columns([
                    loan_transactions::Column::LoaningCompanyId,
                    loan_transactions::Column::BorrowingCompanyId,
                    loan_transactions::Column::EmployeeId,
                    loan_transactions::Column::LoanStartDate,
                ])
                .update_columns([
                    loan_transactions::Column::LoanEndDate,
                    loan_transactions::Column::TotalCost,
                    loan_transactions::Column::Status,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| write_error(e, &transaction))?;
        Ok(transaction)
    }

    async fn delete_by_key(&self, key: &TransactionKey) -> Result<bool, StoreError> {
        let result = loan_transactions::Entity::delete_by_id(key_tuple(key))
            .exec(&self.db)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected > 0)
    }

    async fn find_all_by_loaning_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows = loan_transactions::Entity::find()
            .filter(loan_transactions::Column::LoaningCompanyId.eq(company_id.as_str()))
            .order_by_asc(loan_transactions::Column::LoanStartDate)
            .order_by_asc(loan_transactions::Column::EmployeeId)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn find_all_by_borrowing_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows = loan_transactions::Entity::find()
            .filter(loan_transactions::Column::BorrowingCompanyId.eq(company_id.as_str()))
            .order_by_asc(loan_transactions::Column::LoanStartDate)
            .order_by_asc(loan_transactions::Column::EmployeeId)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }
}
