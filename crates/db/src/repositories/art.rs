//! ART result repository.

use chrono::NaiveDate;
use kaizen_core::art::{ArtEntry, ArtRecord, latest_per_employee};
use kaizen_shared::types::{CompanyId, EmployeeId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tracing::info;

use crate::entities::art_tests;

/// Error types for ART operations.
#[derive(Debug, thiserror::Error)]
pub enum ArtRepositoryError {
    /// ART record not found.
    #[error("ART record not found: {0}")]
    NotFound(i64),

    /// The employee or company does not exist.
    #[error("Employee '{employee_id}' or company '{company_id}' not found")]
    MissingReference {
        /// Employee on the record.
        employee_id: String,
        /// Company on the record.
        company_id: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// ART repository.
#[derive(Debug, Clone)]
pub struct ArtRepository {
    db: DatabaseConnection,
}

fn to_record(model: art_tests::Model) -> ArtRecord {
    ArtRecord {
        id: model.id,
        employee_id: EmployeeId::new(model.employee_id),
        company_id: CompanyId::new(model.company_id),
        date_of_test: model.date_of_test,
        expiry_date: model.expiry_date,
        result: model.result,
    }
}

impl ArtRepository {
    /// Creates a new ART repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a validated test.
    ///
    /// # Errors
    ///
    /// Returns `MissingReference` if the employee or company is unknown.
    pub async fn create(&self, entry: ArtEntry) -> Result<ArtRecord, ArtRepositoryError> {
        let employee_id = entry.employee_id.as_str().to_string();
        let company_id = entry.company_id.as_str().to_string();

        let model = art_tests::ActiveModel {
            employee_id: Set(employee_id.clone()),
            company_id: Set(company_id.clone()),
            date_of_test: Set(entry.date_of_test),
            expiry_date: Set(entry.expiry_date),
            result: Set(entry.result),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                ArtRepositoryError::MissingReference {
                    employee_id: employee_id.clone(),
                    company_id: company_id.clone(),
                }
            }
            _ => ArtRepositoryError::Database(e),
        })?;

        info!(id = model.id, employee_id = %model.employee_id, result = model.result, "ART recorded");
        Ok(to_record(model))
    }

    /// Lists all tests reported by a company, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<ArtRecord>, ArtRepositoryError> {
        let rows = art_tests::Entity::find()
            .filter(art_tests::Column::CompanyId.eq(company_id.as_str()))
            .order_by_desc(art_tests::Column::DateOfTest)
            .order_by_desc(art_tests::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_record).collect())
    }

    /// Newest test of each employee of a company, ignoring tests after `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_latest(
        &self,
        company_id: &CompanyId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<ArtRecord>, ArtRepositoryError> {
        let mut query =
            art_tests::Entity::find().filter(art_tests::Column::CompanyId.eq(company_id.as_str()));
        if let Some(as_of) = as_of {
            query = query.filter(art_tests::Column::DateOfTest.lte(as_of));
        }
        let rows: Vec<ArtRecord> = query
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_record)
            .collect();
        Ok(latest_per_employee(&rows, as_of))
    }

    /// Deletes a test.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no test has this id.
    pub async fn delete(&self, id: i64) -> Result<(), ArtRepositoryError> {
        let result = art_tests::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ArtRepositoryError::NotFound(id));
        }
        info!(id, "ART deleted");
        Ok(())
    }
}
