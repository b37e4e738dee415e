//! Company repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::info;

use crate::entities::companies;

/// Error types for company operations.
#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    /// A company with this UEN already exists.
    #[error("Company '{0}' already exists")]
    AlreadyExists(String),

    /// Company not found.
    #[error("Company not found: {0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Company repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all companies ordered by UEN.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<companies::Model>, CompanyError> {
        Ok(companies::Entity::find()
            .order_by_asc(companies::Column::Uen)
            .all(&self.db)
            .await?)
    }

    /// Finds a company by UEN.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no company has this UEN.
    pub async fn get(&self, uen: &str) -> Result<companies::Model, CompanyError> {
        companies::Entity::find_by_id(uen.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| CompanyError::NotFound(uen.to_string()))
    }

    /// Finds the first company (by UEN) registered under exactly this name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no company has this name.
    pub async fn find_by_name(&self, name: &str) -> Result<companies::Model, CompanyError> {
        companies::Entity::find()
            .filter(companies::Column::Name.eq(name.trim()))
            .order_by_asc(companies::Column::Uen)
            .one(&self.db)
            .await?
            .ok_or_else(|| CompanyError::NotFound(name.to_string()))
    }

    /// Creates a company.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the UEN is taken.
    pub async fn create(&self, uen: &str, name: &str) -> Result<companies::Model, CompanyError> {
        let model = companies::ActiveModel {
            uen: Set(uen.to_string()),
            name: Set(name.trim().to_string()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                CompanyError::AlreadyExists(uen.to_string())
            }
            _ => CompanyError::Database(e),
        })?;

        info!(uen = %model.uen, "company created");
        Ok(model)
    }

    /// Renames a company. The UEN is the identity and cannot change.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no company has this UEN.
    pub async fn update(&self, uen: &str, name: &str) -> Result<companies::Model, CompanyError> {
        let mut active = self.get(uen).await?.into_active_model();
        active.name = Set(name.trim().to_string());
        let model = active.update(&self.db).await?;

        info!(uen = %model.uen, "company updated");
        Ok(model)
    }

    /// Deletes a company together with its employees and their records.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no company has this UEN.
    pub async fn delete(&self, uen: &str) -> Result<(), CompanyError> {
        let result = companies::Entity::delete_by_id(uen.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CompanyError::NotFound(uen.to_string()));
        }
        info!(uen, "company deleted");
        Ok(())
    }
}
