//! Employee repository for database operations.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::info;

use crate::entities::employees;

/// Error types for employee operations.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeError {
    /// An employee with this work permit number already exists.
    #[error("Employee '{0}' already exists")]
    AlreadyExists(String),

    /// Employee not found.
    #[error("Employee not found: {0}")]
    NotFound(String),

    /// Owning company not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    /// Work permit number (primary key).
    pub work_permit_number: String,
    /// Owning company UEN.
    pub company_id: String,
    /// Full name.
    pub name: String,
    /// Passport number.
    pub passport_number: String,
    /// Company-issued work id.
    pub work_id: String,
    /// Trade or role.
    pub employee_role: String,
    /// Monthly foreign worker levy.
    pub levy: i32,
    /// Work permit issue date.
    pub work_permit_date_of_issue: NaiveDate,
    /// Work permit expiry date.
    pub work_permit_expiry_date: NaiveDate,
    /// Local contact number.
    pub work_contact_number: String,
    /// Current work site.
    pub work_site_location: String,
    /// Local residential address.
    pub singapore_address: String,
    /// Whether the employee is fully vaccinated.
    pub vaccination_status: bool,
    /// Whether the employee may be lent to other companies.
    pub for_sharing: bool,
    /// Whether the employee is currently on loan.
    pub shared: bool,
    /// Free-form notes.
    pub description: Option<String>,
}

/// Input for updating an employee. The work permit number is the identity
/// and cannot change; everything else is replaced.
#[derive(Debug, Clone)]
pub struct UpdateEmployeeInput {
    /// Owning company UEN.
    pub company_id: String,
    /// Full name.
    pub name: String,
    /// Passport number.
    pub passport_number: String,
    /// Company-issued work id.
    pub work_id: String,
    /// Trade or role.
    pub employee_role: String,
    /// Monthly foreign worker levy.
    pub levy: i32,
    /// Work permit issue date.
    pub work_permit_date_of_issue: NaiveDate,
    /// Work permit expiry date.
    pub work_permit_expiry_date: NaiveDate,
    /// Local contact number.
    pub work_contact_number: String,
    /// Current work site.
    pub work_site_location: String,
    /// Local residential address.
    pub singapore_address: String,
    /// Whether the employee is fully vaccinated.
    pub vaccination_status: bool,
    /// Whether the employee may be lent to other companies.
    pub for_sharing: bool,
    /// Whether the employee is currently on loan.
    pub shared: bool,
    /// Free-form notes.
    pub description: Option<String>,
}

/// Employee repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the employees of a company ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<employees::Model>, EmployeeError> {
        Ok(employees::Entity::find()
            .filter(employees::Column::CompanyId.eq(company_id))
            .order_by_asc(employees::Column::Name)
            .order_by_asc(employees::Column::WorkPermitNumber)
            .all(&self.db)
            .await?)
    }

    /// Finds an employee by work permit number.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no employee has this number.
    pub async fn get(&self, work_permit_number: &str) -> Result<employees::Model, EmployeeError> {
        employees::Entity::find_by_id(work_permit_number.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| EmployeeError::NotFound(work_permit_number.to_string()))
    }

    /// Returns true if the employee exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(&self, work_permit_number: &str) -> Result<bool, EmployeeError> {
        Ok(employees::Entity::find_by_id(work_permit_number.to_string())
            .one(&self.db)
            .await?
            .is_some())
    }

    /// Creates an employee.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` for a taken work permit number and
    /// `CompanyNotFound` for an unknown company.
    pub async fn create(
        &self,
        input: CreateEmployeeInput,
    ) -> Result<employees::Model, EmployeeError> {
        let work_permit_number = input.work_permit_number.clone();
        let company_id = input.company_id.clone();

        let model = employees::ActiveModel {
            work_permit_number: Set(input.work_permit_number),
            company_id: Set(input.company_id),
            name: Set(input.name),
            passport_number: Set(input.passport_number),
            work_id: Set(input.work_id),
            employee_role: Set(input.employee_role),
            levy: Set(input.levy),
            work_permit_date_of_issue: Set(input.work_permit_date_of_issue),
            work_permit_expiry_date: Set(input.work_permit_expiry_date),
            work_contact_number: Set(input.work_contact_number),
            work_site_location: Set(input.work_site_location),
            singapore_address: Set(input.singapore_address),
            vaccination_status: Set(input.vaccination_status),
            for_sharing: Set(input.for_sharing),
            shared: Set(input.shared),
            description: Set(input.description),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                EmployeeError::AlreadyExists(work_permit_number.clone())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                EmployeeError::CompanyNotFound(company_id.clone())
            }
            _ => EmployeeError::Database(e),
        })?;

        info!(work_permit_number = %model.work_permit_number, company_id = %model.company_id, "employee created");
        Ok(model)
    }

    /// Replaces the details of an existing employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown work permit number and
    /// `CompanyNotFound` for an unknown company.
    pub async fn update(
        &self,
        work_permit_number: &str,
        input: UpdateEmployeeInput,
    ) -> Result<employees::Model, EmployeeError> {
        let company_id = input.company_id.clone();
        let mut active = self.get(work_permit_number).await?.into_active_model();
        active.company_id = Set(input.company_id);
        active.name = Set(input.name);
        active.passport_number = Set(input.passport_number);
        active.work_id = Set(input.work_id);
        active.employee_role = Set(input.employee_role);
        active.levy = Set(input.levy);
        active.work_permit_date_of_issue = Set(input.work_permit_date_of_issue);
        active.work_permit_expiry_date = Set(input.work_permit_expiry_date);
        active.work_contact_number = Set(input.work_contact_number);
        active.work_site_location = Set(input.work_site_location);
        active.singapore_address = Set(input.singapore_address);
        active.vaccination_status = Set(input.vaccination_status);
        active.for_sharing = Set(input.for_sharing);
        active.shared = Set(input.shared);
        active.description = Set(input.description);

        let model = active.update(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                EmployeeError::CompanyNotFound(company_id.clone())
            }
            _ => EmployeeError::Database(e),
        })?;

        info!(work_permit_number = %model.work_permit_number, company_id = %model.company_id, "employee updated");
        Ok(model)
    }

    /// Deletes an employee together with loans, tests and images.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no employee has this number.
    pub async fn delete(&self, work_permit_number: &str) -> Result<(), EmployeeError> {
        let result = employees::Entity::delete_by_id(work_permit_number.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EmployeeError::NotFound(work_permit_number.to_string()));
        }
        info!(work_permit_number, "employee deleted");
        Ok(())
    }
}
