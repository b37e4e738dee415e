//! Project repository.

use std::collections::{BTreeSet, HashMap};

use kaizen_core::project::{NewProject, Project, ProjectHeader, ProjectMember};
use kaizen_shared::types::EmployeeId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::image::newest_urls;
use crate::entities::{companies, employees, project_employees, projects};

/// Error types for project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectRepositoryError {
    /// Project not found.
    #[error("Project not found: {0}")]
    NotFound(i64),

    /// Some of the listed staff do not exist.
    #[error("Employees not found: {}", .0.join(", "))]
    MissingEmployees(Vec<String>),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

fn to_header(row: projects::Model) -> ProjectHeader {
    ProjectHeader {
        id: row.id,
        name: row.name,
        start_date: row.start_date,
        completion_date: row.completion_date,
        budget: row.budget,
        progress: row.progress,
    }
}

async fn check_staff<C: ConnectionTrait>(
    db: &C,
    employee_ids: &[String],
) -> Result<(), ProjectRepositoryError> {
    if employee_ids.is_empty() {
        return Ok(());
    }
    let found: BTreeSet<String> = employees::Entity::find()
        .filter(employees::Column::WorkPermitNumber.is_in(employee_ids.iter().cloned()))
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.work_permit_number)
        .collect();
    let missing: Vec<String> = employee_ids
        .iter()
        .filter(|id| !found.contains(*id))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ProjectRepositoryError::MissingEmployees(missing))
    }
}

async fn replace_staff<C: ConnectionTrait>(
    db: &C,
    project_id: i64,
    employee_ids: Vec<String>,
) -> Result<(), DbErr> {
    project_employees::Entity::delete_many()
        .filter(project_employees::Column::ProjectId.eq(project_id))
        .exec(db)
        .await?;
    if employee_ids.is_empty() {
        return Ok(());
    }
    let rows = employee_ids
        .into_iter()
        .map(|employee_id| project_employees::ActiveModel {
            project_id: Set(project_id),
            employee_id: Set(employee_id),
        });
    project_employees::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

/// Project repository.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_staff(&self, rows: Vec<projects::Model>) -> Result<Vec<Project>, DbErr> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|p| p.id).collect();
        let staff = project_employees::Entity::find()
            .filter(project_employees::Column::ProjectId.is_in(ids))
            .find_also_related(employees::Entity)
            .all(&self.db)
            .await?;

        let company_ids: BTreeSet<String> = staff
            .iter()
            .filter_map(|(_, e)| e.as_ref().map(|e| e.company_id.clone()))
            .collect();
        let company_names: HashMap<String, String> = companies::Entity::find()
            .filter(companies::Column::Uen.is_in(company_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.uen, c.name))
            .collect();
        let employee_ids: Vec<String> = staff
            .iter()
            .map(|(link, _)| link.employee_id.clone())
            .collect();
        let images = newest_urls(&self.db, &employee_ids).await?;

        let mut members: HashMap<i64, Vec<ProjectMember>> = HashMap::new();
        for (link, employee) in staff {
            let Some(employee) = employee else { continue };
            let Some(company_name) = company_names.get(&employee.company_id).cloned() else {
                continue;
            };
            members.entry(link.project_id).or_default().push(ProjectMember {
                image_url: images.get(&employee.work_permit_number).cloned(),
                work_permit_number: employee.work_permit_number.into(),
                name: employee.name,
                company_id: employee.company_id.into(),
                company_name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let staff = members.remove(&row.id).unwrap_or_default();
                Project::assemble(to_header(row), staff)
            })
            .collect())
    }

    /// Lists every project, newest start first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<Project>, ProjectRepositoryError> {
        let rows = projects::Entity::find()
            .order_by_desc(projects::Column::StartDate)
            .order_by_asc(projects::Column::Id)
            .all(&self.db)
            .await?;
        Ok(self.with_staff(rows).await?)
    }

    /// Lists the projects that employ at least one worker of the company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let ids: BTreeSet<i64> = project_employees::Entity::find()
            .find_also_related(employees::Entity)
            .filter(employees::Column::CompanyId.eq(company_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(link, _)| link.project_id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = projects::Entity::find()
            .filter(projects::Column::Id.is_in(ids))
            .order_by_desc(projects::Column::StartDate)
            .order_by_asc(projects::Column::Id)
            .all(&self.db)
            .await?;
        Ok(self.with_staff(rows).await?)
    }

    /// Finds a project by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no project has this id.
    pub async fn get(&self, id: i64) -> Result<Project, ProjectRepositoryError> {
        let row = projects::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProjectRepositoryError::NotFound(id))?;
        self.with_staff(vec![row])
            .await?
            .pop()
            .ok_or(ProjectRepositoryError::NotFound(id))
    }

    /// Stores a project and its staff.
    ///
    /// # Errors
    ///
    /// Returns `MissingEmployees` if a listed employee does not exist.
    pub async fn create(&self, project: NewProject) -> Result<Project, ProjectRepositoryError> {
        let employee_ids: Vec<String> = project
            .employee_ids
            .into_iter()
            .map(EmployeeId::into_inner)
            .collect();

        let txn = self.db.begin().await?;
        check_staff(&txn, &employee_ids).await?;
        let row = projects::ActiveModel {
            name: Set(project.name),
            start_date: Set(project.start_date),
            completion_date: Set(project.completion_date),
            budget: Set(project.budget),
            progress: Set(project.progress),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let staff = employee_ids.len();
        replace_staff(&txn, row.id, employee_ids).await?;
        txn.commit().await?;

        info!(project_id = row.id, staff, "project created");
        self.get(row.id).await
    }

    /// Replaces the fields and staff of a project.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `MissingEmployees` if a
    /// listed employee does not exist.
    pub async fn update(
        &self,
        id: i64,
        project: NewProject,
    ) -> Result<Project, ProjectRepositoryError> {
        let employee_ids: Vec<String> = project
            .employee_ids
            .into_iter()
            .map(EmployeeId::into_inner)
            .collect();

        let txn = self.db.begin().await?;
        let mut active = projects::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ProjectRepositoryError::NotFound(id))?
            .into_active_model();
        check_staff(&txn, &employee_ids).await?;
        active.name = Set(project.name);
        active.start_date = Set(project.start_date);
        active.completion_date = Set(project.completion_date);
        active.budget = Set(project.budget);
        active.progress = Set(project.progress);
        active.update(&txn).await?;
        let staff = employee_ids.len();
        replace_staff(&txn, id, employee_ids).await?;
        txn.commit().await?;

        info!(project_id = id, staff, "project updated");
        self.get(id).await
    }

    /// Deletes a project and its staff list.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no project has this id.
    pub async fn delete(&self, id: i64) -> Result<(), ProjectRepositoryError> {
        let result = projects::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ProjectRepositoryError::NotFound(id));
        }
        info!(project_id = id, "project deleted");
        Ok(())
    }
}
