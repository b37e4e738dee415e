//! Employee skill profile repository.

use std::collections::{BTreeSet, HashMap};

use kaizen_core::skill::{self, EmployeeSkill, EmployeeSkillKey, SkillLevel, SkillSummary};
use kaizen_shared::types::CompanyId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use serde::Serialize;
use tracing::info;

use super::image::newest_urls;
use crate::entities::{companies, employee_skills, employees};

/// Error types for employee skill operations.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeSkillError {
    /// The employee already has a profile for this skill.
    #[error("Employee skill {0} already exists")]
    AlreadyExists(EmployeeSkillKey),

    /// No profile for this employee and skill.
    #[error("Employee skill not found: {0}")]
    NotFound(EmployeeSkillKey),

    /// The employee, skill or company does not exist.
    #[error("Employee, skill or company not found for {0}")]
    MissingReference(EmployeeSkillKey),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A profile offered on the market, with the details a borrower looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillListing {
    /// The profile itself.
    #[serde(flatten)]
    pub profile: EmployeeSkill,
    /// Employee name.
    pub name: String,
    /// Trade or role.
    pub employee_role: String,
    /// Free-form notes.
    pub description: Option<String>,
    /// Newest profile image, if any.
    pub image_url: Option<String>,
    /// Employer name.
    pub company_name: String,
}

fn to_profile(row: employee_skills::Model) -> EmployeeSkill {
    EmployeeSkill {
        key: EmployeeSkillKey {
            employee_id: row.employee_id.into(),
            skill: row.skill_id,
        },
        company_id: row.company_id.into(),
        level: SkillLevel {
            experience: row.experience,
            rating: row.rating,
            cost: row.cost,
        },
    }
}

/// Employee skill repository.
#[derive(Debug, Clone)]
pub struct EmployeeSkillRepository {
    db: DatabaseConnection,
}

impl EmployeeSkillRepository {
    /// Creates a new employee skill repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a new profile.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the employee already has this skill and
    /// `MissingReference` if the employee, skill or company is unknown.
    pub async fn create(
        &self,
        profile: EmployeeSkill,
    ) -> Result<EmployeeSkill, EmployeeSkillError> {
        let key = profile.key.clone();
        let row = employee_skills::ActiveModel {
            employee_id: Set(profile.key.employee_id.into_inner()),
            skill_id: Set(profile.key.skill),
            company_id: Set(profile.company_id.into_inner()),
            experience: Set(profile.level.experience),
            rating: Set(profile.level.rating),
            cost: Set(profile.level.cost),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                EmployeeSkillError::AlreadyExists(key.clone())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                EmployeeSkillError::MissingReference(key.clone())
            }
            _ => EmployeeSkillError::Database(e),
        })?;

        info!(employee_id = %row.employee_id, skill = %row.skill_id, "employee skill added");
        Ok(to_profile(row))
    }

    async fn find(
        &self,
        key: &EmployeeSkillKey,
    ) -> Result<employee_skills::Model, EmployeeSkillError> {
        employee_skills::Entity::find_by_id((
            key.employee_id.as_str().to_string(),
            key.skill.clone(),
        ))
        .one(&self.db)
        .await?
        .ok_or_else(|| EmployeeSkillError::NotFound(key.clone()))
    }

    /// Finds one profile.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee has no profile for the skill.
    pub async fn get(&self, key: &EmployeeSkillKey) -> Result<EmployeeSkill, EmployeeSkillError> {
        self.find(key).await.map(to_profile)
    }

    /// Replaces the offering company and level of a profile.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the profile does not exist and
    /// `MissingReference` if the company is unknown.
    pub async fn update(
        &self,
        key: &EmployeeSkillKey,
        company_id: &CompanyId,
        level: SkillLevel,
    ) -> Result<EmployeeSkill, EmployeeSkillError> {
        let mut active = self.find(key).await?.into_active_model();
        active.company_id = Set(company_id.as_str().to_string());
        active.experience = Set(level.experience);
        active.rating = Set(level.rating);
        active.cost = Set(level.cost);

        let row = active.update(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                EmployeeSkillError::MissingReference(key.clone())
            }
            _ => EmployeeSkillError::Database(e),
        })?;

        info!(employee_id = %row.employee_id, skill = %row.skill_id, "employee skill updated");
        Ok(to_profile(row))
    }

    /// Removes a profile.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the profile does not exist.
    pub async fn delete(&self, key: &EmployeeSkillKey) -> Result<(), EmployeeSkillError> {
        let result = employee_skills::Entity::delete_by_id((
            key.employee_id.as_str().to_string(),
            key.skill.clone(),
        ))
        .exec(&self.db)
        .await?;
        if result.rows_affected == 0 {
            return Err(EmployeeSkillError::NotFound(key.clone()));
        }
        info!(employee_id = %key.employee_id, skill = %key.skill, "employee skill removed");
        Ok(())
    }

    /// Profiles of one employee ordered by skill.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<EmployeeSkill>, EmployeeSkillError> {
        let rows = employee_skills::Entity::find()
            .filter(employee_skills::Column::EmployeeId.eq(employee_id))
            .order_by_asc(employee_skills::Column::SkillId)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_profile).collect())
    }

    /// Profiles a company offers, ordered by employee then skill.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<EmployeeSkill>, EmployeeSkillError> {
        let rows = employee_skills::Entity::find()
            .filter(employee_skills::Column::CompanyId.eq(company_id))
            .order_by_asc(employee_skills::Column::EmployeeId)
            .order_by_asc(employee_skills::Column::SkillId)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_profile).collect())
    }

    /// Profiles offered by every company except `company_id`, optionally
    /// narrowed to one skill.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_offered_by_others(
        &self,
        company_id: &str,
        skill: Option<&str>,
    ) -> Result<Vec<SkillListing>, EmployeeSkillError> {
        let mut query = employee_skills::Entity::find()
            .filter(employee_skills::Column::CompanyId.ne(company_id));
        if let Some(skill) = skill {
            query = query.filter(employee_skills::Column::SkillId.eq(skill));
        }
        let rows = query
            .order_by_asc(employee_skills::Column::SkillId)
            .order_by_asc(employee_skills::Column::Cost)
            .order_by_asc(employee_skills::Column::EmployeeId)
            .find_also_related(employees::Entity)
            .all(&self.db)
            .await?;

        let company_ids: BTreeSet<String> =
            rows.iter().map(|(row, _)| row.company_id.clone()).collect();
        let company_names: HashMap<String, String> = companies::Entity::find()
            .filter(companies::Column::Uen.is_in(company_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.uen, c.name))
            .collect();
        let employee_ids: Vec<String> = rows
            .iter()
            .map(|(row, _)| row.employee_id.clone())
            .collect();
        let images = newest_urls(&self.db, &employee_ids).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(row, employee)| {
                let employee = employee?;
                let company_name = company_names.get(&row.company_id).cloned()?;
                Some(SkillListing {
                    image_url: images.get(&row.employee_id).cloned(),
                    profile: to_profile(row),
                    name: employee.name,
                    employee_role: employee.employee_role,
                    description: employee.description,
                    company_name,
                })
            })
            .collect())
    }

    /// Per-skill headcount and cheapest cost among the profiles other
    /// companies offer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn collate(&self, company_id: &str) -> Result<Vec<SkillSummary>, EmployeeSkillError> {
        let rows = employee_skills::Entity::find()
            .filter(employee_skills::Column::CompanyId.ne(company_id))
            .all(&self.db)
            .await?;
        let profiles: Vec<EmployeeSkill> = rows.into_iter().map(to_profile).collect();
        Ok(skill::collate(&profiles, &CompanyId::from(company_id)))
    }
}
