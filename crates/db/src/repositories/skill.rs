//! Skill catalog repository.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryOrder, Set,
    SqlErr,
};
use tracing::info;

use crate::entities::skills;

/// Error types for skill catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum SkillRepositoryError {
    /// The skill is already in the catalog.
    #[error("Skill '{0}' already exists")]
    AlreadyExists(String),

    /// Skill not found.
    #[error("Skill not found: {0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Skill catalog repository.
#[derive(Debug, Clone)]
pub struct SkillRepository {
    db: DatabaseConnection,
}

impl SkillRepository {
    /// Creates a new skill repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the catalog ordered by skill name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<skills::Model>, SkillRepositoryError> {
        Ok(skills::Entity::find()
            .order_by_asc(skills::Column::Skill)
            .all(&self.db)
            .await?)
    }

    /// Finds a skill by name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the skill is not in the catalog.
    pub async fn get(&self, skill: &str) -> Result<skills::Model, SkillRepositoryError> {
        skills::Entity::find_by_id(skill.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| SkillRepositoryError::NotFound(skill.to_string()))
    }

    /// Adds a skill to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the name is taken.
    pub async fn create(
        &self,
        skill: &str,
        task: &str,
    ) -> Result<skills::Model, SkillRepositoryError> {
        let skill = skill.trim().to_string();
        let model = skills::ActiveModel {
            skill: Set(skill.clone()),
            task: Set(task.trim().to_string()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                SkillRepositoryError::AlreadyExists(skill.clone())
            }
            _ => SkillRepositoryError::Database(e),
        })?;

        info!(skill = %model.skill, "skill added");
        Ok(model)
    }

    /// Replaces the task description of a skill.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the skill is not in the catalog.
    pub async fn update(
        &self,
        skill: &str,
        task: &str,
    ) -> Result<skills::Model, SkillRepositoryError> {
        let mut active = self.get(skill).await?.into_active_model();
        active.task = Set(task.trim().to_string());
        let model = active.update(&self.db).await?;

        info!(skill = %model.skill, "skill updated");
        Ok(model)
    }

    /// Removes a skill and every employee profile that lists it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the skill is not in the catalog.
    pub async fn delete(&self, skill: &str) -> Result<(), SkillRepositoryError> {
        let result = skills::Entity::delete_by_id(skill.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(SkillRepositoryError::NotFound(skill.to_string()));
        }
        info!(skill, "skill removed");
        Ok(())
    }
}
