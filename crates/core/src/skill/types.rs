//! Employee skill types and validation.

use std::fmt;

use kaizen_shared::types::{CompanyId, EmployeeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest rating a skill can carry.
pub const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Errors raised while validating a skill profile.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkillError {
    /// A required field is blank.
    #[error("missing value: {0}")]
    MissingValue(&'static str),

    /// A field is out of range.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl SkillError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingValue(_) => "MISSING_VALUE",
            Self::InvalidValue(_) => "INVALID_VALUE",
        }
    }
}

/// Identity of a skill profile: one entry per employee and skill.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmployeeSkillKey {
    /// Work permit number of the employee.
    pub employee_id: EmployeeId,
    /// Skill name from the catalog.
    pub skill: String,
}

impl fmt::Display for EmployeeSkillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(employee {}, skill {})", self.employee_id, self.skill)
    }
}

/// How well an employee masters a skill and what an hour of it costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevel {
    /// Years of experience.
    pub experience: i32,
    /// Rating between 0 and 5.
    pub rating: Decimal,
    /// Hourly cost.
    pub cost: Decimal,
}

impl SkillLevel {
    /// Checks the ranges of every field.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for negative experience or cost, or a rating
    /// outside `0..=5`.
    pub fn validate(&self) -> Result<(), SkillError> {
        if self.experience < 0 {
            return Err(SkillError::InvalidValue(format!(
                "experience must not be negative, got {}",
                self.experience
            )));
        }
        if self.rating < Decimal::ZERO || self.rating > MAX_RATING {
            return Err(SkillError::InvalidValue(format!(
                "rating must be between 0 and {MAX_RATING}, got {}",
                self.rating
            )));
        }
        if self.cost < Decimal::ZERO {
            return Err(SkillError::InvalidValue(format!(
                "cost must not be negative, got {}",
                self.cost
            )));
        }
        Ok(())
    }
}

/// A skill an employee offers, on behalf of the company that employs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSkill {
    /// Employee and skill.
    #[serde(flatten)]
    pub key: EmployeeSkillKey,
    /// Company offering the employee.
    pub company_id: CompanyId,
    /// Experience, rating and cost.
    #[serde(flatten)]
    pub level: SkillLevel,
}

impl EmployeeSkill {
    /// Builds a validated profile.
    ///
    /// # Errors
    ///
    /// Returns `MissingValue` for a blank employee, skill or company and
    /// `InvalidValue` for an out-of-range level.
    pub fn new(
        key: EmployeeSkillKey,
        company_id: CompanyId,
        level: SkillLevel,
    ) -> Result<Self, SkillError> {
        if key.employee_id.is_blank() {
            return Err(SkillError::MissingValue("employee_id"));
        }
        if key.skill.trim().is_empty() {
            return Err(SkillError::MissingValue("skill"));
        }
        if company_id.is_blank() {
            return Err(SkillError::MissingValue("company_id"));
        }
        level.validate()?;
        Ok(Self {
            key,
            company_id,
            level,
        })
    }
}
