//! Project types, validation and assembly.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use kaizen_shared::types::{CompanyId, EmployeeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Progress of a finished project, in percent.
const COMPLETE: Decimal = Decimal::ONE_HUNDRED;

/// Errors raised while validating a project.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectError {
    /// A required field is absent or blank.
    #[error("missing value: {0}")]
    MissingValue(&'static str),

    /// A field is out of range.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl ProjectError {
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

/// A project as submitted by a client; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    /// Project name.
    #[serde(default)]
    pub name: Option<String>,
    /// Commencement date.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Estimated or actual completion date.
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    /// Free-form budget note.
    #[serde(default)]
    pub budget: Option<String>,
    /// Percent complete; zero when absent.
    #[serde(default)]
    pub progress: Option<Decimal>,
    /// Work permit numbers of the staff.
    #[serde(default)]
    pub employee_ids: Option<Vec<EmployeeId>>,
}

/// A validated project ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Project name, trimmed.
    pub name: String,
    /// Commencement date.
    pub start_date: NaiveDate,
    /// Estimated or actual completion date.
    pub completion_date: Option<NaiveDate>,
    /// Free-form budget note.
    pub budget: Option<String>,
    /// Percent complete.
    pub progress: Decimal,
    /// Distinct staff, ordered.
    pub employee_ids: Vec<EmployeeId>,
}

impl ProjectDraft {
    /// Validates the draft.
    ///
    /// # Errors
    ///
    /// - `MissingValue` for a blank name, no start date or no staff list
    /// - `InvalidValue` for a completion before the start, progress outside
    ///   `0..=100` or a blank work permit number
    pub fn into_project(self) -> Result<NewProject, ProjectError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(ProjectError::MissingValue("name"))?;
        let start_date = self
            .start_date
            .ok_or(ProjectError::MissingValue("start_date"))?;
        let employee_ids = self
            .employee_ids
            .ok_or(ProjectError::MissingValue("employee_ids"))?;

        if let Some(done) = self.completion_date
            && done < start_date
        {
            return Err(ProjectError::InvalidValue(format!(
                "completion date {done} is before start date {start_date}"
            )));
        }

        let progress = self.progress.unwrap_or(Decimal::ZERO);
        if progress < Decimal::ZERO || progress > COMPLETE {
            return Err(ProjectError::InvalidValue(format!(
                "progress must be between 0 and 100, got {progress}"
            )));
        }

        if employee_ids.iter().any(EmployeeId::is_blank) {
            return Err(ProjectError::InvalidValue(
                "employee_ids contains a blank work permit number".to_string(),
            ));
        }
        let employee_ids: Vec<EmployeeId> = employee_ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(NewProject {
            name,
            start_date,
            completion_date: self.completion_date,
            budget: self.budget.filter(|b| !b.trim().is_empty()),
            progress,
            employee_ids,
        })
    }
}

/// Stored project fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectHeader {
    /// Store-assigned id.
    pub id: i64,
    /// Project name.
    pub name: String,
    /// Commencement date.
    pub start_date: NaiveDate,
    /// Estimated or actual completion date.
    pub completion_date: Option<NaiveDate>,
    /// Free-form budget note.
    pub budget: Option<String>,
    /// Percent complete.
    pub progress: Decimal,
}

/// An employee on a project together with their employer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMember {
    /// Work permit number.
    pub work_permit_number: EmployeeId,
    /// Employee name.
    pub name: String,
    /// Newest profile image, if any.
    pub image_url: Option<String>,
    /// Employer UEN.
    pub company_id: CompanyId,
    /// Employer name.
    pub company_name: String,
}

/// Staff entry of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEmployee {
    /// Work permit number.
    pub work_permit_number: EmployeeId,
    /// Employee name.
    pub name: String,
    /// Newest profile image, if any.
    pub image_url: Option<String>,
}

/// Company taking part in a project through its employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCompany {
    /// Company UEN.
    pub uen: CompanyId,
    /// Company name.
    pub name: String,
}

/// A project with its staff and the companies they come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stored fields.
    #[serde(flatten)]
    pub header: ProjectHeader,
    /// Companies involved, ordered by UEN.
    pub companies: Vec<ProjectCompany>,
    /// Staff, ordered by work permit number.
    pub employees: Vec<ProjectEmployee>,
}

impl Project {
    /// Combines the stored fields with the staff rows.
    ///
    /// Duplicate staff rows collapse into one entry.
    #[must_use]
    pub fn assemble(header: ProjectHeader, members: Vec<ProjectMember>) -> Self {
        let mut companies: BTreeMap<CompanyId, String> = BTreeMap::new();
        let mut employees: BTreeMap<EmployeeId, ProjectEmployee> = BTreeMap::new();

        for member in members {
            companies
                .entry(member.company_id)
                .or_insert(member.company_name);
            employees
                .entry(member.work_permit_number.clone())
                .or_insert(ProjectEmployee {
                    work_permit_number: member.work_permit_number,
                    name: member.name,
                    image_url: member.image_url,
                });
        }

        Self {
            header,
            companies: companies
                .into_iter()
                .map(|(uen, name)| ProjectCompany { uen, name })
                .collect(),
            employees: employees.into_values().collect(),
        }
    }
}
