//! Project staffing.
//!
//! A project lists the employees working on it. The companies involved are
//! not stored; they follow from the employees' current employers.

mod types;

pub use types::{
    NewProject, Project, ProjectCompany, ProjectDraft, ProjectEmployee, ProjectError,
    ProjectHeader, ProjectMember,
};
