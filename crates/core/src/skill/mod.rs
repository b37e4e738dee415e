//! Skill profiles.
//!
//! Companies record which skills their employees have, how experienced they
//! are and what they cost. Other companies browse these profiles when they
//! look for workers to borrow.

mod collate;
mod types;

pub use collate::{SkillSummary, collate};
pub use types::{EmployeeSkill, EmployeeSkillKey, MAX_RATING, SkillError, SkillLevel};
