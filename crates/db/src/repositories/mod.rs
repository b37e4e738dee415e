//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod art;
pub mod company;
pub mod employee;
pub mod employee_skill;
pub mod feed;
pub mod image;
pub mod project;
pub mod skill;
pub mod transaction;

pub use art::{ArtRepository, ArtRepositoryError};
pub use company::{CompanyError, CompanyRepository};
pub use employee::{CreateEmployeeInput, EmployeeError, EmployeeRepository, UpdateEmployeeInput};
pub use employee_skill::{EmployeeSkillError, EmployeeSkillRepository, SkillListing};
pub use feed::SeaOrmFeedStore;
pub use image::{CreateImageInput, ImageRepository};
pub use project::{ProjectRepository, ProjectRepositoryError};
pub use skill::{SkillRepository, SkillRepositoryError};
pub use transaction::SeaOrmTransactionStore;
