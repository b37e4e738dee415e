//! `SeaORM` entity definitions.

pub mod companies;
pub mod employee_images;
pub mod employee_skills;
pub mod employees;
pub mod feed_items;
pub mod loan_transactions;
pub mod project_employees;
pub mod projects;
pub mod sea_orm_active_enums;
pub mod skills;

pub mod prelude {
    //! Entity re-exports.

    pub use super::art_tests::Entity as ArtTests;
    pub use super::companies::Entity as Companies;
    pub use super::employee_images::Entity as EmployeeImages;
    pub use super::employee_skills::Entity as EmployeeSkills;
    pub use super::employees::Entity as Employees;
    pub use super::feed_items::Entity as FeedItems;
    pub use super::loan_transactions::Entity as LoanTransactions;
    pub use super::project_employees::Entity as ProjectEmployees;
    pub use super::projects::Entity as Projects;
    pub use super::skills::Entity as Skills;
}
