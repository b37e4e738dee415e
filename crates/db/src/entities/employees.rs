//! `SeaORM` Entity for employees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub work_permit_number: String,
    pub company_id: String,
    pub name: String,
    pub passport_number: String,
    pub work_id: String,
    pub employee_role: String,
    pub levy: i32,
    pub work_permit_date_of_issue: Date,
    pub work_permit_expiry_date: Date,
    pub work_contact_number: String,
    pub work_site_location: String,
    pub singapore_address: String,
    pub vaccination_status: bool,
    pub for_sharing: bool,
    pub shared: bool,
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Uen"
    )]
    Companies,
    #[sea_orm(has_many = "super::loan_transactions::Entity")]
    LoanTransactions,
    #[sea_orm(has_many = "super::art_tests::Entity")]
    ArtTests,
    #[sea_orm(has_many = "super::employee_images::Entity")]
    EmployeeImages,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::loan_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanTransactions.def()
    }
}

impl Related<super::art_tests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArtTests.def()
    }
}

impl Related<super::employee_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeImages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
