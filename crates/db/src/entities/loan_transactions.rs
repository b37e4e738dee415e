//! `SeaORM` Entity for loan_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LoanStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "loan_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub loaning_company_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub borrowing_company_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub loan_start_date: Date,
    pub loan_end_date: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_cost: Decimal,
    pub status: LoanStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::WorkPermitNumber"
    )]
    Employees,
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::LoaningCompanyId",
        to = "super::companies::Column::Uen"
    )]
    LoaningCompany,
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::BorrowingCompanyId",
        to = "super::companies::Column::Uen"
    )]
    BorrowingCompany,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
