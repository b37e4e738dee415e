//! `SeaORM` Entity for projects table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub start_date: Date,
    pub completion_date: Option<Date>,
    pub budget: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub progress: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_employees::Entity")]
    ProjectEmployees,
}

impl Related<super::project_employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectEmployees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
