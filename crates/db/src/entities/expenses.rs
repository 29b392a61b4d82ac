//! `SeaORM` Entity for the expenses table.

use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{ExpenseStatus, RecurringFrequency};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub vendor_name: Option<String>,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub currency: String,
    pub expense_date: Date,
    pub status: ExpenseStatus,
    pub category_id: Option<Uuid>,
    pub recurring: RecurringFrequency,
    /// Non-null and monotonically non-decreasing while `recurring != none`.
    pub next_due_date: Option<Date>,
    pub soft_delete: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
