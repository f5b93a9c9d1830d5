//! Cash withdrawal entity - Cash taken out of an open drawer mid-shift.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cash withdrawal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_withdrawals")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Register the cash came out of
    pub register_id: i64,
    /// Amount withdrawn, always positive
    pub amount: f64,
    /// Why the cash was taken
    pub reason: String,
    /// Who took it
    pub withdrawn_by: String,
    /// When it was taken
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `CashWithdrawal` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each withdrawal belongs to one register
    #[sea_orm(
        belongs_to = "super::cash_register::Entity",
        from = "Column::RegisterId",
        to = "super::cash_register::Column::Id"
    )]
    CashRegister,
}

impl Related<super::cash_register::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashRegister.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
