//! Cash register entity - One shift of the cash drawer, from opening float to close.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cash register database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_registers")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Who opened the drawer
    pub opened_by: String,
    /// Float placed in the drawer at opening
    pub initial_fund: f64,
    /// When the drawer was opened
    pub opened_at: DateTimeUtc,
    /// `"open"` or `"closed"`
    pub status: String,
    /// When the drawer was closed
    pub closed_at: Option<DateTimeUtc>,
    /// Who closed the drawer
    pub closed_by: Option<String>,
    /// Cash counted at close
    pub final_amount: Option<f64>,
}

/// Defines relationships between `CashRegister` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One register has many withdrawals
    #[sea_orm(has_many = "super::cash_withdrawal::Entity")]
    Withdrawals,
}

impl Related<super::cash_withdrawal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Withdrawals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
