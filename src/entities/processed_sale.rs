//! Processed sale entity - Marks an order whose stock has already been deducted.
//! Written in the same transaction as the stock updates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Processed sale database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "processed_sales")]
pub struct Model {
    /// The order whose deduction was committed
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: i64,
    /// When the deduction was committed
    pub processed_at: DateTimeUtc,
}

/// `ProcessedSale` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
