//! Order entity - A paid checkout and its kitchen ticket state.
//!
//! Orders are written before any stock is touched. `inventory_status` records whether
//! the matching stock deduction landed, so failed ones can be reconciled later.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier, also the dedup key for stock deduction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Table label, e.g. `"5"` or `"POS-WalkIn"`
    pub table_number: String,
    /// Kitchen status: `"pending"`, `"cooking"`, `"ready"` or `"delivered"`
    pub status: String,
    /// `"cash"` or `"card"`
    pub payment_method: String,
    /// Sum of line price snapshots times quantities
    pub total: f64,
    /// Stock deduction state: `"pending"`, `"applied"` or `"failed"`
    pub inventory_status: String,
    /// When the order was placed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many lines
    #[sea_orm(has_many = "super::order_line::Entity")]
    Lines,
}

impl Related<super::order_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
