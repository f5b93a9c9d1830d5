//! Inventory item entity - A tracked ingredient with its quantity on hand.
//!
//! `current_stock` has no floor: sales may drive it negative, which signals a
//! discrepancy to be fixed by a manual recount. `min_stock` is advisory only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    /// Unique identifier, referenced by recipe entries as the ingredient ID
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Tomato", "Olive oil")
    pub name: String,
    /// Stock unit: `"kg"`, `"lt"` or `"unit"`
    pub unit: String,
    /// Quantity on hand, may be negative
    pub current_stock: f64,
    /// Low-stock threshold
    pub min_stock: f64,
    /// Cost per unit
    pub cost: f64,
    /// When the item was created
    pub created_at: DateTime,
    /// When the stock or details last changed
    pub updated_at: DateTime,
}

/// Recipe entries point at inventory items without a foreign key, so an item can be
/// deleted while dishes still reference it.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
