//! Waste record entity - Food thrown away, either as part of operations or by mistake.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Waste record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "waste_records")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `"operational"` or `"error"`
    pub waste_type: String,
    /// Dish wasted, if it was a menu item
    pub dish_id: Option<i64>,
    /// Name of what was wasted
    pub dish_name: String,
    /// Amount wasted
    pub quantity: f64,
    /// Cost of one unit
    pub unit_cost: f64,
    /// `quantity * unit_cost`
    pub total_cost: f64,
    /// Why it was wasted
    pub reason: String,
    /// Who registered it
    pub registered_by: String,
    /// When it was registered
    pub created_at: DateTimeUtc,
}

/// `WasteRecord` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
