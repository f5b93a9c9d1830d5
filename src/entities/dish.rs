//! Dish entity - A sellable menu item.
//!
//! A dish owns zero or more recipe rows describing which inventory items one serving
//! consumes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dish database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dishes")]
pub struct Model {
    /// Unique identifier for the dish
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Menu name
    pub name: String,
    /// Free-form menu description
    pub description: String,
    /// Price per serving
    pub price: f64,
    /// Menu category, if any
    pub category_id: Option<i64>,
    /// Whether the dish can currently be sold
    pub is_available: bool,
    /// When the dish was created
    pub created_at: DateTime,
    /// When the dish was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Dish and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One dish has many recipe entries
    #[sea_orm(has_many = "super::recipe_item::Entity")]
    RecipeItems,
}

impl Related<super::recipe_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
