//! Recipe item entity - One ingredient requirement of a dish.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recipe item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_items")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Dish this entry belongs to
    pub dish_id: i64,
    /// Inventory item consumed; not enforced, the item may since have been deleted
    pub ingredient_id: i64,
    /// Amount consumed per serving, in the ingredient's stock unit
    pub quantity: f64,
}

/// Defines relationships between `RecipeItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each recipe item belongs to one dish
    #[sea_orm(
        belongs_to = "super::dish::Entity",
        from = "Column::DishId",
        to = "super::dish::Column::Id"
    )]
    Dish,
}

impl Related<super::dish::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dish.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
