//! Catalog loading from catalog.toml
//!
//! The catalog lists the inventory items and the dishes (with recipes) used to seed an
//! empty database. Recipe entries name their ingredient by inventory item name; names
//! are resolved to IDs while seeding. Dishes may name a menu category; categories are
//! created the first time a dish mentions them.

use crate::{
    core::{
        inventory::{self, StockUnit},
        menu,
        recipe::RecipeEntry,
    },
    entities::InventoryItem,
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Deserialize;
use std::{collections::HashMap, path::Path};
use tracing::{debug, info};

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// Inventory items to create
    #[serde(default)]
    pub inventory: Vec<InventoryItemConfig>,
    /// Dishes to create
    #[serde(default)]
    pub dishes: Vec<DishConfig>,
}

/// Configuration for a single inventory item
#[derive(Debug, Deserialize, Clone)]
pub struct InventoryItemConfig {
    /// Item name, referenced by recipes
    pub name: String,
    /// `"kg"`, `"lt"` or `"unit"`
    pub unit: String,
    /// Opening stock
    pub current_stock: f64,
    /// Low-stock threshold
    #[serde(default)]
    pub min_stock: f64,
    /// Cost per unit
    #[serde(default)]
    pub cost: f64,
}

/// Configuration for a single dish
#[derive(Debug, Deserialize, Clone)]
pub struct DishConfig {
    /// Menu name
    pub name: String,
    /// Menu description
    #[serde(default)]
    pub description: String,
    /// Price per serving
    pub price: f64,
    /// Menu category name
    #[serde(default)]
    pub category: Option<String>,
    /// Ingredients per serving; may be omitted
    #[serde(default)]
    pub recipe: Vec<RecipeEntryConfig>,
}

/// Recipe entry referring to an inventory item by name
#[derive(Debug, Deserialize, Clone)]
pub struct RecipeEntryConfig {
    /// Name of an item in `inventory`
    pub ingredient: String,
    /// Amount per serving
    pub quantity: f64,
}

/// Loads the catalog from a TOML file
///
/// # Errors
/// Returns an `Io` error if the file cannot be read, or a `Config` error if it is not
/// valid TOML for a [`Catalog`].
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path_ref = path.as_ref();
    debug!("Loading catalog from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref)?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog file {}: {e}", path_ref.display()),
    })
}

/// Path from `CATALOG_PATH`, defaulting to `catalog.toml`.
#[must_use]
pub fn get_catalog_path() -> String {
    std::env::var("CATALOG_PATH").unwrap_or_else(|_| "catalog.toml".to_string())
}

/// Seeds inventory items and dishes when the inventory is empty.
///
/// Returns `false` without touching anything if the inventory already has items.
///
/// # Errors
/// Returns a `Config` error if a unit is unknown or a recipe names an ingredient that
/// is not in the catalog, or any validation/database error from the inserts.
pub async fn seed_catalog(db: &DatabaseConnection, catalog: &Catalog) -> Result<bool> {
    if InventoryItem::find().count(db).await? > 0 {
        info!("Inventory already populated, skipping catalog seed.");
        return Ok(false);
    }

    let mut ids_by_name = HashMap::new();
    for item in &catalog.inventory {
        let unit: StockUnit = item.unit.parse()?;
        let created = inventory::create_inventory_item(
            db,
            item.name.clone(),
            unit,
            item.current_stock,
            item.min_stock,
            item.cost,
        )
        .await?;
        ids_by_name.insert(created.name.clone(), created.id);
    }

    let mut categories_by_name = HashMap::new();
    for dish in &catalog.dishes {
        let category_id = match dish.category.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                if let Some(&id) = categories_by_name.get(name) {
                    Some(id)
                } else {
                    let id = match menu::get_category_by_name(db, name).await? {
                        Some(existing) => existing.id,
                        None => menu::create_category(db, name).await?.id,
                    };
                    categories_by_name.insert(name.to_string(), id);
                    Some(id)
                }
            }
            _ => None,
        };

        let recipe = dish
            .recipe
            .iter()
            .map(|entry| {
                ids_by_name
                    .get(entry.ingredient.trim())
                    .map(|&id| RecipeEntry::new(id, entry.quantity))
                    .ok_or_else(|| Error::Config {
                        message: format!(
                            "Dish '{}' uses unknown ingredient '{}'",
                            dish.name, entry.ingredient
                        ),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        menu::create_dish(
            db,
            dish.name.clone(),
            dish.description.clone(),
            dish.price,
            category_id,
            recipe,
        )
        .await?;
    }

    info!(
        items = catalog.inventory.len(),
        dishes = catalog.dishes.len(),
        "Catalog seeded."
    );
    Ok(true)
}
