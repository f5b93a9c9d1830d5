//! Inventory business logic - Handles manual inventory operations.
//!
//! This module covers the back-office side of the inventory: creating items, listing
//! them, manual recounts and quick +/- adjustments, and the low-stock report. Sale-driven
//! deductions do not go through here; they are applied transactionally by
//! [`crate::core::stock`].

use crate::{
    entities::{InventoryItem, inventory_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use std::{fmt, str::FromStr};
use tracing::{info, warn};

/// Unit an inventory item is counted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockUnit {
    /// Kilograms
    Kg,
    /// Litres
    Lt,
    /// Individual pieces
    Unit,
}

impl StockUnit {
    /// Text stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lt => "lt",
            Self::Unit => "unit",
        }
    }
}

impl fmt::Display for StockUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" => Ok(Self::Kg),
            "lt" => Ok(Self::Lt),
            "unit" => Ok(Self::Unit),
            _ => Err(Error::InvalidValue {
                field: "unit",
                value: s.to_string(),
            }),
        }
    }
}

fn ensure_finite(amount: f64) -> Result<()> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

fn ensure_non_negative(amount: f64) -> Result<()> {
    ensure_finite(amount)?;
    if amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Creates a new inventory item.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - `current_stock` is not finite
/// - `min_stock` or `cost` is negative or not finite
/// - The database insert fails
pub async fn create_inventory_item(
    db: &DatabaseConnection,
    name: String,
    unit: StockUnit,
    current_stock: f64,
    min_stock: f64,
    cost: f64,
) -> Result<inventory_item::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Inventory item name cannot be empty".to_string(),
        });
    }
    ensure_finite(current_stock)?;
    ensure_non_negative(min_stock)?;
    ensure_non_negative(cost)?;

    let now = chrono::Utc::now().naive_utc();
    let item = inventory_item::ActiveModel {
        name: Set(name.trim().to_string()),
        unit: Set(unit.as_str().to_string()),
        current_stock: Set(current_stock),
        min_stock: Set(min_stock),
        cost: Set(cost),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    item.insert(db).await.map_err(Into::into)
}

/// Retrieves every inventory item, ordered alphabetically by name.
pub async fn get_inventory(db: &DatabaseConnection) -> Result<Vec<inventory_item::Model>> {
    InventoryItem::find()
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an inventory item by ID.
pub async fn get_inventory_item_by_id(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<Option<inventory_item::Model>> {
    InventoryItem::find_by_id(item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Overwrites the stock of an item after a manual recount.
///
/// This is a plain single-row write, not part of any sale transaction.
pub async fn set_stock(
    db: &DatabaseConnection,
    item_id: i64,
    new_stock: f64,
) -> Result<inventory_item::Model> {
    ensure_finite(new_stock)?;

    let item = InventoryItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::InventoryItemNotFound { id: item_id })?;

    let previous_stock = item.current_stock;
    let mut active: inventory_item::ActiveModel = item.into();
    active.current_stock = Set(new_stock);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(db).await?;

    info!(
        item_id,
        previous_stock, new_stock, "Stock set by manual recount."
    );
    Ok(updated)
}

/// Adds `delta` to an item's stock with a single `UPDATE ... SET current_stock =
/// current_stock + delta`, so concurrent adjustments are never lost.
pub async fn adjust_stock<C>(db: &C, item_id: i64, delta: f64) -> Result<inventory_item::Model>
where
    C: ConnectionTrait,
{
    ensure_finite(delta)?;

    let result = InventoryItem::update_many()
        .col_expr(
            inventory_item::Column::CurrentStock,
            Expr::col(inventory_item::Column::CurrentStock).add(delta),
        )
        .col_expr(
            inventory_item::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(inventory_item::Column::Id.eq(item_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::InventoryItemNotFound { id: item_id });
    }

    InventoryItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::InventoryItemNotFound { id: item_id })
}

/// Deletes an inventory item.
///
/// Recipes that still reference it are left untouched; later sales skip it.
pub async fn delete_inventory_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let result = InventoryItem::delete_by_id(item_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::InventoryItemNotFound { id: item_id });
    }
    warn!(item_id, "Inventory item deleted; recipes referencing it will be skipped at sale time.");
    Ok(())
}

/// Items whose stock has fallen below their minimum, ordered by name.
pub async fn get_low_stock_items(db: &DatabaseConnection) -> Result<Vec<inventory_item::Model>> {
    InventoryItem::find()
        .filter(
            Expr::col(inventory_item::Column::CurrentStock)
                .lt(Expr::col(inventory_item::Column::MinStock)),
        )
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Formats a low-stock report, one line per item.
#[must_use]
pub fn format_low_stock_report(items: &[inventory_item::Model]) -> String {
    use std::fmt::Write;

    if items.is_empty() {
        return "All inventory items are above their minimum stock.".to_string();
    }

    let mut report = format!("{} item(s) below minimum stock:\n", items.len());
    for item in items {
        let _ = writeln!(
            report,
            "  {}: {:.2} {} (min {:.2})",
            item.name, item.current_stock, item.unit, item.min_stock
        );
    }
    report
}
