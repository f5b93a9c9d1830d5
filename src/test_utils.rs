//! Shared test utilities for stockpot.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        inventory::{self, StockUnit},
        menu,
        recipe::{CartLine, Dish, RecipeEntry},
    },
    entities::{InventoryItem, inventory_item},
    errors::{Error, Result},
};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait};
use std::path::{Path, PathBuf};

/// Creates an in-memory `SQLite` database with all tables initialized.
///
/// The pool is pinned to one connection: every connection to `sqlite::memory:` is a
/// separate database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database in the temp directory with a pool of
/// `connections`, so concurrent tasks really run on separate connections.
///
/// Returns the connection and the file path; pass the path to [`remove_file_db`] once
/// the connection is closed.
pub async fn setup_file_db(
    name: &str,
    connections: u32,
) -> Result<(DatabaseConnection, PathBuf)> {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    let path = std::env::temp_dir().join(format!(
        "stockpot-{name}-{}-{nanos}.sqlite",
        std::process::id()
    ));

    let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    options
        .max_connections(connections)
        .min_connections(connections)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((db, path))
}

/// Deletes a database file created by [`setup_file_db`], with any journal files.
pub fn remove_file_db(path: &Path) {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

/// Creates a test ingredient counted in kg.
///
/// # Defaults
/// * `min_stock`: 5.0
/// * `cost`: 1.0
pub async fn create_test_ingredient(
    db: &DatabaseConnection,
    name: &str,
    current_stock: f64,
) -> Result<inventory_item::Model> {
    inventory::create_inventory_item(
        db,
        name.to_string(),
        StockUnit::Kg,
        current_stock,
        5.0,
        1.0,
    )
    .await
}

/// Creates a test dish priced at 10.0 with the given recipe.
pub async fn create_test_dish(
    db: &DatabaseConnection,
    name: &str,
    recipe: Vec<RecipeEntry>,
) -> Result<Dish> {
    menu::create_dish(db, name.to_string(), String::new(), 10.0, None, recipe).await
}

/// Builds a cart from `(dish, quantity)` pairs.
///
/// # Panics
/// Panics if a quantity is zero.
#[allow(clippy::expect_used)]
pub fn cart(lines: Vec<(Dish, u32)>) -> Vec<CartLine> {
    lines
        .into_iter()
        .map(|(dish, quantity)| CartLine::new(dish, quantity).expect("quantity must be >= 1"))
        .collect()
}

/// Reads the current stock of an inventory item.
pub async fn stock_of(db: &DatabaseConnection, item_id: i64) -> Result<f64> {
    InventoryItem::find_by_id(item_id)
        .one(db)
        .await?
        .map(|item| item.current_stock)
        .ok_or(Error::InventoryItemNotFound { id: item_id })
}

/// Makes every stock write to `item_id` fail, the way a store abort would.
pub async fn fail_stock_writes_for(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_stock_write BEFORE UPDATE ON inventory_items \
         WHEN NEW.id = {item_id} \
         BEGIN SELECT RAISE(ABORT, 'simulated write conflict'); END;"
    ))
    .await?;
    Ok(())
}

/// Removes the trigger installed by [`fail_stock_writes_for`].
pub async fn allow_stock_writes(db: &DatabaseConnection) -> Result<()> {
    db.execute_unprepared("DROP TRIGGER IF EXISTS reject_stock_write;")
        .await?;
    Ok(())
}
