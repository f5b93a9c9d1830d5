//! Database configuration module for stockpot.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{
    CashRegister, CashWithdrawal, Category, Dish, InventoryItem, Order, OrderLine,
    ProcessedSale, RecipeItem, WasteRecord,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://stockpot.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns the
/// default local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every table that does not exist yet.
///
/// Parents are created before children so foreign keys resolve: dishes before recipe
/// items, orders before order lines, registers before withdrawals.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, InventoryItem).await?;
    create_table(db, Category).await?;
    create_table(db, Dish).await?;
    create_table(db, RecipeItem).await?;
    create_table(db, Order).await?;
    create_table(db, OrderLine).await?;
    create_table(db, ProcessedSale).await?;
    create_table(db, WasteRecord).await?;
    create_table(db, CashRegister).await?;
    create_table(db, CashWithdrawal).await?;
    info!("Database tables ensured.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        CashRegisterModel, CashWithdrawalModel, CategoryModel, DishModel, InventoryItemModel,
        OrderLineModel, OrderModel, ProcessedSaleModel, RecipeItemModel, WasteRecordModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<InventoryItemModel> = InventoryItem::find().limit(1).all(&db).await?;
        let _: Vec<DishModel> = Dish::find().limit(1).all(&db).await?;
        let _: Vec<RecipeItemModel> = RecipeItem::find().limit(1).all(&db).await?;
        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;
        let _: Vec<OrderLineModel> = OrderLine::find().limit(1).all(&db).await?;
        let _: Vec<ProcessedSaleModel> = ProcessedSale::find().limit(1).all(&db).await?;
        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<WasteRecordModel> = WasteRecord::find().limit(1).all(&db).await?;
        let _: Vec<CashRegisterModel> = CashRegister::find().limit(1).all(&db).await?;
        let _: Vec<CashWithdrawalModel> = CashWithdrawal::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
