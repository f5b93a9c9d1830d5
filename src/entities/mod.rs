//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cash_register;
pub mod cash_withdrawal;
pub mod category;
pub mod dish;
pub mod inventory_item;
pub mod order;
pub mod order_line;
pub mod processed_sale;
pub mod recipe_item;
pub mod waste_record;

// Re-export specific types to avoid conflicts
pub use cash_register::{
    Column as CashRegisterColumn, Entity as CashRegister, Model as CashRegisterModel,
};
pub use cash_withdrawal::{
    Column as CashWithdrawalColumn, Entity as CashWithdrawal, Model as CashWithdrawalModel,
};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use dish::{Column as DishColumn, Entity as Dish, Model as DishModel};
pub use inventory_item::{
    Column as InventoryItemColumn, Entity as InventoryItem, Model as InventoryItemModel,
};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_line::{Column as OrderLineColumn, Entity as OrderLine, Model as OrderLineModel};
pub use processed_sale::{Entity as ProcessedSale, Model as ProcessedSaleModel};
pub use recipe_item::{Column as RecipeItemColumn, Entity as RecipeItem, Model as RecipeItemModel};
pub use waste_record::{Column as WasteRecordColumn, Entity as WasteRecord, Model as WasteRecordModel};
