//! Unified error types for stockpot.

use thiserror::Error;

/// Every error the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or input text
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Any failure reported by the backing store, including aborted transactions
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A price, stock or recipe amount outside its allowed range, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A cart quantity below one
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: u32,
    },

    /// Stored text that does not map to a known enum value
    #[error("Invalid {field}: '{value}'")]
    InvalidValue {
        /// Which field failed to parse
        field: &'static str,
        /// The raw text
        value: String,
    },

    /// Checkout attempted with no cart lines
    #[error("Cart is empty")]
    EmptyCart,

    /// No dish with this ID
    #[error("Dish not found: {id}")]
    DishNotFound {
        /// Dish ID
        id: i64,
    },

    /// No menu category with this ID
    #[error("Category not found: {id}")]
    CategoryNotFound {
        /// Category ID
        id: i64,
    },

    /// No inventory item with this ID
    #[error("Inventory item not found: {id}")]
    InventoryItemNotFound {
        /// Inventory item ID
        id: i64,
    },

    /// No order with this ID
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Order ID
        id: i64,
    },

    /// Stock for this order was already deducted
    #[error("Inventory already deducted for order {order_id}")]
    SaleAlreadyProcessed {
        /// The order that was replayed
        order_id: i64,
    },

    /// No cash register with this ID
    #[error("Cash register not found: {id}")]
    CashRegisterNotFound {
        /// Register ID
        id: i64,
    },

    /// A register is already open; only one drawer can be open at a time
    #[error("Cash register {id} is already open")]
    CashRegisterAlreadyOpen {
        /// The register that is open
        id: i64,
    },

    /// The register was closed and accepts no more movements
    #[error("Cash register {id} is closed")]
    CashRegisterClosed {
        /// Register ID
        id: i64,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
