/// Catalog (inventory and menu) loading and seeding from catalog.toml
pub mod catalog;

/// Database configuration and connection management
pub mod database;
