//! Order business logic - Persists paid checkouts and tracks their kitchen ticket.
//!
//! An order is committed on its own, before any stock is touched. Its
//! `inventory_status` tells operators whether the matching stock deduction landed.

use crate::{
    core::recipe::CartLine,
    entities::{Order, OrderLine, order, order_line},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Kitchen ticket progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    /// Waiting for the kitchen
    Pending,
    /// Being prepared
    Cooking,
    /// Ready to serve
    Ready,
    /// Served
    Delivered,
}

text_enum!(OrderStatus, "order status", {
    Pending => "pending",
    Cooking => "cooking",
    Ready => "ready",
    Delivered => "delivered",
});

/// How the order was paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Paid in cash
    Cash,
    /// Paid by card
    Card,
}

text_enum!(PaymentMethod, "payment method", {
    Cash => "cash",
    Card => "card",
});

/// Whether the stock deduction for an order has landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InventoryStatus {
    /// Not attempted yet, or interrupted before its outcome was recorded
    Pending,
    /// Stock was deducted
    Applied,
    /// The stock transaction failed; needs reconciliation
    Failed,
}

text_enum!(InventoryStatus, "inventory status", {
    Pending => "pending",
    Applied => "applied",
    Failed => "failed",
});

/// Persists an order and its lines in one transaction.
///
/// The order starts as `pending` in the kitchen and `pending` for inventory.
///
/// # Errors
/// Returns [`Error::EmptyCart`] for an empty cart, or a database error if the insert fails.
pub async fn create_order(
    db: &DatabaseConnection,
    table_number: &str,
    payment_method: PaymentMethod,
    cart: &[CartLine],
) -> Result<order::Model> {
    if cart.is_empty() {
        return Err(Error::EmptyCart);
    }

    let total: f64 = cart.iter().map(CartLine::subtotal).sum();

    let txn = db.begin().await?;

    let order = order::ActiveModel {
        table_number: Set(table_number.to_string()),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        payment_method: Set(payment_method.as_str().to_string()),
        total: Set(total),
        inventory_status: Set(InventoryStatus::Pending.as_str().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let lines = cart.iter().map(|line| order_line::ActiveModel {
        order_id: Set(order.id),
        dish_id: Set(line.dish().id),
        name: Set(line.dish().name.clone()),
        quantity: Set(i64::from(line.quantity())),
        price: Set(line.dish().price),
        ..Default::default()
    });
    OrderLine::insert_many(lines).exec(&txn).await?;

    txn.commit().await?;

    info!(order_id = order.id, total, "Order created.");
    Ok(order)
}

/// Finds an order by ID.
pub async fn get_order(db: &DatabaseConnection, order_id: i64) -> Result<Option<order::Model>> {
    Order::find_by_id(order_id).one(db).await.map_err(Into::into)
}

/// Lines of an order, in the order they were rung up.
pub async fn get_order_lines(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<order_line::Model>> {
    OrderLine::find()
        .filter(order_line::Column::OrderId.eq(order_id))
        .order_by_asc(order_line::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All orders, newest first.
pub async fn list_orders(db: &DatabaseConnection) -> Result<Vec<order::Model>> {
    Order::find()
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn update_order<F>(db: &DatabaseConnection, order_id: i64, change: F) -> Result<order::Model>
where
    F: FnOnce(&mut order::ActiveModel),
{
    let model = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;
    let mut active: order::ActiveModel = model.into();
    change(&mut active);
    active.update(db).await.map_err(Into::into)
}

/// Moves an order's kitchen ticket to `status`.
pub async fn update_order_status(
    db: &DatabaseConnection,
    order_id: i64,
    status: OrderStatus,
) -> Result<order::Model> {
    update_order(db, order_id, |active| {
        active.status = Set(status.as_str().to_string());
    })
    .await
}

/// Records the outcome of an order's stock deduction.
pub async fn set_inventory_status(
    db: &DatabaseConnection,
    order_id: i64,
    status: InventoryStatus,
) -> Result<order::Model> {
    update_order(db, order_id, |active| {
        active.inventory_status = Set(status.as_str().to_string());
    })
    .await
}

/// Orders whose stock deduction failed or never recorded an outcome, oldest first.
pub async fn get_orders_needing_reconciliation(
    db: &DatabaseConnection,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(
            Condition::any()
                .add(order::Column::InventoryStatus.eq(InventoryStatus::Failed.as_str()))
                .add(order::Column::InventoryStatus.eq(InventoryStatus::Pending.as_str())),
        )
        .order_by_asc(order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
