//! Sale orchestration - ties a completed checkout to inventory deduction.
//!
//! The order is always persisted first. Stock is deducted afterwards in a separate
//! transaction, and a failure there never cancels the sale: it is logged, recorded on
//! the order as `failed`, and handed back so an operator can reconcile the stock.
//!
//! [`process_sale`] has no replay protection: calling it twice with the same cart
//! deducts twice. [`process_sale_once`] keys the deduction on the order ID and refuses
//! to run a second time; [`checkout`] and [`retry_inventory_sync`] use it.

use crate::{
    core::{
        order::{self, InventoryStatus, PaymentMethod},
        recipe::{self, CartLine, DeductionMap},
        stock::{self, DeductionOutcome},
    },
    entities::OrderModel,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Result of deducting stock for one sale.
#[derive(Clone, Debug, PartialEq)]
pub struct SaleReport {
    /// Order the deduction was keyed on, if any
    pub order_id: Option<i64>,
    /// Aggregated quantities requested per ingredient
    pub deductions: DeductionMap,
    /// What happened to each ingredient
    pub outcomes: Vec<DeductionOutcome>,
}

impl SaleReport {
    /// Ingredients referenced by a recipe but missing from the inventory.
    #[must_use]
    pub fn skipped_ingredient_ids(&self) -> Vec<i64> {
        self.outcomes
            .iter()
            .filter(|o| o.is_skipped())
            .map(DeductionOutcome::ingredient_id)
            .collect()
    }
}

/// A committed order plus the outcome of its stock deduction.
#[derive(Debug)]
pub struct Checkout {
    /// The persisted order, with its inventory status already updated
    pub order: OrderModel,
    /// `Err` means the sale stands but stock needs manual reconciliation
    pub inventory: Result<SaleReport>,
}

/// Deducts the ingredients consumed by `cart`, with no replay protection.
///
/// Must be called after the order has been durably persisted.
///
/// # Errors
/// Returns the store's error if the stock transaction is aborted; no stock has changed
/// in that case. The caller must not roll back the sale.
#[instrument(skip(db, cart), fields(lines = cart.len()))]
pub async fn process_sale(db: &DatabaseConnection, cart: &[CartLine]) -> Result<SaleReport> {
    let deductions = recipe::aggregate(cart);
    match stock::apply_deductions(db, &deductions).await {
        Ok(update) => Ok(SaleReport {
            order_id: None,
            deductions,
            outcomes: update.outcomes,
        }),
        Err(e) => {
            error!("Error updating inventory for sale: {}", e);
            Err(e)
        }
    }
}

/// Deducts the ingredients consumed by `cart` at most once for `order_id`.
///
/// # Errors
/// Returns [`Error::SaleAlreadyProcessed`] if stock for this order was already
/// deducted, or the store's error if the transaction is aborted.
#[instrument(skip(db, cart), fields(lines = cart.len()))]
pub async fn process_sale_once(
    db: &DatabaseConnection,
    order_id: i64,
    cart: &[CartLine],
) -> Result<SaleReport> {
    let deductions = recipe::aggregate(cart);
    match stock::apply_deductions_for_order(db, order_id, &deductions).await {
        Ok(update) => Ok(SaleReport {
            order_id: Some(order_id),
            deductions,
            outcomes: update.outcomes,
        }),
        Err(e) => {
            error!(order_id, "Error updating inventory for order: {}", e);
            Err(e)
        }
    }
}

async fn record_inventory_outcome(
    db: &DatabaseConnection,
    order: OrderModel,
    inventory: &Result<SaleReport>,
) -> OrderModel {
    let status = match inventory {
        // Already deducted by an earlier attempt
        Ok(_) | Err(Error::SaleAlreadyProcessed { .. }) => InventoryStatus::Applied,
        Err(_) => InventoryStatus::Failed,
    };
    match order::set_inventory_status(db, order.id, status).await {
        Ok(updated) => updated,
        Err(e) => {
            warn!(
                order_id = order.id,
                "Could not record inventory status '{}': {}", status, e
            );
            order
        }
    }
}

/// The POS checkout: persists the order, then deducts its stock.
///
/// # Errors
/// Only errors that prevent the order itself from being saved are returned here
/// (e.g. [`Error::EmptyCart`]). Inventory failures come back inside
/// [`Checkout::inventory`] with the order already committed.
pub async fn checkout(
    db: &DatabaseConnection,
    table_number: &str,
    payment_method: PaymentMethod,
    cart: &[CartLine],
) -> Result<Checkout> {
    let order = order::create_order(db, table_number, payment_method, cart).await?;

    let inventory = process_sale_once(db, order.id, cart).await;
    if inventory.is_err() {
        warn!(
            order_id = order.id,
            "Sale recorded but inventory was not updated; manual reconciliation required."
        );
    }
    let order = record_inventory_outcome(db, order, &inventory).await;

    Ok(Checkout { order, inventory })
}

/// Re-runs the stock deduction for a persisted order.
///
/// The cart is rebuilt from the order's lines and the dishes' current recipes. Lines
/// whose dish no longer exists are skipped. Safe to call repeatedly: once stock has been
/// deducted for the order, further calls return [`Error::SaleAlreadyProcessed`].
///
/// Orders already marked `applied` are refused without looking at recipes. A sale of
/// dishes that had no recipe at checkout time leaves no deduction marker, and must not
/// pick up ingredients added to those dishes later.
///
/// # Errors
/// Returns [`Error::OrderNotFound`] for an unknown order,
/// [`Error::SaleAlreadyProcessed`] for an order whose inventory is already applied, or
/// the inventory error.
pub async fn retry_inventory_sync(db: &DatabaseConnection, order_id: i64) -> Result<SaleReport> {
    let order = order::get_order(db, order_id)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    if order.inventory_status == InventoryStatus::Applied.as_str() {
        info!(order_id, "Inventory already applied for order, nothing to retry.");
        return Err(Error::SaleAlreadyProcessed { order_id });
    }

    let mut cart = Vec::new();
    for line in order::get_order_lines(db, order_id).await? {
        let Some(dish) = crate::core::menu::get_dish(db, line.dish_id).await? else {
            warn!(
                order_id,
                dish_id = line.dish_id,
                "Dish no longer exists, skipping its ingredients."
            );
            continue;
        };
        let quantity = u32::try_from(line.quantity).map_err(|_| Error::Config {
            message: format!("Order line {} has invalid quantity {}", line.id, line.quantity),
        })?;
        cart.push(CartLine::new(dish, quantity)?);
    }

    let inventory = process_sale_once(db, order_id, &cart).await;
    record_inventory_outcome(db, order, &inventory).await;
    if inventory.is_ok() {
        info!(order_id, "Inventory reconciled for order.");
    }
    inventory
}
