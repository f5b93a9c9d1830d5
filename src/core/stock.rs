//! Transactional stock updates driven by sales.
//!
//! A [`DeductionMap`] is applied inside a single database transaction: every affected
//! inventory row is read first, then every write is staged, then the whole set is
//! committed. If anything fails before the commit, the transaction is dropped and no
//! stock change becomes visible.
//!
//! Ingredients that no longer exist are skipped and reported as
//! [`DeductionOutcome::SkippedMissing`]; they never abort the sale. Stock is not clamped
//! at zero.

use crate::{
    core::recipe::DeductionMap,
    entities::{InventoryItem, ProcessedSale, inventory_item, processed_sale},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// What happened to one ingredient of a sale.
#[derive(Clone, Debug, PartialEq)]
pub enum DeductionOutcome {
    /// Stock was reduced
    Applied {
        /// Inventory item ID
        ingredient_id: i64,
        /// Stock read inside the transaction
        previous_stock: f64,
        /// Amount subtracted
        deducted: f64,
        /// Stock after the commit; may be negative
        new_stock: f64,
    },
    /// The ingredient was not found and was left alone
    SkippedMissing {
        /// Inventory item ID referenced by a recipe
        ingredient_id: i64,
        /// Amount that would have been subtracted
        deduction: f64,
    },
}

impl DeductionOutcome {
    /// The ingredient this outcome refers to.
    #[must_use]
    pub const fn ingredient_id(&self) -> i64 {
        match self {
            Self::Applied { ingredient_id, .. } | Self::SkippedMissing { ingredient_id, .. } => {
                *ingredient_id
            }
        }
    }

    /// True for [`DeductionOutcome::SkippedMissing`].
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::SkippedMissing { .. })
    }
}

/// Per-ingredient outcomes of one committed stock update, ascending by ingredient ID.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StockUpdate {
    /// One entry per ingredient in the deduction map
    pub outcomes: Vec<DeductionOutcome>,
}

impl StockUpdate {
    /// Number of ingredients whose stock changed.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_skipped()).count()
    }

    /// IDs of ingredients that were missing from the inventory.
    #[must_use]
    pub fn skipped_ingredient_ids(&self) -> Vec<i64> {
        self.outcomes
            .iter()
            .filter(|o| o.is_skipped())
            .map(DeductionOutcome::ingredient_id)
            .collect()
    }

    /// Outcome for one ingredient, if the update touched it.
    #[must_use]
    pub fn outcome_for(&self, ingredient_id: i64) -> Option<&DeductionOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.ingredient_id() == ingredient_id)
    }
}

/// Applies `deductions` atomically, with no protection against replays.
///
/// An empty map succeeds immediately without opening a transaction.
///
/// # Errors
/// Returns [`Error::Database`] if the store aborts the transaction; in that case no
/// stock has changed.
pub async fn apply_deductions(
    db: &DatabaseConnection,
    deductions: &DeductionMap,
) -> Result<StockUpdate> {
    apply(db, None, deductions).await
}

/// Applies `deductions` atomically and records `order_id` as processed in the same
/// transaction.
///
/// # Errors
/// Returns [`Error::SaleAlreadyProcessed`] if the order was already deducted, or
/// [`Error::Database`] if the store aborts the transaction. Either way nothing changes.
pub async fn apply_deductions_for_order(
    db: &DatabaseConnection,
    order_id: i64,
    deductions: &DeductionMap,
) -> Result<StockUpdate> {
    apply(db, Some(order_id), deductions).await
}

/// Whether stock for `order_id` has already been deducted.
pub async fn is_order_processed<C>(db: &C, order_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(ProcessedSale::find_by_id(order_id).one(db).await?.is_some())
}

#[instrument(skip(db, deductions), fields(ingredients = deductions.len()))]
async fn apply(
    db: &DatabaseConnection,
    order_id: Option<i64>,
    deductions: &DeductionMap,
) -> Result<StockUpdate> {
    if deductions.is_empty() {
        debug!("No tracked ingredients in sale, skipping stock transaction.");
        return Ok(StockUpdate::default());
    }

    let txn = db.begin().await?;

    // Read phase: nothing below is written until every read has completed.
    if let Some(order_id) = order_id {
        if is_order_processed(&txn, order_id).await? {
            return Err(Error::SaleAlreadyProcessed { order_id });
        }
    }

    let current_stock: HashMap<i64, f64> = InventoryItem::find()
        .filter(inventory_item::Column::Id.is_in(deductions.ingredient_ids()))
        .all(&txn)
        .await?
        .into_iter()
        .map(|item| (item.id, item.current_stock))
        .collect();

    // Write phase
    let now = chrono::Utc::now();
    let mut outcomes = Vec::with_capacity(deductions.len());
    for (ingredient_id, deduction) in deductions.iter() {
        let Some(&previous_stock) = current_stock.get(&ingredient_id) else {
            warn!(
                ingredient_id,
                deduction, "Ingredient not found in inventory, skipping deduction."
            );
            outcomes.push(DeductionOutcome::SkippedMissing {
                ingredient_id,
                deduction,
            });
            continue;
        };

        InventoryItem::update_many()
            .col_expr(
                inventory_item::Column::CurrentStock,
                Expr::col(inventory_item::Column::CurrentStock).sub(deduction),
            )
            .col_expr(
                inventory_item::Column::UpdatedAt,
                Expr::value(now.naive_utc()),
            )
            .filter(inventory_item::Column::Id.eq(ingredient_id))
            .exec(&txn)
            .await?;

        outcomes.push(DeductionOutcome::Applied {
            ingredient_id,
            previous_stock,
            deducted: deduction,
            new_stock: previous_stock - deduction,
        });
    }

    if let Some(order_id) = order_id {
        let marker = processed_sale::ActiveModel {
            order_id: Set(order_id),
            processed_at: Set(now),
        };
        ProcessedSale::insert(marker).exec(&txn).await?;
    }

    txn.commit().await?;

    let update = StockUpdate { outcomes };
    info!(
        applied = update.applied_count(),
        skipped = update.outcomes.len() - update.applied_count(),
        "Inventory updated for sale."
    );
    Ok(update)
}
