//! Cash drawer - Opening float, mid-shift withdrawals, and the closing count.
//!
//! Only one register can be open at a time. While it is open, cash sales flow into it
//! and withdrawals flow out; [`expected_cash`] says what the drawer should hold.

use crate::{
    core::order::PaymentMethod,
    entities::{CashRegister, CashWithdrawal, Order, cash_register, cash_withdrawal, order},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// Whether a register accepts movements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterStatus {
    /// Shift in progress
    Open,
    /// Counted and closed
    Closed,
}

text_enum!(RegisterStatus, "register status", {
    Open => "open",
    Closed => "closed",
});

fn ensure_amount(amount: f64, allow_zero: bool) -> Result<()> {
    let in_range = if allow_zero { amount >= 0.0 } else { amount > 0.0 };
    if amount.is_finite() && in_range {
        Ok(())
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

async fn find_open<C>(db: &C) -> Result<Option<cash_register::Model>>
where
    C: ConnectionTrait,
{
    CashRegister::find()
        .filter(cash_register::Column::Status.eq(RegisterStatus::Open.as_str()))
        .order_by_desc(cash_register::Column::OpenedAt)
        .order_by_desc(cash_register::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn find_register<C>(db: &C, register_id: i64) -> Result<cash_register::Model>
where
    C: ConnectionTrait,
{
    CashRegister::find_by_id(register_id)
        .one(db)
        .await?
        .ok_or(Error::CashRegisterNotFound { id: register_id })
}

/// Opens a register with `initial_fund` in the drawer.
///
/// # Errors
/// Returns [`Error::CashRegisterAlreadyOpen`] if another register is open, or
/// [`Error::InvalidAmount`] for a negative or non-finite fund.
pub async fn open_cash_register(
    db: &DatabaseConnection,
    opened_by: &str,
    initial_fund: f64,
) -> Result<cash_register::Model> {
    ensure_amount(initial_fund, true)?;

    let txn = db.begin().await?;
    if let Some(open) = find_open(&txn).await? {
        return Err(Error::CashRegisterAlreadyOpen { id: open.id });
    }

    let register = cash_register::ActiveModel {
        opened_by: Set(opened_by.to_string()),
        initial_fund: Set(initial_fund),
        opened_at: Set(chrono::Utc::now()),
        status: Set(RegisterStatus::Open.as_str().to_string()),
        closed_at: Set(None),
        closed_by: Set(None),
        final_amount: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(register_id = register.id, initial_fund, "Cash register opened.");
    Ok(register)
}

/// The register currently open, if any.
pub async fn get_open_cash_register(
    db: &DatabaseConnection,
) -> Result<Option<cash_register::Model>> {
    find_open(db).await
}

/// Takes `amount` out of an open register.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] unless `amount` is positive,
/// [`Error::CashRegisterNotFound`] for an unknown register, or
/// [`Error::CashRegisterClosed`] once it has been closed.
pub async fn add_withdrawal(
    db: &DatabaseConnection,
    register_id: i64,
    amount: f64,
    reason: &str,
    withdrawn_by: &str,
) -> Result<cash_withdrawal::Model> {
    ensure_amount(amount, false)?;

    let txn = db.begin().await?;
    let register = find_register(&txn, register_id).await?;
    if register.status != RegisterStatus::Open.as_str() {
        return Err(Error::CashRegisterClosed { id: register_id });
    }

    let withdrawal = cash_withdrawal::ActiveModel {
        register_id: Set(register_id),
        amount: Set(amount),
        reason: Set(reason.to_string()),
        withdrawn_by: Set(withdrawn_by.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(register_id, amount, "Cash withdrawn from register.");
    Ok(withdrawal)
}

/// Withdrawals from a register, newest first.
pub async fn get_withdrawals(
    db: &DatabaseConnection,
    register_id: i64,
) -> Result<Vec<cash_withdrawal::Model>> {
    CashWithdrawal::find()
        .filter(cash_withdrawal::Column::RegisterId.eq(register_id))
        .order_by_desc(cash_withdrawal::Column::CreatedAt)
        .order_by_desc(cash_withdrawal::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// What the drawer should hold: the float, plus cash sales taken while the register was
/// open, minus withdrawals.
pub async fn expected_cash(db: &DatabaseConnection, register_id: i64) -> Result<f64> {
    let register = find_register(db, register_id).await?;

    let mut sales = Order::find()
        .filter(order::Column::PaymentMethod.eq(PaymentMethod::Cash.as_str()))
        .filter(order::Column::CreatedAt.gte(register.opened_at));
    if let Some(closed_at) = register.closed_at {
        sales = sales.filter(order::Column::CreatedAt.lte(closed_at));
    }
    let cash_sales: f64 = sales.all(db).await?.iter().map(|o| o.total).sum();

    let withdrawn: f64 = get_withdrawals(db, register_id)
        .await?
        .iter()
        .map(|w| w.amount)
        .sum();

    Ok(register.initial_fund + cash_sales - withdrawn)
}

/// Closes a register with the counted `final_amount`.
///
/// A count that differs from [`expected_cash`] is logged, not rejected.
///
/// # Errors
/// Returns [`Error::CashRegisterNotFound`], [`Error::CashRegisterClosed`] if it was
/// already closed, or [`Error::InvalidAmount`] for a negative or non-finite count.
pub async fn close_cash_register(
    db: &DatabaseConnection,
    register_id: i64,
    closed_by: &str,
    final_amount: f64,
) -> Result<cash_register::Model> {
    ensure_amount(final_amount, true)?;

    let register = find_register(db, register_id).await?;
    if register.status != RegisterStatus::Open.as_str() {
        return Err(Error::CashRegisterClosed { id: register_id });
    }

    let mut active: cash_register::ActiveModel = register.into();
    active.status = Set(RegisterStatus::Closed.as_str().to_string());
    active.closed_at = Set(Some(chrono::Utc::now()));
    active.closed_by = Set(Some(closed_by.to_string()));
    active.final_amount = Set(Some(final_amount));
    let closed = active.update(db).await?;

    let expected = expected_cash(db, register_id).await?;
    if (expected - final_amount).abs() > 0.005 {
        warn!(
            register_id,
            expected, final_amount, "Cash count does not match the expected amount."
        );
    }
    info!(register_id, final_amount, "Cash register closed.");
    Ok(closed)
}
