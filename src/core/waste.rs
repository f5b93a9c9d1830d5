//! Waste log - Records food thrown away and what it cost.
//!
//! Waste is either `operational` (trimmings, expired product) or an `error` (a dish
//! made wrong, dropped, sent back). Recording waste does not touch inventory stock.

use crate::{
    entities::{WasteRecord, waste_record},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Why food was wasted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WasteType {
    /// Expected loss in normal operation
    Operational,
    /// Loss caused by a mistake
    Error,
}

text_enum!(WasteType, "waste type", {
    Operational => "operational",
    Error => "error",
});

/// A waste entry to be recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct NewWaste {
    /// Operational or error
    pub waste_type: WasteType,
    /// Menu dish wasted, if any
    pub dish_id: Option<i64>,
    /// Name of what was wasted
    pub dish_name: String,
    /// Amount wasted
    pub quantity: f64,
    /// Cost of one unit
    pub unit_cost: f64,
    /// Free-form reason
    pub reason: String,
    /// Who is registering it
    pub registered_by: String,
}

/// Waste cost split by type.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WasteSummary {
    /// Cost of operational waste
    pub operational: f64,
    /// Cost of waste caused by mistakes
    pub error: f64,
    /// `operational + error`
    pub total: f64,
}

/// Records a waste entry; its total cost is `quantity * unit_cost`.
///
/// # Errors
/// Returns an error if the name is empty, the quantity is not positive, the unit cost is
/// negative (either one not finite), or the insert fails.
pub async fn record_waste(
    db: &DatabaseConnection,
    waste: NewWaste,
) -> Result<waste_record::Model> {
    if waste.dish_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Wasted item name cannot be empty".to_string(),
        });
    }
    if !waste.quantity.is_finite() || waste.quantity <= 0.0 {
        return Err(Error::InvalidAmount {
            amount: waste.quantity,
        });
    }
    if !waste.unit_cost.is_finite() || waste.unit_cost < 0.0 {
        return Err(Error::InvalidAmount {
            amount: waste.unit_cost,
        });
    }

    let total_cost = waste.quantity * waste.unit_cost;
    let model = waste_record::ActiveModel {
        waste_type: Set(waste.waste_type.as_str().to_string()),
        dish_id: Set(waste.dish_id),
        dish_name: Set(waste.dish_name.trim().to_string()),
        quantity: Set(waste.quantity),
        unit_cost: Set(waste.unit_cost),
        total_cost: Set(total_cost),
        reason: Set(waste.reason),
        registered_by: Set(waste.registered_by),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        waste_id = model.id,
        waste_type = %waste.waste_type,
        total_cost,
        "Waste recorded."
    );
    Ok(model)
}

/// Waste entries, newest first, optionally limited to `[from, to)`.
pub async fn get_waste(
    db: &DatabaseConnection,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<waste_record::Model>> {
    let mut query = WasteRecord::find();
    if let Some(from) = from {
        query = query.filter(waste_record::Column::CreatedAt.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(waste_record::Column::CreatedAt.lt(to));
    }
    query
        .order_by_desc(waste_record::Column::CreatedAt)
        .order_by_desc(waste_record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Totals every waste entry by type.
///
/// # Errors
/// Returns a database error, or [`Error::InvalidValue`] for a stored type that is
/// neither `operational` nor `error`.
pub async fn get_waste_summary(db: &DatabaseConnection) -> Result<WasteSummary> {
    let mut summary = WasteSummary::default();
    for record in get_waste(db, None, None).await? {
        match record.waste_type.parse::<WasteType>()? {
            WasteType::Operational => summary.operational += record.total_cost,
            WasteType::Error => summary.error += record.total_cost,
        }
    }
    summary.total = summary.operational + summary.error;
    Ok(summary)
}
