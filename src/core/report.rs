//! Sales reporting - Every persisted order is a sale.
//!
//! Orders are only created once the customer has paid, so the order table doubles as
//! the sales ledger. This module reshapes orders into [`Sale`] values with per-line
//! subtotals and sums revenue by payment method.

use crate::{
    core::order::PaymentMethod,
    entities::{Order, OrderLine, order, order_line},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, prelude::*};
use std::{collections::HashMap, fmt::Write};
use tracing::warn;

/// One line of a sale.
#[derive(Clone, Debug, PartialEq)]
pub struct SaleDetail {
    /// Dish sold
    pub dish_id: i64,
    /// Dish name at the time of sale
    pub name: String,
    /// Servings sold
    pub quantity: i64,
    /// Price per serving at the time of sale
    pub unit_price: f64,
    /// `unit_price * quantity`
    pub subtotal: f64,
}

/// A paid order seen as a sale.
#[derive(Clone, Debug, PartialEq)]
pub struct Sale {
    /// Order ID
    pub order_id: i64,
    /// Table or POS label
    pub table_number: String,
    /// Amount charged
    pub total: f64,
    /// How it was paid
    pub payment_method: PaymentMethod,
    /// When it was paid
    pub timestamp: DateTime<Utc>,
    /// Lines in the order they were rung up
    pub items: Vec<SaleDetail>,
}

/// Revenue totals over a set of sales.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SalesSummary {
    /// Number of sales
    pub sale_count: usize,
    /// Sum of all totals
    pub total_revenue: f64,
    /// Revenue paid in cash
    pub cash_total: f64,
    /// Revenue paid by card
    pub card_total: f64,
}

fn to_detail(line: order_line::Model) -> SaleDetail {
    #[allow(clippy::cast_precision_loss)]
    let subtotal = line.price * line.quantity as f64;
    SaleDetail {
        dish_id: line.dish_id,
        name: line.name,
        quantity: line.quantity,
        unit_price: line.price,
        subtotal,
    }
}

fn payment_method_of(order: &order::Model) -> PaymentMethod {
    order.payment_method.parse().unwrap_or_else(|_| {
        warn!(
            order_id = order.id,
            "Unknown payment method '{}', counting as cash.", order.payment_method
        );
        PaymentMethod::Cash
    })
}

/// Sales paid in `[from, to)`, newest first. Either bound may be left open.
pub async fn get_sales(
    db: &DatabaseConnection,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<Sale>> {
    let mut query = Order::find();
    if let Some(from) = from {
        query = query.filter(order::Column::CreatedAt.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(order::Column::CreatedAt.lt(to));
    }
    let orders = query
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;

    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let mut lines: HashMap<i64, Vec<SaleDetail>> = HashMap::new();
    for line in OrderLine::find()
        .filter(order_line::Column::OrderId.is_in(ids))
        .order_by_asc(order_line::Column::Id)
        .all(db)
        .await?
    {
        lines.entry(line.order_id).or_default().push(to_detail(line));
    }

    Ok(orders
        .into_iter()
        .map(|order| Sale {
            payment_method: payment_method_of(&order),
            items: lines.remove(&order.id).unwrap_or_default(),
            order_id: order.id,
            table_number: order.table_number,
            total: order.total,
            timestamp: order.created_at,
        })
        .collect())
}

/// Adds up revenue by payment method.
#[must_use]
pub fn summarize_sales(sales: &[Sale]) -> SalesSummary {
    sales.iter().fold(SalesSummary::default(), |mut acc, sale| {
        acc.sale_count += 1;
        acc.total_revenue += sale.total;
        match sale.payment_method {
            PaymentMethod::Cash => acc.cash_total += sale.total,
            PaymentMethod::Card => acc.card_total += sale.total,
        }
        acc
    })
}

/// Revenue summary for sales paid in `[from, to)`.
pub async fn get_sales_summary(
    db: &DatabaseConnection,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<SalesSummary> {
    Ok(summarize_sales(&get_sales(db, from, to).await?))
}

/// Renders a summary as a short plain-text block for logs.
#[must_use]
pub fn format_sales_summary(summary: &SalesSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sales: {}", summary.sale_count);
    let _ = writeln!(out, "  Cash: {:.2}", summary.cash_total);
    let _ = writeln!(out, "  Card: {:.2}", summary.card_total);
    let _ = write!(out, "  Total: {:.2}", summary.total_revenue);
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{order::create_order, recipe::CartLine};
    use crate::test_utils::*;

    async fn earliest_sale(db: &DatabaseConnection) -> Result<DateTime<Utc>> {
        let sales = get_sales(db, None, None).await?;
        Ok(sales.iter().map(|s| s.timestamp).min().unwrap())
    }

    #[tokio::test]
    async fn test_get_sales_maps_orders_with_subtotals() -> Result<()> {
        let db = setup_test_db().await?;
        let pasta = create_test_dish(&db, "Pasta", Vec::new()).await?;
        let wine = create_test_dish(&db, "Wine", Vec::new()).await?;

        let first = create_order(
            &db,
            "1",
            PaymentMethod::Cash,
            &cart(vec![(pasta.clone(), 2), (wine, 1)]),
        )
        .await?;
        let second = create_order(&db, "2", PaymentMethod::Card, &cart(vec![(pasta, 1)])).await?;

        let sales = get_sales(&db, None, None).await?;
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].order_id, second.id);
        assert_eq!(sales[0].payment_method, PaymentMethod::Card);
        assert_eq!(sales[1].order_id, first.id);
        assert_eq!(sales[1].total, 30.0);
        assert_eq!(sales[1].items.len(), 2);
        assert_eq!(sales[1].items[0].name, "Pasta");
        assert_eq!(sales[1].items[0].quantity, 2);
        assert_eq!(sales[1].items[0].subtotal, 20.0);
        assert_eq!(sales[1].items[1].subtotal, 10.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_sales_summary_by_payment_method() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(
            get_sales_summary(&db, None, None).await?,
            SalesSummary::default()
        );

        let soup = create_test_dish(&db, "Soup", Vec::new()).await?;
        create_order(&db, "1", PaymentMethod::Cash, &cart(vec![(soup.clone(), 1)])).await?;
        create_order(&db, "2", PaymentMethod::Cash, &cart(vec![(soup.clone(), 2)])).await?;
        let card = create_order(&db, "3", PaymentMethod::Card, &cart(vec![(soup, 3)])).await?;

        let summary = get_sales_summary(&db, None, None).await?;
        assert_eq!(summary.sale_count, 3);
        assert_eq!(summary.cash_total, 30.0);
        assert_eq!(summary.card_total, 30.0);
        assert_eq!(summary.total_revenue, 60.0);

        // Orders rung up in the same instant may share the lower bound
        let later = get_sales_summary(&db, Some(card.created_at), None).await?;
        assert!(later.sale_count >= 1);
        assert_eq!(later.card_total, 30.0);

        let none = get_sales_summary(&db, None, Some(earliest_sale(&db).await?)).await?;
        assert_eq!(none.sale_count, 0);
        Ok(())
    }

    #[test]
    fn test_format_sales_summary() {
        let summary = summarize_sales(&[Sale {
            order_id: 1,
            table_number: "5".to_string(),
            total: 12.5,
            payment_method: PaymentMethod::Card,
            timestamp: Utc::now(),
            items: vec![to_detail(order_line::Model {
                id: 1,
                order_id: 1,
                dish_id: 3,
                name: "Risotto".to_string(),
                quantity: 1,
                price: 12.5,
            })],
        }]);

        let text = format_sales_summary(&summary);
        assert!(text.contains("Sales: 1"));
        assert!(text.contains("Card: 12.50"));
        assert!(text.contains("Total: 12.50"));
    }

    #[test]
    fn test_cart_line_subtotal_matches_sale_detail() -> Result<()> {
        let dish = crate::core::recipe::Dish {
            id: 4,
            name: "Pie".to_string(),
            price: 3.5,
            recipe: Vec::new(),
        };
        let line = CartLine::new(dish, 4)?;
        let detail = to_detail(order_line::Model {
            id: 1,
            order_id: 1,
            dish_id: 4,
            name: "Pie".to_string(),
            quantity: 4,
            price: 3.5,
        });
        assert_eq!(line.subtotal(), detail.subtotal);
        Ok(())
    }
}
