use dotenvy::dotenv;
use stockpot::{
    config::{catalog, database},
    core::{cash, inventory, report, waste},
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Connect and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 4. Seed inventory and menu from the catalog on first run
    let catalog_path = catalog::get_catalog_path();
    match catalog::load_catalog(&catalog_path) {
        Ok(cat) => {
            catalog::seed_catalog(&db, &cat)
                .await
                .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
        }
        Err(e) => warn!("No catalog loaded from {}: {}", catalog_path, e),
    }

    // 5. Report stock that needs attention
    let low_stock = inventory::get_low_stock_items(&db).await?;
    info!("{}", inventory::format_low_stock_report(&low_stock));

    let unreconciled = stockpot::core::order::get_orders_needing_reconciliation(&db).await?;
    if !unreconciled.is_empty() {
        warn!(
            "{} order(s) have inventory that was not deducted; run a reconciliation.",
            unreconciled.len()
        );
    }

    // 6. Sales, waste and cash drawer to date
    let sales = report::get_sales_summary(&db, None, None).await?;
    info!("{}", report::format_sales_summary(&sales));
    let wasted = waste::get_waste_summary(&db).await?;
    info!(
        operational = wasted.operational,
        error = wasted.error,
        "Waste cost to date: {:.2}",
        wasted.total
    );
    match cash::get_open_cash_register(&db).await? {
        Some(register) => {
            let expected = cash::expected_cash(&db, register.id).await?;
            info!(
                register_id = register.id,
                "Cash register open since {}, expected in drawer: {:.2}", register.opened_at, expected
            );
        }
        None => info!("No cash register is open."),
    }

    Ok(())
}
