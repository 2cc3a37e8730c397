use anyhow::Result;
use freight_tms::{db, Store};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let db_path = std::env::args().nth(1).unwrap_or_else(|| "data/tms.db".to_string());
    let db = db::connect(&db_path).await?;
    let store = Store::new(db);

    info!("Connected to SurrealDB at {}", db_path);

    info!("=== Database Statistics ===");
    let counts = store.counts().await?;
    info!("Shipments: {} ({} assigned)", counts.shipments, counts.assigned_shipments);
    info!("Orders: {}", counts.orders);
    info!("Carriers: {}", counts.carriers);
    info!("Vehicle types: {}", counts.vehicle_types);
    info!("Warehouses: {}", counts.warehouses);
    info!("Fixed directions: {}", counts.fixed_directions);
    info!("Tariffs: {}", counts.tariffs);
    info!("Shipping schedules: {}", counts.schedules);

    // Status distribution
    let status_stats: Vec<serde_json::Value> = store
        .db()
        .query("SELECT status, count() as cnt FROM shipment GROUP BY status")
        .await?
        .take(0)?;
    info!("Status Distribution: {:?}", status_stats);

    // Shipments per carrier
    let carrier_stats: Vec<serde_json::Value> = store
        .db()
        .query(
            r#"
            SELECT carrier_id, count() as shipments
            FROM shipment
            WHERE carrier_id != NONE
            GROUP BY carrier_id
            ORDER BY shipments DESC
            LIMIT 10
            "#,
        )
        .await?
        .take(0)?;
    info!("Top carriers by shipment count: {:?}", carrier_stats);

    Ok(())
}
