use anyhow::Result;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

pub type DbConn = Surreal<Db>;

/// Initialize database connection with RocksDB backend
pub async fn connect(path: &str) -> Result<DbConn> {
    let db = Surreal::new::<RocksDb>(path).await?;
    db.use_ns("freight").use_db("tms").await?;
    Ok(db)
}

/// Initialize an in-memory database (tests, dry runs)
pub async fn connect_memory() -> Result<DbConn> {
    let db = Surreal::new::<Mem>(()).await?;
    db.use_ns("freight").use_db("tms").await?;
    Ok(db)
}

/// Initialize database schema
pub async fn init_schema(db: &DbConn) -> Result<()> {
    // Business keys are plain fields; record ids stay engine-generated
    db.query(
        r#"
        -- Shipments and their orders (schemaless for flexibility)
        DEFINE TABLE shipment SCHEMALESS;
        DEFINE INDEX idx_shipment_id ON shipment FIELDS shipment_id UNIQUE;
        DEFINE INDEX idx_shipment_carrier ON shipment FIELDS carrier_id;
        DEFINE INDEX idx_shipment_date ON shipment FIELDS shipping_date;

        DEFINE TABLE orders SCHEMALESS;
        DEFINE INDEX idx_order_id ON orders FIELDS order_id UNIQUE;
        DEFINE INDEX idx_order_shipment ON orders FIELDS shipment_id;

        -- Dictionaries
        DEFINE TABLE carrier SCHEMALESS;
        DEFINE INDEX idx_carrier_id ON carrier FIELDS carrier_id UNIQUE;

        DEFINE TABLE vehicle_type SCHEMALESS;
        DEFINE INDEX idx_vehicle_type_id ON vehicle_type FIELDS vehicle_type_id UNIQUE;

        DEFINE TABLE warehouse SCHEMALESS;
        DEFINE INDEX idx_warehouse_id ON warehouse FIELDS warehouse_id UNIQUE;

        -- Carrier-selection inputs
        DEFINE TABLE fixed_direction SCHEMALESS;
        DEFINE INDEX idx_direction_id ON fixed_direction FIELDS direction_id UNIQUE;

        DEFINE TABLE tariff SCHEMALESS;
        DEFINE INDEX idx_tariff_id ON tariff FIELDS tariff_id UNIQUE;
        DEFINE INDEX idx_tariff_carrier ON tariff FIELDS carrier_id;

        DEFINE TABLE shipping_schedule SCHEMALESS;
        DEFINE INDEX idx_schedule_id ON shipping_schedule FIELDS schedule_id UNIQUE;

        -- Audit trail
        DEFINE TABLE carrier_request_stat SCHEMALESS;
        DEFINE INDEX idx_stat_id ON carrier_request_stat FIELDS stat_id UNIQUE;
        DEFINE INDEX idx_stat_pair ON carrier_request_stat FIELDS shipment_id, carrier_id UNIQUE;

        DEFINE TABLE carrier_action SCHEMALESS;
        DEFINE INDEX idx_action_id ON carrier_action FIELDS action_id UNIQUE;
        DEFINE INDEX idx_action_shipment ON carrier_action FIELDS shipment_id;
        "#,
    )
    .await?;

    Ok(())
}
