//! CSV bulk import of dictionaries, shipments and orders.
//!
//! Reads the back-office export files from a data directory (each file is
//! optional) and loads them into SurrealDB:
//!
//!   carriers.csv, vehicle_types.csv, warehouses.csv, fixed_directions.csv,
//!   tariffs.csv, shipping_schedules.csv, shipments.csv, orders.csv
//!
//! List-valued columns (vehicle type ids, weekdays) are `;`-separated.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use csv::ReaderBuilder;
use freight_tms::models::{
    Carrier, FixedDirection, Order, Shipment, ShipmentStatus, ShippingSchedule, Tariff,
    TarifficationType, VehicleType, Warehouse,
};
use freight_tms::{db, Store};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Bulk import TMS dictionaries and shipments from CSV")]
struct Args {
    /// Directory holding the CSV export files
    #[arg(long, default_value = "raw-data")]
    data_dir: PathBuf,

    /// Path to SurrealDB database
    #[arg(long, default_value = "data/tms.db")]
    db_path: String,
}

fn parse_id_list(s: &str) -> Result<Vec<Uuid>> {
    s.split(';')
        .filter(|p| !p.trim().is_empty())
        .map(|p| Uuid::parse_str(p.trim()).context("bad uuid in list"))
        .collect()
}

fn parse_day_list(s: &str) -> Result<Vec<u8>> {
    s.split(';')
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.trim().parse::<u8>().context("bad weekday in list"))
        .collect()
}

#[derive(Debug, Deserialize)]
struct CarrierRow {
    carrier_id: Uuid,
    name: String,
}

#[derive(Debug, Deserialize)]
struct VehicleTypeRow {
    vehicle_type_id: Uuid,
    name: String,
    body_type_id: Option<Uuid>,
    pallets_capacity: i32,
    tonnage_kg: f64,
}

#[derive(Debug, Deserialize)]
struct WarehouseRow {
    warehouse_id: Uuid,
    name: String,
    city: String,
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FixedDirectionRow {
    direction_id: Uuid,
    carrier_id: Uuid,
    quota: f64,
    is_active: bool,
    vehicle_type_ids: Option<String>,
    shipping_warehouse_id: Option<Uuid>,
    delivery_warehouse_id: Option<Uuid>,
    shipping_city: Option<String>,
    delivery_city: Option<String>,
    shipping_region: Option<String>,
    delivery_region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TariffRow {
    tariff_id: Uuid,
    carrier_id: Uuid,
    vehicle_type_id: Option<Uuid>,
    body_type_id: Option<Uuid>,
    tariffication_type: String,
    shipping_warehouse_id: Option<Uuid>,
    delivery_warehouse_id: Option<Uuid>,
    shipping_city: Option<String>,
    delivery_city: Option<String>,
    ftl_rate: Option<f64>,
    ltl_rate_per_pallet: Option<f64>,
    effective_from: Option<NaiveDate>,
    effective_to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct ScheduleRow {
    schedule_id: Uuid,
    carrier_id: Uuid,
    shipping_city: String,
    delivery_city: String,
    shipping_days: String,
    delivery_days: String,
}

#[derive(Debug, Deserialize)]
struct ShipmentRow {
    shipment_id: Uuid,
    number: String,
    status: String,
    shipping_date: Option<NaiveDate>,
    delivery_date: Option<NaiveDate>,
    pallets_count: i32,
    weight_kg: f64,
}

#[derive(Debug, Deserialize)]
struct OrderRow {
    order_id: Uuid,
    shipment_id: Uuid,
    number: String,
    shipping_warehouse_id: Option<Uuid>,
    delivery_warehouse_id: Option<Uuid>,
    shipping_city: Option<String>,
    shipping_region: Option<String>,
    delivery_city: Option<String>,
    delivery_region: Option<String>,
    delivery_address: Option<String>,
    shipping_date: Option<NaiveDate>,
    delivery_date: Option<NaiveDate>,
    pallets_count: i32,
}

fn read_rows<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let path = dir.join(file);
    if !path.exists() {
        warn!("{} not found, skipping", path.display());
        return Ok(Vec::new());
    }
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(&path)?;
    let mut rows = Vec::new();
    let mut errors = 0;
    for (i, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(r) => rows.push(r),
            Err(e) => {
                if errors < 5 {
                    warn!("{}: row {} rejected: {}", file, i + 1, e);
                }
                errors += 1;
            }
        }
    }
    info!("{}: {} rows parsed, {} rejected", file, rows.len(), errors);
    Ok(rows)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args = Args::parse();

    info!("Connecting to SurrealDB at {}", args.db_path);
    let db = db::connect(&args.db_path).await?;

    info!("Initializing schema...");
    db::init_schema(&db).await?;
    let store = Store::new(db);

    for row in read_rows::<CarrierRow>(&args.data_dir, "carriers.csv")? {
        store
            .create_carrier(&Carrier {
                carrier_id: row.carrier_id,
                name: row.name,
            })
            .await?;
    }

    for row in read_rows::<VehicleTypeRow>(&args.data_dir, "vehicle_types.csv")? {
        store
            .create_vehicle_type(&VehicleType {
                vehicle_type_id: row.vehicle_type_id,
                name: row.name,
                body_type_id: row.body_type_id,
                pallets_capacity: row.pallets_capacity,
                tonnage_kg: row.tonnage_kg,
            })
            .await?;
    }

    for row in read_rows::<WarehouseRow>(&args.data_dir, "warehouses.csv")? {
        store
            .create_warehouse(&Warehouse {
                warehouse_id: row.warehouse_id,
                name: row.name,
                city: row.city,
                region: row.region,
            })
            .await?;
    }

    for row in read_rows::<FixedDirectionRow>(&args.data_dir, "fixed_directions.csv")? {
        let vehicle_type_ids = match &row.vehicle_type_ids {
            Some(list) => parse_id_list(list)?,
            None => Vec::new(),
        };
        store
            .create_fixed_direction(&FixedDirection {
                direction_id: row.direction_id,
                carrier_id: row.carrier_id,
                quota: row.quota,
                is_active: row.is_active,
                vehicle_type_ids,
                shipping_warehouse_id: row.shipping_warehouse_id,
                delivery_warehouse_id: row.delivery_warehouse_id,
                shipping_city: row.shipping_city,
                delivery_city: row.delivery_city,
                shipping_region: row.shipping_region,
                delivery_region: row.delivery_region,
            })
            .await?;
    }

    for row in read_rows::<TariffRow>(&args.data_dir, "tariffs.csv")? {
        store
            .create_tariff(&Tariff {
                tariff_id: row.tariff_id,
                carrier_id: row.carrier_id,
                vehicle_type_id: row.vehicle_type_id,
                body_type_id: row.body_type_id,
                tariffication_type: TarifficationType::from(row.tariffication_type.as_str()),
                shipping_warehouse_id: row.shipping_warehouse_id,
                delivery_warehouse_id: row.delivery_warehouse_id,
                shipping_city: row.shipping_city,
                delivery_city: row.delivery_city,
                ftl_rate: row.ftl_rate,
                ltl_rate_per_pallet: row.ltl_rate_per_pallet,
                effective_from: row.effective_from,
                effective_to: row.effective_to,
            })
            .await?;
    }

    for row in read_rows::<ScheduleRow>(&args.data_dir, "shipping_schedules.csv")? {
        store
            .create_schedule(&ShippingSchedule {
                schedule_id: row.schedule_id,
                carrier_id: row.carrier_id,
                shipping_city: row.shipping_city,
                delivery_city: row.delivery_city,
                shipping_days: parse_day_list(&row.shipping_days)?,
                delivery_days: parse_day_list(&row.delivery_days)?,
            })
            .await?;
    }

    let mut shipment_count = 0;
    for row in read_rows::<ShipmentRow>(&args.data_dir, "shipments.csv")? {
        store
            .create_shipment(&Shipment {
                shipment_id: row.shipment_id,
                number: row.number,
                status: ShipmentStatus::from(row.status.as_str()),
                shipping_date: row.shipping_date,
                delivery_date: row.delivery_date,
                pallets_count: row.pallets_count,
                weight_kg: row.weight_kg,
                carrier_id: None,
                vehicle_type_id: None,
                body_type_id: None,
                tariffication_type: None,
                delivery_cost: None,
            })
            .await?;
        shipment_count += 1;
    }

    let mut order_count = 0;
    for row in read_rows::<OrderRow>(&args.data_dir, "orders.csv")? {
        store
            .create_order(&Order {
                order_id: row.order_id,
                shipment_id: row.shipment_id,
                number: row.number,
                shipping_warehouse_id: row.shipping_warehouse_id,
                delivery_warehouse_id: row.delivery_warehouse_id,
                shipping_city: row.shipping_city,
                shipping_region: row.shipping_region,
                delivery_city: row.delivery_city,
                delivery_region: row.delivery_region,
                delivery_address: row.delivery_address,
                shipping_date: row.shipping_date,
                delivery_date: row.delivery_date,
                pallets_count: row.pallets_count,
                carrier_id: None,
                vehicle_type_id: None,
                body_type_id: None,
                tariffication_type: None,
                delivery_cost: None,
            })
            .await?;
        order_count += 1;
    }

    info!(
        "Ingestion complete: {} shipments, {} orders",
        shipment_count, order_count
    );

    let counts = store.counts().await?;
    info!("Database totals:");
    info!("  Shipments: {}", counts.shipments);
    info!("  Orders: {}", counts.orders);
    info!("  Carriers: {}", counts.carriers);
    info!("  Vehicle types: {}", counts.vehicle_types);
    info!("  Warehouses: {}", counts.warehouses);
    info!("  Fixed directions: {}", counts.fixed_directions);
    info!("  Tariffs: {}", counts.tariffs);
    info!("  Schedules: {}", counts.schedules);

    Ok(())
}
