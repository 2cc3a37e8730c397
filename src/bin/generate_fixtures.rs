//! Synthetic dataset generator for the freight TMS.
//!
//! Produces the CSV files the `ingest` binary consumes: dictionaries,
//! fixed directions, tariffs, schedules and a batch of open shipments.
//!
//! Usage:
//!   cargo run --release --bin generate_fixtures -- [OPTIONS]
//!
//! Options:
//!   --carriers <N>    Number of carriers (default: 6)
//!   --shipments <N>   Number of shipments (default: 60)
//!   --directions <N>  Number of fixed directions (default: 4)
//!   --seed <N>        Random seed for reproducibility (optional)
//!   --output <PATH>   Output directory (default: raw-data)

use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use csv::WriterBuilder;
use freight_tms::fixture_names::{CARRIER_NAMES, CITIES, VEHICLE_TYPES};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "generate_fixtures")]
#[command(about = "Generate a synthetic TMS dataset for ingest")]
struct Args {
    /// Number of carriers
    #[arg(long, default_value = "6")]
    carriers: usize,

    /// Number of shipments
    #[arg(long, default_value = "60")]
    shipments: usize,

    /// Number of fixed directions
    #[arg(long, default_value = "4")]
    directions: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory
    #[arg(long, default_value = "raw-data")]
    output: PathBuf,
}

fn opt(v: Option<String>) -> String {
    v.unwrap_or_default()
}

fn validate(args: &Args) -> Result<()> {
    if args.carriers == 0 {
        bail!("--carriers must be at least 1");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    validate(&args)?;
    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    std::fs::create_dir_all(&args.output)?;
    let today = Utc::now().date_naive();

    // Carriers
    let carriers: Vec<(Uuid, &str)> = (0..args.carriers)
        .map(|i| (Uuid::new_v4(), CARRIER_NAMES[i % CARRIER_NAMES.len()]))
        .collect();
    let mut w = WriterBuilder::new().from_path(args.output.join("carriers.csv"))?;
    w.write_record(["carrier_id", "name"])?;
    for (id, name) in &carriers {
        w.write_record([id.to_string(), name.to_string()])?;
    }
    w.flush()?;

    // Vehicle types
    let vehicle_types: Vec<(Uuid, &str, i32, f64)> = VEHICLE_TYPES
        .iter()
        .map(|(name, pallets, tonnage)| (Uuid::new_v4(), *name, *pallets, *tonnage))
        .collect();
    let mut w = WriterBuilder::new().from_path(args.output.join("vehicle_types.csv"))?;
    w.write_record(["vehicle_type_id", "name", "body_type_id", "pallets_capacity", "tonnage_kg"])?;
    for (id, name, pallets, tonnage) in &vehicle_types {
        w.write_record([
            id.to_string(),
            name.to_string(),
            String::new(),
            pallets.to_string(),
            tonnage.to_string(),
        ])?;
    }
    w.flush()?;

    // Warehouses: one distribution center per city
    let warehouses: Vec<(Uuid, &str, &str)> = CITIES
        .iter()
        .map(|(city, region)| (Uuid::new_v4(), *city, *region))
        .collect();
    let mut w = WriterBuilder::new().from_path(args.output.join("warehouses.csv"))?;
    w.write_record(["warehouse_id", "name", "city", "region"])?;
    for (id, city, region) in &warehouses {
        w.write_record([
            id.to_string(),
            format!("{city} DC"),
            city.to_string(),
            region.to_string(),
        ])?;
    }
    w.flush()?;

    // Fixed directions over random city pairs
    let mut w = WriterBuilder::new().from_path(args.output.join("fixed_directions.csv"))?;
    w.write_record([
        "direction_id",
        "carrier_id",
        "quota",
        "is_active",
        "vehicle_type_ids",
        "shipping_warehouse_id",
        "delivery_warehouse_id",
        "shipping_city",
        "delivery_city",
        "shipping_region",
        "delivery_region",
    ])?;
    for _ in 0..args.directions {
        let (carrier_id, _) = carriers.choose(&mut rng).unwrap();
        let from = warehouses.choose(&mut rng).unwrap();
        let mut to = warehouses.choose(&mut rng).unwrap();
        while to.1 == from.1 {
            to = warehouses.choose(&mut rng).unwrap();
        }
        // Half the directions restrict vehicle types to the larger trucks
        let vt_list = if rng.gen_bool(0.5) {
            vehicle_types[2..]
                .iter()
                .map(|(id, ..)| id.to_string())
                .collect::<Vec<_>>()
                .join(";")
        } else {
            String::new()
        };
        w.write_record([
            Uuid::new_v4().to_string(),
            carrier_id.to_string(),
            format!("{}", rng.gen_range(20..70)),
            "true".to_string(),
            vt_list,
            String::new(),
            String::new(),
            from.1.to_string(),
            to.1.to_string(),
            from.2.to_string(),
            to.2.to_string(),
        ])?;
    }
    w.flush()?;

    // Tariffs: each carrier prices a few city pairs, FTL or LTL
    let mut w = WriterBuilder::new().from_path(args.output.join("tariffs.csv"))?;
    w.write_record([
        "tariff_id",
        "carrier_id",
        "vehicle_type_id",
        "body_type_id",
        "tariffication_type",
        "shipping_warehouse_id",
        "delivery_warehouse_id",
        "shipping_city",
        "delivery_city",
        "ftl_rate",
        "ltl_rate_per_pallet",
        "effective_from",
        "effective_to",
    ])?;
    for (carrier_id, _) in &carriers {
        for _ in 0..rng.gen_range(2..5) {
            let from = warehouses.choose(&mut rng).unwrap();
            let mut to = warehouses.choose(&mut rng).unwrap();
            while to.1 == from.1 {
                to = warehouses.choose(&mut rng).unwrap();
            }
            let ftl = rng.gen_bool(0.5);
            w.write_record([
                Uuid::new_v4().to_string(),
                carrier_id.to_string(),
                opt(vehicle_types
                    .choose(&mut rng)
                    .filter(|_| rng.gen_bool(0.3))
                    .map(|(id, ..)| id.to_string())),
                String::new(),
                if ftl { "FTL" } else { "LTL" }.to_string(),
                String::new(),
                String::new(),
                from.1.to_string(),
                to.1.to_string(),
                if ftl {
                    format!("{}", rng.gen_range(500..3_000))
                } else {
                    String::new()
                },
                if ftl {
                    String::new()
                } else {
                    format!("{}", rng.gen_range(40..200))
                },
                String::new(),
                String::new(),
            ])?;
        }
    }
    w.flush()?;

    // Shipping schedules: a weekday calendar per carrier city pair
    let mut w = WriterBuilder::new().from_path(args.output.join("shipping_schedules.csv"))?;
    w.write_record([
        "schedule_id",
        "carrier_id",
        "shipping_city",
        "delivery_city",
        "shipping_days",
        "delivery_days",
    ])?;
    for (carrier_id, _) in &carriers {
        let from = warehouses.choose(&mut rng).unwrap();
        let mut to = warehouses.choose(&mut rng).unwrap();
        while to.1 == from.1 {
            to = warehouses.choose(&mut rng).unwrap();
        }
        let ship_days: Vec<String> = (1..=5u8)
            .filter(|_| rng.gen_bool(0.6))
            .map(|d| d.to_string())
            .collect();
        let delivery_days: Vec<String> = (1..=6u8)
            .filter(|_| rng.gen_bool(0.6))
            .map(|d| d.to_string())
            .collect();
        w.write_record([
            Uuid::new_v4().to_string(),
            carrier_id.to_string(),
            from.1.to_string(),
            to.1.to_string(),
            ship_days.join(";"),
            delivery_days.join(";"),
        ])?;
    }
    w.flush()?;

    // Shipments with one or two orders each
    let mut shipments_w = WriterBuilder::new().from_path(args.output.join("shipments.csv"))?;
    shipments_w.write_record([
        "shipment_id",
        "number",
        "status",
        "shipping_date",
        "delivery_date",
        "pallets_count",
        "weight_kg",
    ])?;
    let mut orders_w = WriterBuilder::new().from_path(args.output.join("orders.csv"))?;
    orders_w.write_record([
        "order_id",
        "shipment_id",
        "number",
        "shipping_warehouse_id",
        "delivery_warehouse_id",
        "shipping_city",
        "shipping_region",
        "delivery_city",
        "delivery_region",
        "delivery_address",
        "shipping_date",
        "delivery_date",
        "pallets_count",
    ])?;

    for i in 0..args.shipments {
        let shipment_id = Uuid::new_v4();
        let number = format!("SH-{:05}", i + 1);
        let ship_date = today + Duration::days(rng.gen_range(1..28));
        let delivery_date = ship_date + Duration::days(rng.gen_range(1..4));
        let pallets = rng.gen_range(1..=33);
        let weight = pallets as f64 * rng.gen_range(200.0..550.0);

        shipments_w.write_record([
            shipment_id.to_string(),
            number.clone(),
            "Created".to_string(),
            ship_date.to_string(),
            delivery_date.to_string(),
            pallets.to_string(),
            format!("{weight:.0}"),
        ])?;

        let from = warehouses.choose(&mut rng).unwrap();
        let mut to = warehouses.choose(&mut rng).unwrap();
        while to.1 == from.1 {
            to = warehouses.choose(&mut rng).unwrap();
        }
        let order_count = if pallets > 1 && rng.gen_bool(0.3) { 2 } else { 1 };
        let mut remaining = pallets;
        for j in 0..order_count {
            let order_pallets = if j == order_count - 1 {
                remaining
            } else {
                let part = rng.gen_range(1..remaining);
                remaining -= part;
                part
            };
            orders_w.write_record([
                Uuid::new_v4().to_string(),
                shipment_id.to_string(),
                format!("{number}-{}", j + 1),
                from.0.to_string(),
                to.0.to_string(),
                from.1.to_string(),
                from.2.to_string(),
                to.1.to_string(),
                to.2.to_string(),
                format!("{} Main St", rng.gen_range(1..999)),
                ship_date.to_string(),
                delivery_date.to_string(),
                order_pallets.to_string(),
            ])?;
        }
    }
    shipments_w.flush()?;
    orders_w.flush()?;

    println!(
        "Generated {} carriers, {} vehicle types, {} warehouses, {} directions, {} shipments in {}",
        carriers.len(),
        vehicle_types.len(),
        warehouses.len(),
        args.directions,
        args.shipments,
        args.output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_carriers_is_rejected() {
        let args = Args::parse_from(["generate_fixtures", "--carriers", "0"]);
        assert!(validate(&args).is_err());
    }

    #[test]
    fn defaults_pass_validation() {
        let args = Args::parse_from(["generate_fixtures"]);
        assert!(validate(&args).is_ok());
    }
}
