//! Shared fixtures for the integration tests: an in-memory database and
//! builders for the selection dictionaries.

#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use freight_tms::models::{
    FixedDirection, Order, Shipment, ShipmentStatus, ShippingSchedule, Tariff,
    TarifficationType, VehicleType,
};
use freight_tms::{db, CarrierSelectionService, Store};
use uuid::Uuid;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// 2026-09-15 is a Tuesday (ISO 2), 2026-09-17 a Thursday (ISO 4)
pub const SHIP_DATE: &str = "2026-09-15";
pub const DELIVERY_DATE: &str = "2026-09-17";

pub async fn service() -> Result<CarrierSelectionService> {
    let db = db::connect_memory().await?;
    db::init_schema(&db).await?;
    Ok(CarrierSelectionService::new(Store::new(db)))
}

pub fn shipment(pallets: i32, weight_kg: f64) -> Shipment {
    Shipment {
        shipment_id: Uuid::new_v4(),
        number: format!("SH-{}", &Uuid::new_v4().to_string()[..8]),
        status: ShipmentStatus::Created,
        shipping_date: Some(date(SHIP_DATE)),
        delivery_date: Some(date(DELIVERY_DATE)),
        pallets_count: pallets,
        weight_kg,
        carrier_id: None,
        vehicle_type_id: None,
        body_type_id: None,
        tariffication_type: None,
        delivery_cost: None,
    }
}

pub fn assigned_shipment(carrier_id: Uuid, shipping_date: &str) -> Shipment {
    Shipment {
        carrier_id: Some(carrier_id),
        shipping_date: Some(date(shipping_date)),
        status: ShipmentStatus::Assigned,
        ..shipment(5, 2_000.0)
    }
}

pub fn order_for(shipment: &Shipment, from_city: &str, to_city: &str, pallets: i32) -> Order {
    Order {
        order_id: Uuid::new_v4(),
        shipment_id: shipment.shipment_id,
        number: format!("{}-1", shipment.number),
        shipping_warehouse_id: None,
        delivery_warehouse_id: None,
        shipping_city: Some(from_city.to_string()),
        shipping_region: None,
        delivery_city: Some(to_city.to_string()),
        delivery_region: None,
        delivery_address: None,
        shipping_date: shipment.shipping_date,
        delivery_date: shipment.delivery_date,
        pallets_count: pallets,
        carrier_id: None,
        vehicle_type_id: None,
        body_type_id: None,
        tariffication_type: None,
        delivery_cost: None,
    }
}

pub fn semi_trailer() -> VehicleType {
    VehicleType {
        vehicle_type_id: Uuid::new_v4(),
        name: "Semi-trailer 20t".to_string(),
        body_type_id: None,
        pallets_capacity: 33,
        tonnage_kg: 20_000.0,
    }
}

pub fn box_truck() -> VehicleType {
    VehicleType {
        vehicle_type_id: Uuid::new_v4(),
        name: "Box truck 3.5t".to_string(),
        body_type_id: None,
        pallets_capacity: 10,
        tonnage_kg: 3_500.0,
    }
}

pub fn city_direction(carrier_id: Uuid, from_city: &str, to_city: &str, quota: f64) -> FixedDirection {
    FixedDirection {
        direction_id: Uuid::new_v4(),
        carrier_id,
        quota,
        is_active: true,
        vehicle_type_ids: vec![],
        shipping_warehouse_id: None,
        delivery_warehouse_id: None,
        shipping_city: Some(from_city.to_string()),
        delivery_city: Some(to_city.to_string()),
        shipping_region: None,
        delivery_region: None,
    }
}

pub fn ftl_tariff(carrier_id: Uuid, from_city: &str, to_city: &str, rate: f64) -> Tariff {
    Tariff {
        tariff_id: Uuid::new_v4(),
        carrier_id,
        vehicle_type_id: None,
        body_type_id: None,
        tariffication_type: TarifficationType::Ftl,
        shipping_warehouse_id: None,
        delivery_warehouse_id: None,
        shipping_city: Some(from_city.to_string()),
        delivery_city: Some(to_city.to_string()),
        ftl_rate: Some(rate),
        ltl_rate_per_pallet: None,
        effective_from: None,
        effective_to: None,
    }
}

pub fn ltl_tariff(carrier_id: Uuid, from_city: &str, to_city: &str, rate_per_pallet: f64) -> Tariff {
    Tariff {
        ltl_rate_per_pallet: Some(rate_per_pallet),
        ftl_rate: None,
        tariffication_type: TarifficationType::Ltl,
        ..ftl_tariff(carrier_id, from_city, to_city, 0.0)
    }
}

pub fn schedule(
    carrier_id: Uuid,
    from_city: &str,
    to_city: &str,
    shipping_days: &[u8],
    delivery_days: &[u8],
) -> ShippingSchedule {
    ShippingSchedule {
        schedule_id: Uuid::new_v4(),
        carrier_id,
        shipping_city: from_city.to_string(),
        delivery_city: to_city.to_string(),
        shipping_days: shipping_days.to_vec(),
        delivery_days: delivery_days.to_vec(),
    }
}
