use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tariffication type: full truckload or less-than-truckload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TarifficationType {
    Ftl,
    Ltl,
}

impl From<&str> for TarifficationType {
    fn from(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "FTL" => TarifficationType::Ftl,
            "LTL" => TarifficationType::Ltl,
            _ => TarifficationType::Ftl, // default
        }
    }
}

/// Shipment lifecycle status (transitions driven by workflow code, not the engine)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShipmentStatus {
    Draft,
    Created,
    Assigned,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl From<&str> for ShipmentStatus {
    fn from(s: &str) -> Self {
        match s {
            "Draft" => ShipmentStatus::Draft,
            "Assigned" => ShipmentStatus::Assigned,
            "Confirmed" => ShipmentStatus::Confirmed,
            "Shipped" => ShipmentStatus::Shipped,
            "Delivered" => ShipmentStatus::Delivered,
            "Cancelled" => ShipmentStatus::Cancelled,
            _ => ShipmentStatus::Created,
        }
    }
}

/// How a carrier was chosen for a shipment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SelectionKind {
    None,
    FixedDirection,
    BestCost,
}

/// Shipment aggregate root: one or more orders moving together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub shipment_id: Uuid,
    pub number: String,
    pub status: ShipmentStatus,
    pub shipping_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub pallets_count: i32,
    pub weight_kg: f64,
    pub carrier_id: Option<Uuid>,
    pub vehicle_type_id: Option<Uuid>,
    pub body_type_id: Option<Uuid>,
    pub tariffication_type: Option<TarifficationType>,
    pub delivery_cost: Option<f64>,
}

/// Order line belonging to exactly one shipment.
/// Carrier/vehicle fields are denormalized copies kept in lockstep with
/// the parent shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: Uuid,
    pub shipment_id: Uuid,
    pub number: String,
    pub shipping_warehouse_id: Option<Uuid>,
    pub delivery_warehouse_id: Option<Uuid>,
    pub shipping_city: Option<String>,
    pub shipping_region: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_region: Option<String>,
    pub delivery_address: Option<String>,
    pub shipping_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub pallets_count: i32,
    pub carrier_id: Option<Uuid>,
    pub vehicle_type_id: Option<Uuid>,
    pub body_type_id: Option<Uuid>,
    pub tariffication_type: Option<TarifficationType>,
    pub delivery_cost: Option<f64>,
}

/// Transport company dictionary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carrier {
    pub carrier_id: Uuid,
    pub name: String,
}

/// Vehicle type dictionary entry with capacity limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleType {
    pub vehicle_type_id: Uuid,
    pub name: String,
    pub body_type_id: Option<Uuid>,
    pub pallets_capacity: i32,
    pub tonnage_kg: f64,
}

/// Warehouse dictionary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub warehouse_id: Uuid,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
}

/// Standing carrier-to-route assignment rule with a monthly quota.
/// The route is pinned at warehouse, city or region granularity; an empty
/// vehicle_type_ids list means any vehicle type is acceptable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedDirection {
    pub direction_id: Uuid,
    pub carrier_id: Uuid,
    pub quota: f64,
    pub is_active: bool,
    pub vehicle_type_ids: Vec<Uuid>,
    pub shipping_warehouse_id: Option<Uuid>,
    pub delivery_warehouse_id: Option<Uuid>,
    pub shipping_city: Option<String>,
    pub delivery_city: Option<String>,
    pub shipping_region: Option<String>,
    pub delivery_region: Option<String>,
}

/// Priced carrier offer for a route/vehicle/tariffication combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tariff {
    pub tariff_id: Uuid,
    pub carrier_id: Uuid,
    pub vehicle_type_id: Option<Uuid>,
    pub body_type_id: Option<Uuid>,
    pub tariffication_type: TarifficationType,
    pub shipping_warehouse_id: Option<Uuid>,
    pub delivery_warehouse_id: Option<Uuid>,
    pub shipping_city: Option<String>,
    pub delivery_city: Option<String>,
    pub ftl_rate: Option<f64>,
    pub ltl_rate_per_pallet: Option<f64>,
    pub effective_from: Option<NaiveDate>,
    pub effective_to: Option<NaiveDate>,
}

impl Tariff {
    /// Priced delivery cost for a shipment of the given pallet count.
    /// FTL tariffs are flat-rate; LTL tariffs are priced per pallet.
    pub fn delivery_cost(&self, pallets: i32) -> Option<f64> {
        match self.tariffication_type {
            TarifficationType::Ftl => self.ftl_rate,
            TarifficationType::Ltl => self
                .ltl_rate_per_pallet
                .map(|rate| rate * pallets.max(0) as f64),
        }
    }
}

/// Calendar of valid shipping/delivery weekday combinations for a carrier's
/// city-pair route. Weekdays are ISO numbered, Monday=1 .. Sunday=7.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingSchedule {
    pub schedule_id: Uuid,
    pub carrier_id: Uuid,
    pub shipping_city: String,
    pub delivery_city: String,
    pub shipping_days: Vec<u8>,
    pub delivery_days: Vec<u8>,
}

/// Audit row per (shipment, carrier): when a request was sent to the carrier,
/// when it was rejected, when it was confirmed. Updated in place, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierRequestStat {
    pub stat_id: Uuid,
    pub shipment_id: Uuid,
    pub carrier_id: Uuid,
    pub sent_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// History of carriers ever associated with a shipment; feeds the
/// exclusion set on reassignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierAction {
    pub action_id: Uuid,
    pub shipment_id: Uuid,
    pub carrier_id: Uuid,
    pub created_at: DateTime<Utc>,
}
