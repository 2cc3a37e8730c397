//! Carrier selection engine.
//!
//! Pure decision logic over a materialized per-call snapshot: fixed-direction
//! matching with a quota tie-break, best-cost tariff fallback with an FTL
//! retry when the shipping-schedule calendar rejects an LTL candidate, and an
//! assignment writer that keeps the carrier-request audit trail.
//!
//! `decide` mutates nothing; all writes happen in
//! [`service::CarrierSelectionService`].

pub mod directions;
pub mod quota;
pub mod schedule;
pub mod service;
pub mod tariffs;
pub mod vehicle;

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    FixedDirection, Order, SelectionKind, Shipment, ShippingSchedule, Tariff,
    TarifficationType, VehicleType,
};

pub use service::CarrierSelectionService;

/// Everything one selection call reads, loaded up front by the store
#[derive(Debug, Clone)]
pub struct SelectionInputs {
    pub shipment: Shipment,
    pub orders: Vec<Order>,
    pub vehicle_types: Vec<VehicleType>,
    pub fixed_directions: Vec<FixedDirection>,
    pub tariffs: Vec<Tariff>,
    pub schedules: Vec<ShippingSchedule>,
    /// Other carrier-assigned shipments; input to the monthly usage tally
    pub assigned_shipments: Vec<Shipment>,
    /// Carriers already associated with this shipment (exclusion set seed)
    pub tried_carriers: Vec<Uuid>,
}

/// Result of a selection decision
#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutcome {
    pub carrier_id: Option<Uuid>,
    pub tariff: Option<Tariff>,
    pub kind: SelectionKind,
    /// Vehicle-type upgrade to apply alongside the assignment, when a
    /// multi-vehicle fixed direction matched without a priced tariff
    pub vehicle_type_id: Option<Uuid>,
}

impl SelectionOutcome {
    pub fn none() -> Self {
        Self {
            carrier_id: None,
            tariff: None,
            kind: SelectionKind::None,
            vehicle_type_id: None,
        }
    }
}

/// Route endpoints of a shipment, taken from the earliest-shipping order's
/// shipping side and the latest-delivery order's delivery side.
#[derive(Debug, Clone, Default)]
pub struct RouteEnds {
    pub shipping_warehouse_id: Option<Uuid>,
    pub delivery_warehouse_id: Option<Uuid>,
    pub shipping_city: Option<String>,
    pub delivery_city: Option<String>,
    pub shipping_region: Option<String>,
    pub delivery_region: Option<String>,
    pub shipping_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
}

pub fn earliest_shipping_order(orders: &[Order]) -> Option<&Order> {
    orders
        .iter()
        .filter(|o| o.shipping_date.is_some())
        .min_by_key(|o| o.shipping_date)
}

pub fn latest_delivery_order(orders: &[Order]) -> Option<&Order> {
    orders
        .iter()
        .filter(|o| o.delivery_date.is_some())
        .max_by_key(|o| o.delivery_date)
}

impl RouteEnds {
    pub fn from_orders(orders: &[Order]) -> Self {
        let first = earliest_shipping_order(orders).or_else(|| orders.first());
        let last = latest_delivery_order(orders).or_else(|| orders.last());

        let mut route = RouteEnds::default();
        if let Some(o) = first {
            route.shipping_warehouse_id = o.shipping_warehouse_id;
            route.shipping_city = o.shipping_city.clone();
            route.shipping_region = o.shipping_region.clone();
            route.shipping_date = o.shipping_date;
        }
        if let Some(o) = last {
            route.delivery_warehouse_id = o.delivery_warehouse_id;
            route.delivery_city = o.delivery_city.clone();
            route.delivery_region = o.delivery_region.clone();
            route.delivery_date = o.delivery_date;
        }
        route
    }
}

/// Pick a carrier for the shipment described by `inputs`.
///
/// "No carrier found" is a valid outcome, not an error. The decision never
/// mutates anything; vehicle-type upgrades are returned in the outcome and
/// applied by the writer.
pub fn decide(inputs: &SelectionInputs, ignored_carrier_ids: &[Uuid]) -> SelectionOutcome {
    let shipment = &inputs.shipment;

    // Incomplete shipments are skippable, not errors
    let Some(shipping_date) = shipment.shipping_date else {
        warn!(
            shipment_id = %shipment.shipment_id,
            "skipping selection: shipment has no shipping date"
        );
        return SelectionOutcome::none();
    };
    if inputs.orders.is_empty() {
        warn!(
            shipment_id = %shipment.shipment_id,
            "skipping selection: shipment has no orders"
        );
        return SelectionOutcome::none();
    }

    let excluded: HashSet<Uuid> = inputs
        .tried_carriers
        .iter()
        .chain(ignored_carrier_ids)
        .copied()
        .collect();

    let qualified = vehicle::qualified(
        &inputs.vehicle_types,
        shipment.pallets_count,
        shipment.weight_kg,
    );
    let route = RouteEnds::from_orders(&inputs.orders);

    let candidates =
        directions::match_directions(&inputs.fixed_directions, &route, &qualified, &excluded);
    let usage = quota::monthly_usage(&inputs.assigned_shipments, shipping_date.month());
    let chosen = quota::pick_by_quota(&candidates, &usage);

    if let Some(dir) = chosen {
        debug!(
            shipment_id = %shipment.shipment_id,
            direction_id = %dir.direction_id,
            carrier_id = %dir.carrier_id,
            candidates = candidates.len(),
            "fixed direction matched"
        );
    }

    // Tariff lookup, seeded with the fixed direction's preferences when one
    // matched. A non-FTL result that fails the shipping-schedule check is
    // retried once with an FTL override; a failed retry discards the tariff.
    let allowed_vehicle_types: HashSet<Uuid> = match chosen {
        Some(dir) if !dir.vehicle_type_ids.is_empty() => {
            dir.vehicle_type_ids.iter().copied().collect()
        }
        _ => qualified.clone(),
    };
    let mut query = tariffs::TariffQuery {
        route: &route,
        shipping_date: Some(shipping_date),
        pallets: shipment.pallets_count,
        preferred_carrier: chosen.map(|d| d.carrier_id),
        allowed_vehicle_types: &allowed_vehicle_types,
        tariffication_override: None,
        excluded: &excluded,
    };
    let mut tariff = tariffs::find_best(&inputs.tariffs, &query).cloned();

    if let Some(t) = &tariff {
        if t.tariffication_type != TarifficationType::Ftl
            && !schedule::schedule_allows(&inputs.schedules, t.carrier_id, &route)
        {
            info!(
                shipment_id = %shipment.shipment_id,
                carrier_id = %t.carrier_id,
                "schedule rejected LTL tariff, retrying with FTL"
            );
            query.tariffication_override = Some(TarifficationType::Ftl);
            tariff = tariffs::find_best(&inputs.tariffs, &query).cloned();
        }
    }

    match chosen {
        Some(dir) => {
            // Without cost data a multi-vehicle direction may still carry the
            // load in a smaller vehicle that fits the shipment.
            let vehicle_type_id = if tariff.is_none() && dir.vehicle_type_ids.len() > 1 {
                vehicle::smallest_fit(
                    &inputs.vehicle_types,
                    &dir.vehicle_type_ids,
                    shipment.pallets_count,
                    shipment.weight_kg,
                )
            } else {
                None
            };
            info!(
                shipment_id = %shipment.shipment_id,
                carrier_id = %dir.carrier_id,
                has_tariff = tariff.is_some(),
                "carrier selected by fixed direction"
            );
            SelectionOutcome {
                carrier_id: Some(dir.carrier_id),
                tariff,
                kind: SelectionKind::FixedDirection,
                vehicle_type_id,
            }
        }
        None => match tariff {
            Some(t) => {
                info!(
                    shipment_id = %shipment.shipment_id,
                    carrier_id = %t.carrier_id,
                    tariff_id = %t.tariff_id,
                    "carrier selected by best cost"
                );
                SelectionOutcome {
                    carrier_id: Some(t.carrier_id),
                    tariff: Some(t),
                    kind: SelectionKind::BestCost,
                    vehicle_type_id: None,
                }
            }
            None => {
                info!(
                    shipment_id = %shipment.shipment_id,
                    "no carrier qualifies for shipment"
                );
                SelectionOutcome::none()
            }
        },
    }
}
