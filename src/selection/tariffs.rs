//! Best-cost tariff lookup.

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Tariff, TarifficationType};
use crate::selection::RouteEnds;

/// One tariff search, parameterized by the orchestrator
#[derive(Debug)]
pub struct TariffQuery<'a> {
    pub route: &'a RouteEnds,
    pub shipping_date: Option<NaiveDate>,
    pub pallets: i32,
    /// Hard carrier filter when a fixed direction seeded the search
    pub preferred_carrier: Option<Uuid>,
    /// Fixed direction's vehicle types when it pins any, else the
    /// capacity-qualified set
    pub allowed_vehicle_types: &'a HashSet<Uuid>,
    pub tariffication_override: Option<TarifficationType>,
    pub excluded: &'a HashSet<Uuid>,
}

fn route_matches(tariff: &Tariff, route: &RouteEnds) -> bool {
    // A tariff pinned to a warehouse pair applies only there; one pinned to
    // a city pair applies to that city pair; an unpinned tariff applies to
    // any route.
    if tariff.shipping_warehouse_id.is_some() || tariff.delivery_warehouse_id.is_some() {
        return tariff.shipping_warehouse_id == route.shipping_warehouse_id
            && tariff.delivery_warehouse_id == route.delivery_warehouse_id;
    }
    if tariff.shipping_city.is_some() || tariff.delivery_city.is_some() {
        return tariff.shipping_city == route.shipping_city
            && tariff.delivery_city == route.delivery_city;
    }
    true
}

fn in_effect(tariff: &Tariff, shipping_date: Option<NaiveDate>) -> bool {
    let Some(date) = shipping_date else {
        return tariff.effective_from.is_none() && tariff.effective_to.is_none();
    };
    tariff.effective_from.map_or(true, |from| from <= date)
        && tariff.effective_to.map_or(true, |to| date <= to)
}

fn applies(tariff: &Tariff, q: &TariffQuery) -> bool {
    if q.excluded.contains(&tariff.carrier_id) {
        return false;
    }
    if let Some(carrier) = q.preferred_carrier {
        if tariff.carrier_id != carrier {
            return false;
        }
    }
    if let Some(t) = q.tariffication_override {
        if tariff.tariffication_type != t {
            return false;
        }
    }
    if let Some(vt) = tariff.vehicle_type_id {
        if !q.allowed_vehicle_types.contains(&vt) {
            return false;
        }
    }
    route_matches(tariff, q.route) && in_effect(tariff, q.shipping_date)
}

/// Cheapest applicable tariff for the query, ties resolved by input order.
/// Tariffs without a priced cost for the shipment are skipped.
pub fn find_best<'a>(tariffs: &'a [Tariff], q: &TariffQuery) -> Option<&'a Tariff> {
    tariffs
        .iter()
        .filter(|t| applies(t, q))
        .filter_map(|t| t.delivery_cost(q.pallets).map(|cost| (t, cost)))
        .fold(None::<(&Tariff, f64)>, |best, (t, cost)| match best {
            Some((_, best_cost)) if best_cost <= cost => best,
            _ => Some((t, cost)),
        })
        .map(|(t, _)| t)
}
