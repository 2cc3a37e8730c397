//! Vehicle-type capacity checks.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::VehicleType;

/// A vehicle type fits a shipment when both its pallet capacity and its
/// tonnage cover the shipment's totals.
pub fn fits(vt: &VehicleType, pallets: i32, weight_kg: f64) -> bool {
    vt.pallets_capacity >= pallets && vt.tonnage_kg >= weight_kg
}

/// Ids of every vehicle type with enough capacity for the shipment
pub fn qualified(types: &[VehicleType], pallets: i32, weight_kg: f64) -> HashSet<Uuid> {
    types
        .iter()
        .filter(|vt| fits(vt, pallets, weight_kg))
        .map(|vt| vt.vehicle_type_id)
        .collect()
}

/// Smallest-capacity vehicle type among `allowed` that still fits the
/// shipment; capacity ordered by pallets, then tonnage.
pub fn smallest_fit(
    types: &[VehicleType],
    allowed: &[Uuid],
    pallets: i32,
    weight_kg: f64,
) -> Option<Uuid> {
    types
        .iter()
        .filter(|vt| allowed.contains(&vt.vehicle_type_id) && fits(vt, pallets, weight_kg))
        .min_by(|a, b| {
            a.pallets_capacity
                .cmp(&b.pallets_capacity)
                .then(a.tonnage_kg.total_cmp(&b.tonnage_kg))
        })
        .map(|vt| vt.vehicle_type_id)
}
