//! Fixed-direction matching: cascading route lookup from warehouse pair
//! down to region pair.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::FixedDirection;
use crate::selection::RouteEnds;

fn eligible(
    dir: &FixedDirection,
    qualified_vehicle_types: &HashSet<Uuid>,
    excluded: &HashSet<Uuid>,
) -> bool {
    if !dir.is_active || excluded.contains(&dir.carrier_id) {
        return false;
    }
    dir.vehicle_type_ids.is_empty()
        || dir
            .vehicle_type_ids
            .iter()
            .any(|id| qualified_vehicle_types.contains(id))
}

fn warehouse_pair_match(dir: &FixedDirection, route: &RouteEnds) -> bool {
    dir.shipping_warehouse_id.is_some()
        && dir.shipping_warehouse_id == route.shipping_warehouse_id
        && dir.delivery_warehouse_id.is_some()
        && dir.delivery_warehouse_id == route.delivery_warehouse_id
}

fn city_pair_match(dir: &FixedDirection, route: &RouteEnds) -> bool {
    dir.shipping_city.is_some()
        && dir.shipping_city == route.shipping_city
        && dir.delivery_city.is_some()
        && dir.delivery_city == route.delivery_city
}

fn region_pair_match(dir: &FixedDirection, route: &RouteEnds) -> bool {
    dir.shipping_region.is_some()
        && dir.shipping_region == route.shipping_region
        && dir.delivery_region.is_some()
        && dir.delivery_region == route.delivery_region
}

/// All fixed directions matching the route at the most specific level that
/// yields any result: warehouse pair, then city pair, then region pair.
/// Later levels are never tried once an earlier level matched.
pub fn match_directions<'a>(
    directions: &'a [FixedDirection],
    route: &RouteEnds,
    qualified_vehicle_types: &HashSet<Uuid>,
    excluded: &HashSet<Uuid>,
) -> Vec<&'a FixedDirection> {
    let pool: Vec<&FixedDirection> = directions
        .iter()
        .filter(|d| eligible(d, qualified_vehicle_types, excluded))
        .collect();

    for matcher in [warehouse_pair_match, city_pair_match, region_pair_match] {
        let level: Vec<&FixedDirection> = pool
            .iter()
            .copied()
            .filter(|d| matcher(d, route))
            .collect();
        if !level.is_empty() {
            return level;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(carrier: Uuid) -> FixedDirection {
        FixedDirection {
            direction_id: Uuid::new_v4(),
            carrier_id: carrier,
            quota: 50.0,
            is_active: true,
            vehicle_type_ids: vec![],
            shipping_warehouse_id: None,
            delivery_warehouse_id: None,
            shipping_city: None,
            delivery_city: None,
            shipping_region: None,
            delivery_region: None,
        }
    }

    fn route() -> RouteEnds {
        RouteEnds {
            shipping_warehouse_id: Some(Uuid::new_v4()),
            delivery_warehouse_id: Some(Uuid::new_v4()),
            shipping_city: Some("Moscow".to_string()),
            delivery_city: Some("Kazan".to_string()),
            shipping_region: Some("Moscow Oblast".to_string()),
            delivery_region: Some("Tatarstan".to_string()),
            ..RouteEnds::default()
        }
    }

    #[test]
    fn warehouse_level_shadows_city_level() {
        let r = route();

        let mut by_warehouse = dir(Uuid::new_v4());
        by_warehouse.shipping_warehouse_id = r.shipping_warehouse_id;
        by_warehouse.delivery_warehouse_id = r.delivery_warehouse_id;

        let mut by_city = dir(Uuid::new_v4());
        by_city.shipping_city = r.shipping_city.clone();
        by_city.delivery_city = r.delivery_city.clone();

        let dirs = vec![by_city.clone(), by_warehouse.clone()];
        let matched = match_directions(&dirs, &r, &HashSet::new(), &HashSet::new());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].direction_id, by_warehouse.direction_id);
    }

    #[test]
    fn falls_back_to_city_then_region() {
        let r = route();

        let mut by_city = dir(Uuid::new_v4());
        by_city.shipping_city = r.shipping_city.clone();
        by_city.delivery_city = r.delivery_city.clone();

        let mut by_region = dir(Uuid::new_v4());
        by_region.shipping_region = r.shipping_region.clone();
        by_region.delivery_region = r.delivery_region.clone();

        let dirs = vec![by_region.clone(), by_city.clone()];
        let matched = match_directions(&dirs, &r, &HashSet::new(), &HashSet::new());
        assert_eq!(matched[0].direction_id, by_city.direction_id);

        let only_region = vec![by_region.clone()];
        let matched = match_directions(&only_region, &r, &HashSet::new(), &HashSet::new());
        assert_eq!(matched[0].direction_id, by_region.direction_id);
    }

    #[test]
    fn half_specified_route_does_not_match() {
        let r = route();
        let mut half = dir(Uuid::new_v4());
        half.shipping_city = r.shipping_city.clone();
        // delivery city left unset

        let dirs = [half];
        let matched = match_directions(&dirs, &r, &HashSet::new(), &HashSet::new());
        assert!(matched.is_empty());
    }

    #[test]
    fn excluded_and_inactive_carriers_are_filtered() {
        let r = route();
        let banned = Uuid::new_v4();

        let mut excluded_dir = dir(banned);
        excluded_dir.shipping_city = r.shipping_city.clone();
        excluded_dir.delivery_city = r.delivery_city.clone();

        let mut inactive = dir(Uuid::new_v4());
        inactive.is_active = false;
        inactive.shipping_city = r.shipping_city.clone();
        inactive.delivery_city = r.delivery_city.clone();

        let excluded: HashSet<Uuid> = [banned].into_iter().collect();
        let dirs = vec![excluded_dir, inactive];
        assert!(match_directions(&dirs, &r, &HashSet::new(), &excluded).is_empty());
    }

    #[test]
    fn vehicle_type_list_must_intersect_qualified_set() {
        let r = route();
        let vt_ok = Uuid::new_v4();
        let vt_small = Uuid::new_v4();

        let mut constrained = dir(Uuid::new_v4());
        constrained.shipping_city = r.shipping_city.clone();
        constrained.delivery_city = r.delivery_city.clone();
        constrained.vehicle_type_ids = vec![vt_small];

        let qualified: HashSet<Uuid> = [vt_ok].into_iter().collect();
        assert!(match_directions(
            &[constrained.clone()],
            &r,
            &qualified,
            &HashSet::new()
        )
        .is_empty());

        constrained.vehicle_type_ids = vec![vt_small, vt_ok];
        assert_eq!(
            match_directions(&[constrained], &r, &qualified, &HashSet::new()).len(),
            1
        );
    }
}
