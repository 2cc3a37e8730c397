//! Quota tie-break between competing fixed directions.

use std::collections::HashMap;

use chrono::Datelike;
use uuid::Uuid;

use crate::models::{FixedDirection, Shipment};

/// Per-carrier assignment counts for one calendar month
#[derive(Debug, Clone, Default)]
pub struct MonthlyUsage {
    pub per_carrier: HashMap<Uuid, usize>,
    pub total: usize,
}

/// Tally carrier-assigned shipments whose shipping date falls in the given
/// calendar month, any year. The candidate shipment itself must already be
/// excluded from `others`.
pub fn monthly_usage(others: &[Shipment], month: u32) -> MonthlyUsage {
    let mut usage = MonthlyUsage::default();
    for s in others {
        let (Some(carrier_id), Some(date)) = (s.carrier_id, s.shipping_date) else {
            continue;
        };
        if date.month() != month {
            continue;
        }
        *usage.per_carrier.entry(carrier_id).or_insert(0) += 1;
        usage.total += 1;
    }
    usage
}

/// Remaining quota headroom if the current shipment were assigned to the
/// direction's carrier. The +1 on both sides simulates that assignment.
fn headroom(dir: &FixedDirection, usage: &MonthlyUsage) -> f64 {
    let count = usage.per_carrier.get(&dir.carrier_id).copied().unwrap_or(0);
    let percentage = (count + 1) as f64 / (usage.total + 1) as f64 * 100.0;
    dir.quota - percentage
}

/// Pick the candidate with the most quota headroom. A single candidate wins
/// unconditionally; ties keep the first-encountered direction (input order
/// is the tie-break, matching dictionary ordering).
pub fn pick_by_quota<'a>(
    candidates: &[&'a FixedDirection],
    usage: &MonthlyUsage,
) -> Option<&'a FixedDirection> {
    match candidates {
        [] => None,
        [single] => Some(single),
        _ => candidates
            .iter()
            .copied()
            .fold(None::<(&FixedDirection, f64)>, |best, dir| {
                let score = headroom(dir, usage);
                match best {
                    Some((_, best_score)) if best_score >= score => best,
                    _ => Some((dir, score)),
                }
            })
            .map(|(dir, _)| dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::models::ShipmentStatus;

    fn dir(carrier: Uuid, quota: f64) -> FixedDirection {
        FixedDirection {
            direction_id: Uuid::new_v4(),
            carrier_id: carrier,
            quota,
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

    fn assigned(carrier: Uuid, date: &str) -> Shipment {
        Shipment {
            shipment_id: Uuid::new_v4(),
            number: "SH".to_string(),
            status: ShipmentStatus::Assigned,
            shipping_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            delivery_date: None,
            pallets_count: 1,
            weight_kg: 100.0,
            carrier_id: Some(carrier),
            vehicle_type_id: None,
            body_type_id: None,
            tariffication_type: None,
            delivery_cost: None,
        }
    }

    #[test]
    fn single_candidate_wins_unconditionally() {
        let d = dir(Uuid::new_v4(), 0.0);
        let picked = pick_by_quota(&[&d], &MonthlyUsage::default());
        assert_eq!(picked.unwrap().direction_id, d.direction_id);
    }

    #[test]
    fn larger_quota_wins_with_equal_usage() {
        let sixty = dir(Uuid::new_v4(), 60.0);
        let forty = dir(Uuid::new_v4(), 40.0);
        let picked = pick_by_quota(&[&forty, &sixty], &MonthlyUsage::default());
        assert_eq!(picked.unwrap().direction_id, sixty.direction_id);
    }

    #[test]
    fn usage_erodes_headroom() {
        let busy = Uuid::new_v4();
        let idle = Uuid::new_v4();
        let busy_dir = dir(busy, 60.0);
        let idle_dir = dir(idle, 40.0);

        // busy carrier already took 3 of 3 March shipments:
        // busy headroom = 60 - (4/4)*100 = -40, idle = 40 - (1/4)*100 = 15
        let others: Vec<Shipment> = (0..3).map(|_| assigned(busy, "2026-03-05")).collect();
        let usage = monthly_usage(&others, 3);
        let picked = pick_by_quota(&[&busy_dir, &idle_dir], &usage);
        assert_eq!(picked.unwrap().carrier_id, idle);
    }

    #[test]
    fn month_matches_across_years() {
        let carrier = Uuid::new_v4();
        let others = vec![
            assigned(carrier, "2025-03-10"),
            assigned(carrier, "2026-03-10"),
            assigned(carrier, "2026-04-10"),
        ];
        let usage = monthly_usage(&others, 3);
        assert_eq!(usage.total, 2);
        assert_eq!(usage.per_carrier[&carrier], 2);
    }

    #[test]
    fn ties_keep_first_candidate() {
        let a = dir(Uuid::new_v4(), 50.0);
        let b = dir(Uuid::new_v4(), 50.0);
        let picked = pick_by_quota(&[&a, &b], &MonthlyUsage::default());
        assert_eq!(picked.unwrap().direction_id, a.direction_id);
    }

    #[test]
    fn empty_candidates_pick_nothing() {
        assert!(pick_by_quota(&[], &MonthlyUsage::default()).is_none());
    }
}
