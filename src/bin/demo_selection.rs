//! Carrier Selection Demo
//! Dry-runs the selection engine over every unassigned shipment.
//! Run: ./target/release/demo_selection [db-path]

use anyhow::Result;
use freight_tms::models::SelectionKind;
use freight_tms::{db, CarrierSelectionService, Store};
use std::collections::HashMap;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let db_path = std::env::args().nth(1).unwrap_or_else(|| "data/tms.db".to_string());
    let db = db::connect(&db_path).await?;
    let service = CarrierSelectionService::new(Store::new(db));

    println!("\n{}", "=".repeat(80));
    println!("                    CARRIER SELECTION DRY RUN");
    println!("{}\n", "=".repeat(80));

    let carrier_names: HashMap<Uuid, String> = service
        .store()
        .carriers()
        .await?
        .into_iter()
        .map(|c| (c.carrier_id, c.name))
        .collect();

    let pending = service.store().unassigned_shipments().await?;
    println!("{} shipments without a carrier\n", pending.len());

    println!(
        "  {:14} {:>8} {:>10} {:16} {:24} {:>10}",
        "Shipment", "Pallets", "Weight kg", "Selection", "Carrier", "Cost"
    );
    println!("  {}", "-".repeat(88));

    let mut fixed = 0;
    let mut best_cost = 0;
    let mut unmatched = 0;

    for shipment in &pending {
        let outcome = service.find_carrier(shipment.shipment_id, &[]).await?;

        let kind = match outcome.kind {
            SelectionKind::FixedDirection => {
                fixed += 1;
                "FixedDirection"
            }
            SelectionKind::BestCost => {
                best_cost += 1;
                "BestCost"
            }
            SelectionKind::None => {
                unmatched += 1;
                "-"
            }
        };
        let carrier = outcome
            .carrier_id
            .and_then(|id| carrier_names.get(&id).cloned())
            .unwrap_or_else(|| "-".to_string());
        let cost = outcome
            .tariff
            .as_ref()
            .and_then(|t| t.delivery_cost(shipment.pallets_count))
            .map(|c| format!("{c:.2}"))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:14} {:>8} {:>10.0} {:16} {:24} {:>10}",
            shipment.number, shipment.pallets_count, shipment.weight_kg, kind, carrier, cost
        );
    }

    println!("\n{}", "-".repeat(88));
    println!(
        "  fixed direction: {}   best cost: {}   no carrier: {}",
        fixed, best_cost, unmatched
    );
    println!();

    Ok(())
}
