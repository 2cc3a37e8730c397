//! Assignment writer and audit trail: shipment/order propagation, the
//! sent/rejected/confirmed stamps and the reassignment exclusion loop.

mod common;

use anyhow::Result;
use common::*;
use freight_tms::models::TarifficationType;
use uuid::Uuid;

#[tokio::test]
async fn assignment_writes_shipment_orders_and_audit() -> Result<()> {
    let service = service().await?;
    let store = service.store();

    let carrier = Uuid::new_v4();
    store.create_tariff(&ftl_tariff(carrier, "New York", "Boston", 3_000.0)).await?;

    let s = shipment(10, 4_000.0);
    store.create_shipment(&s).await?;
    store.create_order(&order_for(&s, "New York", "Boston", 6)).await?;
    store.create_order(&order_for(&s, "New York", "Boston", 4)).await?;

    let outcome = service.find_and_update_carrier(s.shipment_id, &[]).await?;
    assert_eq!(outcome.carrier_id, Some(carrier));

    let updated = store.get_shipment(s.shipment_id).await?.unwrap();
    assert_eq!(updated.carrier_id, Some(carrier));
    assert_eq!(updated.tariffication_type, Some(TarifficationType::Ftl));
    assert_eq!(updated.delivery_cost, Some(3_000.0));

    // Orders mirror the shipment, cost split pro-rata by pallets
    let orders = store.orders_for_shipment(s.shipment_id).await?;
    assert_eq!(orders.len(), 2);
    for order in &orders {
        assert_eq!(order.carrier_id, Some(carrier));
        assert_eq!(order.tariffication_type, Some(TarifficationType::Ftl));
    }
    let mut costs: Vec<f64> = orders.iter().filter_map(|o| o.delivery_cost).collect();
    costs.sort_by(f64::total_cmp);
    assert_eq!(costs, vec![1_200.0, 1_800.0]);

    // Audit: sent stamped, action recorded
    let stat = store.get_request_stat(s.shipment_id, carrier).await?.unwrap();
    assert!(stat.sent_at.is_some());
    assert!(stat.rejected_at.is_none());
    assert!(stat.confirmed_at.is_none());
    let actions = store.carrier_actions_for(s.shipment_id).await?;
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].carrier_id, carrier);
    Ok(())
}

#[tokio::test]
async fn reassignment_rejects_previous_carrier() -> Result<()> {
    let service = service().await?;
    let store = service.store();

    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let first_tariff = ftl_tariff(first, "New York", "Boston", 1_000.0);
    let second_tariff = ftl_tariff(second, "New York", "Boston", 2_500.0);
    store.create_tariff(&first_tariff).await?;
    store.create_tariff(&second_tariff).await?;

    let s = shipment(10, 4_000.0);
    store.create_shipment(&s).await?;
    store.create_order(&order_for(&s, "New York", "Boston", 10)).await?;

    service.update_carrier(s.shipment_id, first, Some(&first_tariff), None).await?;
    service.update_carrier(s.shipment_id, second, Some(&second_tariff), None).await?;

    let old_stat = store.get_request_stat(s.shipment_id, first).await?.unwrap();
    assert!(old_stat.rejected_at.is_some());

    let new_stat = store.get_request_stat(s.shipment_id, second).await?.unwrap();
    assert!(new_stat.sent_at.is_some());
    assert!(new_stat.rejected_at.is_none());

    let updated = store.get_shipment(s.shipment_id).await?.unwrap();
    assert_eq!(updated.carrier_id, Some(second));
    Ok(())
}

#[tokio::test]
async fn tried_carrier_is_excluded_on_reselection() -> Result<()> {
    let service = service().await?;
    let store = service.store();

    let cheap = Uuid::new_v4();
    let dear = Uuid::new_v4();
    store.create_tariff(&ftl_tariff(cheap, "New York", "Boston", 1_000.0)).await?;
    store.create_tariff(&ftl_tariff(dear, "New York", "Boston", 3_000.0)).await?;

    let s = shipment(10, 4_000.0);
    store.create_shipment(&s).await?;
    store.create_order(&order_for(&s, "New York", "Boston", 10)).await?;

    let first = service.find_and_update_carrier(s.shipment_id, &[]).await?;
    assert_eq!(first.carrier_id, Some(cheap));

    // The recorded carrier action keeps the first carrier out of the rerun
    let second = service.find_and_update_carrier(s.shipment_id, &[]).await?;
    assert_eq!(second.carrier_id, Some(dear));

    let rejected = store.get_request_stat(s.shipment_id, cheap).await?.unwrap();
    assert!(rejected.rejected_at.is_some());
    Ok(())
}

#[tokio::test]
async fn tariff_fills_only_unset_shipment_fields() -> Result<()> {
    let service = service().await?;
    let store = service.store();

    let carrier = Uuid::new_v4();
    let tariff = ftl_tariff(carrier, "New York", "Boston", 3_000.0);
    store.create_tariff(&tariff).await?;

    // Dispatcher already fixed the tariffication by hand
    let mut s = shipment(10, 4_000.0);
    s.tariffication_type = Some(TarifficationType::Ltl);
    store.create_shipment(&s).await?;
    store.create_order(&order_for(&s, "New York", "Boston", 10)).await?;

    service.update_carrier(s.shipment_id, carrier, Some(&tariff), None).await?;

    let updated = store.get_shipment(s.shipment_id).await?.unwrap();
    assert_eq!(updated.tariffication_type, Some(TarifficationType::Ltl));
    // Cost still comes from the committed tariff
    assert_eq!(updated.delivery_cost, Some(3_000.0));
    Ok(())
}

#[tokio::test]
async fn multi_vehicle_direction_applies_smallest_fitting_vehicle() -> Result<()> {
    let service = service().await?;
    let store = service.store();

    let carrier = Uuid::new_v4();
    let small = box_truck();
    let big = semi_trailer();
    store.create_vehicle_type(&small).await?;
    store.create_vehicle_type(&big).await?;

    // Contract allows both trucks; no tariff prices the route
    let mut direction = city_direction(carrier, "New York", "Boston", 50.0);
    direction.vehicle_type_ids = vec![big.vehicle_type_id, small.vehicle_type_id];
    store.create_fixed_direction(&direction).await?;

    let s = shipment(8, 2_000.0);
    store.create_shipment(&s).await?;
    store.create_order(&order_for(&s, "New York", "Boston", 8)).await?;

    let outcome = service.find_and_update_carrier(s.shipment_id, &[]).await?;
    assert_eq!(outcome.carrier_id, Some(carrier));
    assert!(outcome.tariff.is_none());
    assert_eq!(outcome.vehicle_type_id, Some(small.vehicle_type_id));

    let updated = store.get_shipment(s.shipment_id).await?.unwrap();
    assert_eq!(updated.vehicle_type_id, Some(small.vehicle_type_id));

    let orders = store.orders_for_shipment(s.shipment_id).await?;
    assert_eq!(orders[0].vehicle_type_id, Some(small.vehicle_type_id));
    Ok(())
}

#[tokio::test]
async fn confirm_stamps_the_audit_row() -> Result<()> {
    let service = service().await?;
    let store = service.store();

    let carrier = Uuid::new_v4();
    store.create_tariff(&ftl_tariff(carrier, "New York", "Boston", 3_000.0)).await?;

    let s = shipment(10, 4_000.0);
    store.create_shipment(&s).await?;
    store.create_order(&order_for(&s, "New York", "Boston", 10)).await?;

    service.find_and_update_carrier(s.shipment_id, &[]).await?;
    service.confirm_carrier(s.shipment_id).await?;

    let stat = store.get_request_stat(s.shipment_id, carrier).await?.unwrap();
    assert!(stat.sent_at.is_some());
    assert!(stat.confirmed_at.is_some());
    Ok(())
}

#[tokio::test]
async fn confirm_without_carrier_is_an_error() -> Result<()> {
    let service = service().await?;
    let store = service.store();

    let s = shipment(10, 4_000.0);
    store.create_shipment(&s).await?;

    assert!(service.confirm_carrier(s.shipment_id).await.is_err());
    Ok(())
}

#[tokio::test]
async fn no_candidate_leaves_shipment_untouched() -> Result<()> {
    let service = service().await?;
    let store = service.store();

    let s = shipment(10, 4_000.0);
    store.create_shipment(&s).await?;
    store.create_order(&order_for(&s, "New York", "Boston", 10)).await?;

    let outcome = service.find_and_update_carrier(s.shipment_id, &[]).await?;
    assert!(outcome.carrier_id.is_none());

    let untouched = store.get_shipment(s.shipment_id).await?.unwrap();
    assert!(untouched.carrier_id.is_none());
    assert!(store.request_stats_for(s.shipment_id).await?.is_empty());
    Ok(())
}
