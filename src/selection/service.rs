//! Orchestrating service: load the selection snapshot, decide, persist.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::models::{CarrierAction, Tariff};
use crate::notify::{CarrierNotifier, LogNotifier};
use crate::selection::{decide, SelectionOutcome};
use crate::store::Store;

pub struct CarrierSelectionService {
    store: Store,
    notifier: Arc<dyn CarrierNotifier>,
    /// Serializes read-decide-write assignment cycles so two concurrent
    /// selections cannot both read pre-update monthly quota counts.
    assign_lock: Mutex<()>,
}

impl CarrierSelectionService {
    pub fn new(store: Store) -> Self {
        Self::with_notifier(store, Arc::new(LogNotifier))
    }

    pub fn with_notifier(store: Store, notifier: Arc<dyn CarrierNotifier>) -> Self {
        Self {
            store,
            notifier,
            assign_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Decision only; nothing is written. "No carrier" is a valid outcome.
    pub async fn find_carrier(
        &self,
        shipment_id: Uuid,
        ignored_carrier_ids: &[Uuid],
    ) -> Result<SelectionOutcome> {
        let inputs = self
            .store
            .load_selection_inputs(shipment_id)
            .await?
            .with_context(|| format!("shipment {shipment_id} not found"))?;
        Ok(decide(&inputs, ignored_carrier_ids))
    }

    /// Commit a resolved carrier (and optional tariff) onto the shipment and
    /// its orders, maintaining the request audit trail, then notify the
    /// carrier.
    pub async fn update_carrier(
        &self,
        shipment_id: Uuid,
        carrier_id: Uuid,
        tariff: Option<&Tariff>,
        vehicle_type_id: Option<Uuid>,
    ) -> Result<()> {
        let mut shipment = self
            .store
            .get_shipment(shipment_id)
            .await?
            .with_context(|| format!("shipment {shipment_id} not found"))?;
        let orders = self.store.orders_for_shipment(shipment_id).await?;
        let now = Utc::now();

        // The superseded carrier keeps its audit row, stamped rejected
        if let Some(old_carrier) = shipment.carrier_id {
            if old_carrier != carrier_id {
                self.store.mark_rejected(shipment_id, old_carrier, now).await?;
                info!(
                    shipment_id = %shipment_id,
                    old_carrier_id = %old_carrier,
                    new_carrier_id = %carrier_id,
                    "previous carrier rejected"
                );
            }
        }

        shipment.carrier_id = Some(carrier_id);
        if let Some(vt) = vehicle_type_id {
            // Explicit upgrade from the selection outcome overwrites
            shipment.vehicle_type_id = Some(vt);
        }
        if let Some(t) = tariff {
            // Tariff values fill only fields the shipment left unset
            if shipment.tariffication_type.is_none() {
                shipment.tariffication_type = Some(t.tariffication_type);
            }
            if shipment.vehicle_type_id.is_none() {
                shipment.vehicle_type_id = t.vehicle_type_id;
            }
            if shipment.body_type_id.is_none() {
                shipment.body_type_id = t.body_type_id;
            }
            shipment.delivery_cost = t.delivery_cost(shipment.pallets_count);
        }

        // Orders mirror the shipment; delivery cost splits pro-rata by pallets
        let total_pallets: i32 = orders.iter().map(|o| o.pallets_count.max(0)).sum();
        for mut order in orders {
            order.carrier_id = shipment.carrier_id;
            order.vehicle_type_id = shipment.vehicle_type_id;
            order.body_type_id = shipment.body_type_id;
            order.tariffication_type = shipment.tariffication_type;
            order.delivery_cost = shipment.delivery_cost.map(|cost| {
                if total_pallets > 0 {
                    cost * order.pallets_count.max(0) as f64 / total_pallets as f64
                } else {
                    cost
                }
            });
            self.store.update_order(&order).await?;
        }
        self.store.update_shipment(&shipment).await?;

        self.store.mark_sent(shipment_id, carrier_id, now).await?;
        self.store
            .record_carrier_action(&CarrierAction {
                action_id: Uuid::new_v4(),
                shipment_id,
                carrier_id,
                created_at: now,
            })
            .await?;

        self.notifier.notify_assignment(&shipment, carrier_id).await?;
        Ok(())
    }

    /// Find a carrier and, when one qualifies, commit it. Holds the
    /// assignment lock across the whole cycle.
    pub async fn find_and_update_carrier(
        &self,
        shipment_id: Uuid,
        ignored_carrier_ids: &[Uuid],
    ) -> Result<SelectionOutcome> {
        let _guard = self.assign_lock.lock().await;
        let outcome = self.find_carrier(shipment_id, ignored_carrier_ids).await?;
        if let Some(carrier_id) = outcome.carrier_id {
            self.update_carrier(
                shipment_id,
                carrier_id,
                outcome.tariff.as_ref(),
                outcome.vehicle_type_id,
            )
            .await?;
        }
        Ok(outcome)
    }

    /// Stamp the active carrier's confirmation on the audit trail
    pub async fn confirm_carrier(&self, shipment_id: Uuid) -> Result<()> {
        let shipment = self
            .store
            .get_shipment(shipment_id)
            .await?
            .with_context(|| format!("shipment {shipment_id} not found"))?;
        let Some(carrier_id) = shipment.carrier_id else {
            bail!("shipment {shipment_id} has no carrier to confirm");
        };
        self.store
            .mark_confirmed(shipment_id, carrier_id, Utc::now())
            .await?;
        info!(
            shipment_id = %shipment_id,
            carrier_id = %carrier_id,
            "carrier confirmed"
        );
        Ok(())
    }
}
