//! Carrier notification boundary.
//!
//! The back office dispatches an assignment notice to the chosen transport
//! company after every (re)assignment. The transport itself lives outside
//! this service; production deployments plug their own dispatcher in here.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::models::Shipment;

#[async_trait]
pub trait CarrierNotifier: Send + Sync {
    async fn notify_assignment(&self, shipment: &Shipment, carrier_id: Uuid) -> Result<()>;
}

/// Default dispatcher: structured log record per notification
pub struct LogNotifier;

#[async_trait]
impl CarrierNotifier for LogNotifier {
    async fn notify_assignment(&self, shipment: &Shipment, carrier_id: Uuid) -> Result<()> {
        info!(
            shipment_id = %shipment.shipment_id,
            number = %shipment.number,
            carrier_id = %carrier_id,
            "carrier request dispatched"
        );
        Ok(())
    }
}
