//! Query and persistence layer over SurrealDB.
//!
//! Business keys live in plain fields (record ids stay engine-generated),
//! so every lookup and update goes through the `*_id` indexes.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::DbConn;
use crate::models::{
    Carrier, CarrierAction, CarrierRequestStat, FixedDirection, Order, Shipment,
    ShippingSchedule, Tariff, VehicleType, Warehouse,
};
use crate::selection::SelectionInputs;

/// Row counts used by the stats endpoint and the inspection CLI
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableCounts {
    pub shipments: i64,
    pub assigned_shipments: i64,
    pub orders: i64,
    pub carriers: i64,
    pub vehicle_types: i64,
    pub warehouses: i64,
    pub fixed_directions: i64,
    pub tariffs: i64,
    pub schedules: i64,
}

pub struct Store {
    db: DbConn,
}

impl Store {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DbConn {
        &self.db
    }

    async fn create<T: Serialize + Clone + Send + Sync + 'static>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<()> {
        self.db
            .query(format!("CREATE {table} CONTENT $data"))
            .bind(("data", row.clone()))
            .await?
            .check()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inserts (ingest, fixtures, tests)
    // ------------------------------------------------------------------

    pub async fn create_shipment(&self, s: &Shipment) -> Result<()> {
        self.create("shipment", s).await
    }

    pub async fn create_order(&self, o: &Order) -> Result<()> {
        self.create("orders", o).await
    }

    pub async fn create_carrier(&self, c: &Carrier) -> Result<()> {
        self.create("carrier", c).await
    }

    pub async fn create_vehicle_type(&self, v: &VehicleType) -> Result<()> {
        self.create("vehicle_type", v).await
    }

    pub async fn create_warehouse(&self, w: &Warehouse) -> Result<()> {
        self.create("warehouse", w).await
    }

    pub async fn create_fixed_direction(&self, d: &FixedDirection) -> Result<()> {
        self.create("fixed_direction", d).await
    }

    pub async fn create_tariff(&self, t: &Tariff) -> Result<()> {
        self.create("tariff", t).await
    }

    pub async fn create_schedule(&self, s: &ShippingSchedule) -> Result<()> {
        self.create("shipping_schedule", s).await
    }

    pub async fn record_carrier_action(&self, a: &CarrierAction) -> Result<()> {
        self.create("carrier_action", a).await
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub async fn get_shipment(&self, shipment_id: Uuid) -> Result<Option<Shipment>> {
        let rows: Vec<Shipment> = self
            .db
            .query("SELECT * FROM shipment WHERE shipment_id = $id")
            .bind(("id", shipment_id))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    pub async fn orders_for_shipment(&self, shipment_id: Uuid) -> Result<Vec<Order>> {
        let rows: Vec<Order> = self
            .db
            .query("SELECT * FROM orders WHERE shipment_id = $id")
            .bind(("id", shipment_id))
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn list_shipments(&self, limit: usize) -> Result<Vec<Shipment>> {
        let rows: Vec<Shipment> = self
            .db
            .query("SELECT * FROM shipment LIMIT $limit")
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Shipments without a carrier, candidates for selection
    pub async fn unassigned_shipments(&self) -> Result<Vec<Shipment>> {
        let rows: Vec<Shipment> = self
            .db
            .query("SELECT * FROM shipment WHERE carrier_id = NONE")
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Carrier-assigned shipments other than the given one; input to the
    /// monthly quota-usage tally.
    pub async fn assigned_shipments_excluding(&self, shipment_id: Uuid) -> Result<Vec<Shipment>> {
        let rows: Vec<Shipment> = self
            .db
            .query("SELECT * FROM shipment WHERE carrier_id != NONE AND shipment_id != $id")
            .bind(("id", shipment_id))
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn carriers(&self) -> Result<Vec<Carrier>> {
        Ok(self.db.query("SELECT * FROM carrier").await?.take(0)?)
    }

    pub async fn vehicle_types(&self) -> Result<Vec<VehicleType>> {
        Ok(self.db.query("SELECT * FROM vehicle_type").await?.take(0)?)
    }

    pub async fn warehouses(&self) -> Result<Vec<Warehouse>> {
        Ok(self.db.query("SELECT * FROM warehouse").await?.take(0)?)
    }

    pub async fn active_fixed_directions(&self) -> Result<Vec<FixedDirection>> {
        let rows: Vec<FixedDirection> = self
            .db
            .query("SELECT * FROM fixed_direction WHERE is_active = true")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn fixed_directions(&self) -> Result<Vec<FixedDirection>> {
        Ok(self.db.query("SELECT * FROM fixed_direction").await?.take(0)?)
    }

    pub async fn tariffs(&self) -> Result<Vec<Tariff>> {
        Ok(self.db.query("SELECT * FROM tariff").await?.take(0)?)
    }

    pub async fn schedules(&self) -> Result<Vec<ShippingSchedule>> {
        Ok(self.db.query("SELECT * FROM shipping_schedule").await?.take(0)?)
    }

    pub async fn carrier_actions_for(&self, shipment_id: Uuid) -> Result<Vec<CarrierAction>> {
        let rows: Vec<CarrierAction> = self
            .db
            .query("SELECT * FROM carrier_action WHERE shipment_id = $id")
            .bind(("id", shipment_id))
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn request_stats_for(&self, shipment_id: Uuid) -> Result<Vec<CarrierRequestStat>> {
        let rows: Vec<CarrierRequestStat> = self
            .db
            .query("SELECT * FROM carrier_request_stat WHERE shipment_id = $id")
            .bind(("id", shipment_id))
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn get_request_stat(
        &self,
        shipment_id: Uuid,
        carrier_id: Uuid,
    ) -> Result<Option<CarrierRequestStat>> {
        let rows: Vec<CarrierRequestStat> = self
            .db
            .query("SELECT * FROM carrier_request_stat WHERE shipment_id = $sid AND carrier_id = $cid")
            .bind(("sid", shipment_id))
            .bind(("cid", carrier_id))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Everything one selection call needs, materialized up front
    pub async fn load_selection_inputs(
        &self,
        shipment_id: Uuid,
    ) -> Result<Option<SelectionInputs>> {
        let Some(shipment) = self.get_shipment(shipment_id).await? else {
            return Ok(None);
        };
        let orders = self.orders_for_shipment(shipment_id).await?;
        let vehicle_types = self.vehicle_types().await?;
        let fixed_directions = self.active_fixed_directions().await?;
        let tariffs = self.tariffs().await?;
        let schedules = self.schedules().await?;
        let assigned_shipments = self.assigned_shipments_excluding(shipment_id).await?;
        let tried_carriers = self
            .carrier_actions_for(shipment_id)
            .await?
            .into_iter()
            .map(|a| a.carrier_id)
            .collect();

        Ok(Some(SelectionInputs {
            shipment,
            orders,
            vehicle_types,
            fixed_directions,
            tariffs,
            schedules,
            assigned_shipments,
            tried_carriers,
        }))
    }

    // ------------------------------------------------------------------
    // Mutations (assignment writer)
    // ------------------------------------------------------------------

    pub async fn update_shipment(&self, s: &Shipment) -> Result<()> {
        self.db
            .query("UPDATE shipment CONTENT $data WHERE shipment_id = $id")
            .bind(("data", s.clone()))
            .bind(("id", s.shipment_id))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn update_order(&self, o: &Order) -> Result<()> {
        self.db
            .query("UPDATE orders CONTENT $data WHERE order_id = $id")
            .bind(("data", o.clone()))
            .bind(("id", o.order_id))
            .await?
            .check()?;
        Ok(())
    }

    /// Stamp `sent_at` for the carrier now holding the shipment, clearing
    /// any previous rejection/confirmation on the pair's audit row.
    pub async fn mark_sent(
        &self,
        shipment_id: Uuid,
        carrier_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<()> {
        match self.get_request_stat(shipment_id, carrier_id).await? {
            Some(_) => {
                self.db
                    .query(
                        "UPDATE carrier_request_stat \
                         SET sent_at = $at, rejected_at = NONE, confirmed_at = NONE \
                         WHERE shipment_id = $sid AND carrier_id = $cid",
                    )
                    .bind(("at", at))
                    .bind(("sid", shipment_id))
                    .bind(("cid", carrier_id))
                    .await?
                    .check()?;
            }
            None => {
                let stat = CarrierRequestStat {
                    stat_id: Uuid::new_v4(),
                    shipment_id,
                    carrier_id,
                    sent_at: Some(at),
                    rejected_at: None,
                    confirmed_at: None,
                };
                self.create("carrier_request_stat", &stat).await?;
            }
        }
        Ok(())
    }

    /// Stamp `rejected_at` for a superseded carrier, creating the audit
    /// row if the pair was never recorded.
    pub async fn mark_rejected(
        &self,
        shipment_id: Uuid,
        carrier_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<()> {
        match self.get_request_stat(shipment_id, carrier_id).await? {
            Some(_) => {
                self.db
                    .query(
                        "UPDATE carrier_request_stat SET rejected_at = $at \
                         WHERE shipment_id = $sid AND carrier_id = $cid",
                    )
                    .bind(("at", at))
                    .bind(("sid", shipment_id))
                    .bind(("cid", carrier_id))
                    .await?
                    .check()?;
            }
            None => {
                let stat = CarrierRequestStat {
                    stat_id: Uuid::new_v4(),
                    shipment_id,
                    carrier_id,
                    sent_at: None,
                    rejected_at: Some(at),
                    confirmed_at: None,
                };
                self.create("carrier_request_stat", &stat).await?;
            }
        }
        Ok(())
    }

    pub async fn mark_confirmed(
        &self,
        shipment_id: Uuid,
        carrier_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<()> {
        match self.get_request_stat(shipment_id, carrier_id).await? {
            Some(_) => {
                self.db
                    .query(
                        "UPDATE carrier_request_stat SET confirmed_at = $at \
                         WHERE shipment_id = $sid AND carrier_id = $cid",
                    )
                    .bind(("at", at))
                    .bind(("sid", shipment_id))
                    .bind(("cid", carrier_id))
                    .await?
                    .check()?;
            }
            None => {
                let stat = CarrierRequestStat {
                    stat_id: Uuid::new_v4(),
                    shipment_id,
                    carrier_id,
                    sent_at: None,
                    rejected_at: None,
                    confirmed_at: Some(at),
                };
                self.create("carrier_request_stat", &stat).await?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------

    async fn count(&self, table: &str) -> Result<i64> {
        let n: Option<i64> = self
            .db
            .query(format!("SELECT count() FROM {table} GROUP ALL"))
            .await?
            .take("count")?;
        Ok(n.unwrap_or(0))
    }

    pub async fn counts(&self) -> Result<TableCounts> {
        let assigned: Option<i64> = self
            .db
            .query("SELECT count() FROM shipment WHERE carrier_id != NONE GROUP ALL")
            .await?
            .take("count")?;

        Ok(TableCounts {
            shipments: self.count("shipment").await?,
            assigned_shipments: assigned.unwrap_or(0),
            orders: self.count("orders").await?,
            carriers: self.count("carrier").await?,
            vehicle_types: self.count("vehicle_type").await?,
            warehouses: self.count("warehouse").await?,
            fixed_directions: self.count("fixed_direction").await?,
            tariffs: self.count("tariff").await?,
            schedules: self.count("shipping_schedule").await?,
        })
    }
}
