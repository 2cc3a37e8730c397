//! Freight TMS back office: shipment/dictionary storage and the
//! carrier-selection engine.

pub mod api;
pub mod db;
pub mod fixture_names;
pub mod models;
pub mod notify;
pub mod selection;
pub mod store;

pub use selection::{CarrierSelectionService, SelectionInputs, SelectionOutcome};
pub use store::Store;
