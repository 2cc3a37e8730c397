//! REST API for the TMS back office.
//!
//! Thin axum handlers over the shared `CarrierSelectionService`.

pub mod handlers;

pub use handlers::{router, AppState};
