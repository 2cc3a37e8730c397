//! REST API server for the freight TMS back office.
//!
//! Usage:
//!   ./target/release/api_server [options]
//!
//! Options:
//!   --port PORT       Port to listen on (default: 8080)
//!   --db-path PATH    Path to SurrealDB database (default: data/tms.db)
//!
//! REST endpoints:
//!   GET  /api/v1/health                        - Health check
//!   GET  /api/v1/stats                         - Database statistics
//!   GET  /api/v1/shipments                     - Shipments (optional ?limit=N)
//!   GET  /api/v1/shipments/:id                 - Shipment with its orders
//!   GET  /api/v1/carriers                      - Carrier dictionary
//!   GET  /api/v1/fixed-directions              - Fixed-direction rules
//!   POST /api/v1/shipments/:id/carrier/find    - Dry-run carrier selection
//!   POST /api/v1/shipments/:id/carrier/assign  - Select and commit a carrier
//!   POST /api/v1/shipments/:id/carrier/reject  - Reject current carrier, reassign
//!   POST /api/v1/shipments/:id/carrier/confirm - Confirm current carrier

use anyhow::Result;
use freight_tms::api;
use freight_tms::{db, CarrierSelectionService, Store};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_banner(port: u16) {
    println!("============================================================");
    println!("             FREIGHT TMS BACK OFFICE API SERVER");
    println!("============================================================");
    println!();
    println!("  Port:     {}", port);
    println!("  REST:     http://localhost:{}/api/v1/", port);
    println!();
    println!("REST Endpoints:");
    println!("  GET  /api/v1/health                        Health check");
    println!("  GET  /api/v1/stats                         Database statistics");
    println!("  GET  /api/v1/shipments                     Shipments");
    println!("  GET  /api/v1/shipments/:id                 Shipment detail");
    println!("  GET  /api/v1/carriers                      Carriers");
    println!("  GET  /api/v1/fixed-directions              Fixed directions");
    println!("  POST /api/v1/shipments/:id/carrier/find    Dry-run selection");
    println!("  POST /api/v1/shipments/:id/carrier/assign  Assign carrier");
    println!("  POST /api/v1/shipments/:id/carrier/reject  Reject + reassign");
    println!("  POST /api/v1/shipments/:id/carrier/confirm Confirm carrier");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut port: u16 = 8080;
    let mut db_path = "data/tms.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                i += 1;
                if i < args.len() {
                    port = args[i].parse().unwrap_or(8080);
                }
            }
            "--db-path" => {
                i += 1;
                if i < args.len() {
                    db_path = args[i].clone();
                }
            }
            _ => {}
        }
        i += 1;
    }

    print_banner(port);

    let db = db::connect(&db_path).await?;
    db::init_schema(&db).await?;
    let service = Arc::new(CarrierSelectionService::new(Store::new(db)));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
