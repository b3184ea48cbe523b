pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::client::FleetClient;
pub use adapters::csv_store::CsvRouteLoader;
pub use adapters::http::{build_router, AppState};
pub use adapters::memory::InMemoryRouteRepository;
pub use config::AppConfig;
pub use crate::core::{compliance_service::ComplianceService, route_service::RouteService};
pub use utils::error::{FleetError, Result};
