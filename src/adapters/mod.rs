// Adapters layer: concrete implementations for external systems (stores, HTTP server, HTTP client).

pub mod client;
pub mod csv_store;
pub mod http;
pub mod memory;
