// hwdash-api: Async Rust client for the inventory REST backend and the
// time-series metrics backend.

pub mod error;
pub mod inventory;
pub mod metrics;
pub mod models;
pub mod transport;

pub use error::Error;
pub use inventory::InventoryClient;
pub use metrics::MetricsClient;
pub use transport::{TlsMode, TransportConfig};
