//! Data layer between `hwdash-api` and the dashboard front ends.
//!
//! - **[`Backend`]**: Cloneable facade over the inventory and metrics
//!   clients. Converts wire types into the [`model`] and vends
//!   [`FetchHandle`]s for reads that revalidate.
//!
//! - **[`FetchHandle<T>`]**: `{data, error, is_validating}` state of one
//!   read, published through a `watch` channel. Stale data survives
//!   revalidation and failure.
//!
//! - **List filters** ([`filter`]): Per-table query state with debounced
//!   settling and a memoised filtered view: [`NodeListFilter`],
//!   [`ResourceListFilter`], [`CxlSwitchListFilter`],
//!   [`ResourceGroupListFilter`].
//!
//! - **Metric parsers** ([`metrics`]): Turn metrics-backend responses into
//!   histogram, storage and time-series view data.

pub mod backend;
pub mod config;
pub mod convert;
pub mod derived;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod metrics;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::Backend;
pub use config::{BackendConfig, TlsVerification};
pub use error::CoreError;
pub use fetch::{FetchHandle, FetchState};
pub use filter::{
    CxlSwitchListFilter, DebounceTiming, ListFilter, NodeListFilter, ResourceGroupListFilter,
    ResourceListFilter,
};

pub use model::{
    AllocationStatus, Availability, CxlSwitch, Detection, Device, DeviceHealth, DeviceState,
    DeviceType, EntityId, Node, NodeSummary, Resource, ResourceGroup, ResourceSummary,
};
