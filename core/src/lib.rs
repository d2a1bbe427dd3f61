//! reliefsim-core — the disaster-relief telemetry simulation engine.
//!
//! The engine synthesizes a temporally coherent state stream for a fixed
//! set of regions: population pressure, road blockage, warehouse stocks,
//! forward-looking needs, and a bounded severity score. Downstream
//! consumers (dashboard, allocation tooling) read the snapshot batches the
//! engine emits; nothing outside the engine ever holds a live reference to
//! region state.

pub mod config;
pub mod consumption;
pub mod engine;
pub mod error;
pub mod needs;
pub mod registry;
pub mod replenishment;
pub mod rng;
pub mod severity;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod types;
