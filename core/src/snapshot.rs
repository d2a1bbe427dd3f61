//! Snapshots — the only artifact exposed to external collaborators.
//!
//! A snapshot is a pure function of a region's committed state; it has no
//! identity beyond a single step. Each step's batch fully replaces the
//! previous one at the sink, and the field set never changes, so
//! downstream consumers can diff batches reliably.

use crate::{
    config::SeverityWeights,
    error::SimResult,
    registry::{RegionBaseline, ResourceMap},
    severity,
    state::RegionState,
    types::RegionId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub region_id: RegionId,
    pub region_name: String,
    /// Integer-truncated population.
    pub population: i64,
    pub road_blocked: bool,
    pub stock: ResourceMap,
    pub needs: ResourceMap,
    /// Always within [0, 100].
    pub severity: f64,
    pub timestamp: DateTime<Utc>,
}

impl RegionSnapshot {
    /// Derive the externally visible record from a committed state.
    pub fn of(baseline: &RegionBaseline, state: &RegionState, weights: &SeverityWeights) -> Self {
        Self {
            region_id: baseline.id,
            region_name: baseline.name.clone(),
            population: state.population.trunc() as i64,
            road_blocked: state.road_blocked,
            stock: state.stock,
            needs: state.needs,
            severity: severity::score(
                weights,
                state.population,
                baseline.baseline_population,
                state.road_blocked,
                &state.stock,
                &baseline.baseline_stock,
            ),
            timestamp: state.last_update,
        }
    }
}

/// The emission interface: one call per step, replacing the entire
/// previously emitted dataset. No partial updates, no append semantics.
pub trait SnapshotSink: Send {
    fn replace_all(&mut self, batch: &[RegionSnapshot]) -> SimResult<()>;
}

/// Sink that keeps only the latest batch in memory. Used in tests and by
/// tooling that inspects batches without a database.
#[derive(Default)]
pub struct MemorySink {
    pub latest: Vec<RegionSnapshot>,
}

impl SnapshotSink for MemorySink {
    fn replace_all(&mut self, batch: &[RegionSnapshot]) -> SimResult<()> {
        self.latest = batch.to_vec();
        Ok(())
    }
}
