//! Mutable per-region state, owned exclusively by the simulation engine.
//!
//! RULE: Nothing outside the engine writes RegionState. External readers
//! only ever see owned RegionSnapshot values taken at commit time.

use crate::registry::{RegionBaseline, ResourceMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One region's live state. Invariants held by the engine:
/// population, every stock and every need are >= 0, and last_update is
/// monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionState {
    pub population: f64,
    pub road_blocked: bool,
    pub stock: ResourceMap,
    pub needs: ResourceMap,
    pub last_update: DateTime<Utc>,
}

impl RegionState {
    /// Seed state from a baseline: full stock, baseline population,
    /// roads clear, no estimated needs until the first step runs.
    pub fn seed(baseline: &RegionBaseline, now: DateTime<Utc>) -> Self {
        Self {
            population: baseline.baseline_population,
            road_blocked: false,
            stock: baseline.baseline_stock,
            needs: ResourceMap::zero(),
            last_update: now,
        }
    }
}
