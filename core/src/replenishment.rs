//! The replenishment policy — deterministic restocking once depletion
//! crosses the threshold. No randomness; pure function of its inputs.

use crate::{
    config::ReplenishmentConfig,
    registry::{PerKind, ResourceMap},
};

/// For each kind independently: if stock fell below threshold × baseline,
/// add fraction × baseline. Results are clamped at zero; consumption
/// already clamps, but the non-negative invariant is enforced here too.
pub fn apply(
    cfg: &ReplenishmentConfig,
    stock_after_consumption: &ResourceMap,
    baseline: &ResourceMap,
) -> ResourceMap {
    PerKind::build(|kind| {
        let current = *stock_after_consumption.get(kind);
        let base = *baseline.get(kind);
        let restocked = if current < base * cfg.threshold {
            current + base * cfg.fraction
        } else {
            current
        };
        restocked.max(0.0)
    })
}
