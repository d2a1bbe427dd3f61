//! The consumption model — how much of each resource a region burns
//! through over an elapsed interval.
//!
//! DRAW ORDER (fixed, never reordered — replays depend on it):
//!   1. variance multiplier per kind, in ResourceKind::ALL order
//!   2. one emergency chance for the whole invocation
//!   3. if it fired, one surge draw per kind, in ALL order

use crate::{
    config::ConsumptionConfig,
    error::{SimError, SimResult},
    registry::{PerKind, ResourceKind, ResourceMap},
    rng::RandomSource,
};

/// Compute per-kind consumption for one region over `elapsed_hours`.
///
/// Base consumption is population × hourly rate × elapsed hours, with a
/// multiplicative variance per kind. An emergency event, when it fires,
/// amplifies every kind in the same invocation — it is a whole-region
/// shock, not an independent per-resource one.
///
/// Negative elapsed time means the caller's clock went backwards; that is
/// a logic fault, not a value to silently clamp.
pub fn compute(
    cfg: &ConsumptionConfig,
    population: f64,
    elapsed_hours: f64,
    rng: &mut dyn RandomSource,
) -> SimResult<ResourceMap> {
    if elapsed_hours < 0.0 {
        return Err(SimError::NegativeElapsed {
            hours: elapsed_hours,
        });
    }

    let mut consumed = PerKind::build(|kind| {
        let base = population * cfg.hourly_rates.get(kind) * elapsed_hours;
        base * rng.uniform(cfg.variance.lo, cfg.variance.hi)
    });

    if rng.chance(cfg.emergency_probability) {
        log::debug!("emergency consumption event triggered");
        for kind in ResourceKind::ALL {
            let range = cfg.emergency_surge.get(kind);
            let surge = 1.0 + rng.uniform(range.lo, range.hi);
            *consumed.get_mut(kind) *= surge;
        }
    }

    Ok(consumed)
}
