//! The needs estimator — forward-looking resource requirements derived
//! from stock depletion and population pressure, independent of what was
//! actually consumed this step.

use crate::{
    config::NeedsConfig,
    error::{SimError, SimResult},
    registry::{ResourceKind, ResourceMap},
    rng::RandomSource,
};

/// Estimate per-kind needs.
///
/// raw = baseline × (ceiling − stock/baseline) × (population / reference),
/// floored at zero so an overstocked region never reports negative need,
/// then scaled by a surge multiplier drawn per kind.
///
/// Zero baselines cannot occur through a validated registry; the guard
/// stays because a division by zero here would poison the whole state
/// stream with NaN.
pub fn estimate(
    cfg: &NeedsConfig,
    stock: &ResourceMap,
    baseline: &ResourceMap,
    population: f64,
    reference_population: f64,
    rng: &mut dyn RandomSource,
) -> SimResult<ResourceMap> {
    if reference_population <= 0.0 {
        return Err(SimError::Config(format!(
            "reference population must be > 0, got {reference_population}"
        )));
    }
    let population_factor = population / reference_population;

    let mut needs = ResourceMap::zero();
    for kind in ResourceKind::ALL {
        let base = *baseline.get(kind);
        if base <= 0.0 {
            return Err(SimError::Config(format!(
                "baseline {} stock must be > 0, got {base}",
                kind.name()
            )));
        }
        let stock_ratio = stock.get(kind) / base;
        let raw = (base * (cfg.demand_ceiling - stock_ratio) * population_factor).max(0.0);
        let surge = rng.uniform(cfg.surge.lo, cfg.surge.hi);
        *needs.get_mut(kind) = raw * surge;
    }
    Ok(needs)
}
