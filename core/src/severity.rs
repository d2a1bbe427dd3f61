//! The severity scorer — a bounded composite of population pressure,
//! road blockage, and aggregate stock health.

use crate::{config::SeverityWeights, registry::ResourceMap};

/// Score a region's crisis intensity in [0, 100].
///
/// Three weighted terms: population deviation from baseline, the road
/// flag, and depletion of aggregate stock relative to baseline. Resource
/// scarcity carries the largest weight by design. Stock health is clamped
/// to [0, 1] before use so a surplus cannot push the score negative, and
/// the sum is clamped to [0, 100] at the end. Pure; no randomness.
pub fn score(
    weights: &SeverityWeights,
    population: f64,
    baseline_population: f64,
    road_blocked: bool,
    stock: &ResourceMap,
    baseline: &ResourceMap,
) -> f64 {
    let population_term = (population / baseline_population) * weights.population;
    let road_term = if road_blocked { weights.road } else { 0.0 };

    let stock_health = (stock.total() / baseline.total()).clamp(0.0, 1.0);
    let resource_term = (1.0 - stock_health) * weights.resource;

    (population_term + road_term + resource_term).clamp(0.0, 100.0)
}
