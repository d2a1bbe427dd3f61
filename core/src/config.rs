//! Simulation tuning constants.
//!
//! The rate and weight constants are configuration, not invariants:
//! only the term structure and the clamps are contractual. Defaults are
//! the canonical values; a JSON file in the data directory overrides
//! them. A config that fails validation is fatal at startup.

use crate::{
    error::{SimError, SimResult},
    registry::{PerKind, ResourceMap},
};
use serde::{Deserialize, Serialize};

/// A half-open uniform draw range [lo, hi).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub lo: f64,
    pub hi: f64,
}

impl UniformRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    fn validate(&self, what: &str) -> SimResult<()> {
        if !(self.lo.is_finite() && self.hi.is_finite() && self.lo <= self.hi) {
            return Err(SimError::Config(format!(
                "{what}: invalid range [{}, {}]",
                self.lo, self.hi
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionConfig {
    /// Per-capita consumption per hour, by kind.
    pub hourly_rates: ResourceMap,
    /// Multiplicative variance applied independently per kind.
    pub variance: UniformRange,
    /// Probability of an emergency event per invocation (not per kind).
    pub emergency_probability: f64,
    /// Per-kind amplification u; consumption is multiplied by (1 + u).
    pub emergency_surge: PerKind<UniformRange>,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            hourly_rates: ResourceMap {
                food: 0.08,
                water: 0.15,
                medical: 0.04,
            },
            variance: UniformRange::new(0.7, 1.3),
            emergency_probability: 0.10,
            emergency_surge: PerKind {
                food: UniformRange::new(0.2, 0.4),
                water: UniformRange::new(0.3, 0.5),
                medical: UniformRange::new(0.4, 0.6),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentConfig {
    /// Restock when stock drops below threshold × baseline.
    pub threshold: f64,
    /// Restock amount as a fraction of baseline.
    pub fraction: f64,
}

impl Default for ReplenishmentConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            fraction: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedsConfig {
    /// Stock ratio at which estimated need reaches zero.
    pub demand_ceiling: f64,
    /// Surge multiplier drawn per kind.
    pub surge: UniformRange,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            demand_ceiling: 1.5,
            surge: UniformRange::new(1.0, 1.5),
        }
    }
}

/// Severity term weights. Resource scarcity dominates by design; the sum
/// is the score ceiling before the final [0, 100] clamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityWeights {
    pub population: f64,
    pub road: f64,
    pub resource: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            population: 30.0,
            road: 20.0,
            resource: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub consumption: ConsumptionConfig,
    pub replenishment: ReplenishmentConfig,
    pub needs: NeedsConfig,
    pub severity: SeverityWeights,
    /// Population perturbation per step, as a fraction of current population.
    pub population_drift: f64,
    /// Probability the road-block flag flips per step.
    pub road_flip_probability: f64,
    /// Wall-clock seconds between steps. Consumed by the runner, not core.
    pub step_interval_secs: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            consumption: ConsumptionConfig::default(),
            replenishment: ReplenishmentConfig::default(),
            needs: NeedsConfig::default(),
            severity: SeverityWeights::default(),
            population_drift: 0.005,
            road_flip_probability: 0.10,
            step_interval_secs: 3,
        }
    }
}

fn check_probability(p: f64, what: &str) -> SimResult<()> {
    if !(0.0..=1.0).contains(&p) || !p.is_finite() {
        return Err(SimError::Config(format!(
            "{what}: probability must be in [0, 1], got {p}"
        )));
    }
    Ok(())
}

impl SimConfig {
    /// Load from a JSON file. Missing fields fall back to defaults;
    /// the merged result is validated like any other config.
    pub fn load(path: &str) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("cannot read {path}: {e}")))?;
        let config: SimConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        for (kind, &rate) in self.consumption.hourly_rates.iter() {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(SimError::Config(format!(
                    "consumption rate for {} must be > 0, got {rate}",
                    kind.name()
                )));
            }
        }
        self.consumption.variance.validate("consumption variance")?;
        check_probability(self.consumption.emergency_probability, "emergency")?;
        for (kind, range) in self.consumption.emergency_surge.iter() {
            range.validate(&format!("emergency surge for {}", kind.name()))?;
        }

        if !(0.0..=1.0).contains(&self.replenishment.threshold) {
            return Err(SimError::Config(format!(
                "replenishment threshold must be in [0, 1], got {}",
                self.replenishment.threshold
            )));
        }
        if !self.replenishment.fraction.is_finite() || self.replenishment.fraction < 0.0 {
            return Err(SimError::Config(format!(
                "replenishment fraction must be >= 0, got {}",
                self.replenishment.fraction
            )));
        }

        if !self.needs.demand_ceiling.is_finite() || self.needs.demand_ceiling <= 0.0 {
            return Err(SimError::Config(format!(
                "needs demand ceiling must be > 0, got {}",
                self.needs.demand_ceiling
            )));
        }
        self.needs.surge.validate("needs surge")?;

        for (weight, name) in [
            (self.severity.population, "population"),
            (self.severity.road, "road"),
            (self.severity.resource, "resource"),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SimError::Config(format!(
                    "severity {name} weight must be >= 0, got {weight}"
                )));
            }
        }

        if !self.population_drift.is_finite() || self.population_drift < 0.0 {
            return Err(SimError::Config(format!(
                "population drift must be >= 0, got {}",
                self.population_drift
            )));
        }
        check_probability(self.road_flip_probability, "road flip")?;
        Ok(())
    }
}
