//! The Region Registry — immutable per-region baseline parameters.
//!
//! RULE: Registry values never change after startup. The engine reads
//! baselines every step; a mutated baseline would mean a leaked write.
//! Malformed registries are fatal: validation runs in the constructor
//! and the process refuses to run with a bad one.

use crate::{
    error::{SimError, SimResult},
    types::RegionId,
};
use serde::{Deserialize, Serialize};

/// The closed set of tracked resource kinds. All consumption, need, and
/// replenishment formulas are keyed by this enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Food,
    Water,
    Medical,
}

impl ResourceKind {
    /// Iteration order for every per-kind loop in the simulation.
    /// Fixed: reordering would change RNG draw order and break replays.
    pub const ALL: [Self; 3] = [Self::Food, Self::Water, Self::Medical];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Water => "water",
            Self::Medical => "medical",
        }
    }
}

/// A value for every resource kind, guaranteed by construction.
/// This is how the "stock and needs always contain an entry for every
/// kind, same key set every time" contract is kept without runtime checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerKind<T> {
    pub food: T,
    pub water: T,
    pub medical: T,
}

impl<T> PerKind<T> {
    pub fn get(&self, kind: ResourceKind) -> &T {
        match kind {
            ResourceKind::Food => &self.food,
            ResourceKind::Water => &self.water,
            ResourceKind::Medical => &self.medical,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut T {
        match kind {
            ResourceKind::Food => &mut self.food,
            ResourceKind::Water => &mut self.water,
            ResourceKind::Medical => &mut self.medical,
        }
    }

    /// Build a new per-kind table by applying f in ALL order.
    pub fn build(mut f: impl FnMut(ResourceKind) -> T) -> Self {
        Self {
            food: f(ResourceKind::Food),
            water: f(ResourceKind::Water),
            medical: f(ResourceKind::Medical),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &T)> {
        ResourceKind::ALL.iter().map(move |&k| (k, self.get(k)))
    }
}

/// Real-valued quantities per kind: stocks, needs, rates.
pub type ResourceMap = PerKind<f64>;

impl ResourceMap {
    pub fn splat(value: f64) -> Self {
        Self::build(|_| value)
    }

    pub fn zero() -> Self {
        Self::splat(0.0)
    }

    pub fn total(&self) -> f64 {
        self.food + self.water + self.medical
    }
}

/// Immutable per-region baseline, set once at process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBaseline {
    pub id: RegionId,
    pub name: String,
    pub baseline_population: f64,
    pub baseline_stock: ResourceMap,
}

#[derive(Debug, Clone, Deserialize)]
struct RegistryFile {
    regions: Vec<RegionBaseline>,
}

/// The fixed table of region baselines. Read-only for the process
/// lifetime; constructed through `new` so every registry is validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRegistry {
    regions: Vec<RegionBaseline>,
}

impl RegionRegistry {
    pub fn new(regions: Vec<RegionBaseline>) -> SimResult<Self> {
        if regions.is_empty() {
            return Err(SimError::Config("registry has no regions".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for r in &regions {
            if !seen.insert(r.id) {
                return Err(SimError::Config(format!(
                    "duplicate region id {} ({})",
                    r.id, r.name
                )));
            }
            if r.name.trim().is_empty() {
                return Err(SimError::Config(format!("region {} has empty name", r.id)));
            }
            if !(r.baseline_population > 0.0) {
                return Err(SimError::Config(format!(
                    "region '{}': baseline population must be > 0, got {}",
                    r.name, r.baseline_population
                )));
            }
            for (kind, &qty) in r.baseline_stock.iter() {
                if !(qty > 0.0) {
                    return Err(SimError::Config(format!(
                        "region '{}': baseline {} stock must be > 0, got {qty}",
                        r.name,
                        kind.name()
                    )));
                }
            }
        }
        Ok(Self { regions })
    }

    /// Load a registry from a JSON file (`{"regions": [...]}`).
    pub fn load(path: &str) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("cannot read {path}: {e}")))?;
        let file: RegistryFile = serde_json::from_str(&content)?;
        Self::new(file.regions)
    }

    /// The default five-city registry used when no regions file is given.
    pub fn builtin() -> Self {
        let mk = |id, name: &str, pop, food, water, medical| RegionBaseline {
            id,
            name: name.to_string(),
            baseline_population: pop,
            baseline_stock: ResourceMap {
                food,
                water,
                medical,
            },
        };
        let regions = vec![
            mk(0, "Delhi", 250_000.0, 2000.0, 3000.0, 1000.0),
            mk(1, "Mumbai", 300_000.0, 2500.0, 3500.0, 1200.0),
            mk(2, "Chennai", 200_000.0, 1800.0, 2800.0, 900.0),
            mk(3, "Hyderabad", 180_000.0, 1600.0, 2600.0, 800.0),
            mk(4, "Bangalore", 220_000.0, 2000.0, 3000.0, 1000.0),
        ];
        Self::new(regions).expect("builtin registry is valid")
    }

    pub fn regions(&self) -> &[RegionBaseline] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
