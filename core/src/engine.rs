//! The simulation engine — one discrete state advance per region per step.
//!
//! PER-REGION ORDER (fixed, documented, never reordered):
//!   1. elapsed hours since the region's last commit
//!   2. population drift
//!   3. road-block flip
//!   4. consumption, subtracted and clamped at zero
//!   5. replenishment
//!   6. needs estimate
//!   7. atomic commit of the new RegionState
//!
//! RULES:
//!   - Regions are independent; a fault in one region is logged and that
//!     region carries its prior state forward — the batch never shrinks.
//!   - All randomness flows through the injected RandomSource, drawn in
//!     the order above. Reordering draws breaks replays.
//!   - The engine owns the state table. No globals, no shared mutation.
//!   - Timing lives in the driver: the engine never sleeps, it is handed
//!     `now` and advances by whatever wall-clock time elapsed.

use crate::{
    config::SimConfig,
    consumption,
    error::{SimError, SimResult},
    needs,
    registry::{PerKind, RegionBaseline, RegionRegistry},
    replenishment,
    rng::RandomSource,
    snapshot::{RegionSnapshot, SnapshotSink},
    state::RegionState,
    types::Step,
};
use chrono::{DateTime, Utc};

pub struct SimEngine {
    registry: RegionRegistry,
    config: SimConfig,
    rng: Box<dyn RandomSource>,
    sink: Box<dyn SnapshotSink>,
    /// One state per region, parallel to `registry.regions()`.
    states: Vec<RegionState>,
    step: Step,
}

impl SimEngine {
    /// Build an engine with every region seeded from its baseline.
    /// The config is validated here; a bad one refuses to construct.
    pub fn new(
        registry: RegionRegistry,
        config: SimConfig,
        rng: Box<dyn RandomSource>,
        sink: Box<dyn SnapshotSink>,
        now: DateTime<Utc>,
    ) -> SimResult<Self> {
        config.validate()?;
        let states = registry
            .regions()
            .iter()
            .map(|baseline| RegionState::seed(baseline, now))
            .collect();
        Ok(Self {
            registry,
            config,
            rng,
            sink,
            states,
            step: 0,
        })
    }

    /// Advance every region by the wall-clock time elapsed since its last
    /// commit and return the fresh batch, one snapshot per region.
    ///
    /// A region whose update faults keeps its prior state; its snapshot
    /// is derived from that retained state so the batch stays complete.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Vec<RegionSnapshot> {
        self.step += 1;
        let mut batch = Vec::with_capacity(self.registry.len());

        for (baseline, state) in self.registry.regions().iter().zip(self.states.iter_mut()) {
            match advance_region(&self.config, baseline, state, self.rng.as_mut(), now) {
                Ok(next) => {
                    log::debug!(
                        "step={} region='{}' pop={:.0} road={} stock_total={:.1}",
                        self.step,
                        baseline.name,
                        next.population,
                        next.road_blocked,
                        next.stock.total()
                    );
                    *state = next;
                }
                Err(e) => {
                    log::warn!(
                        "step={} region='{}' update faulted, carrying prior state: {e}",
                        self.step,
                        baseline.name
                    );
                }
            }
            batch.push(RegionSnapshot::of(baseline, state, &self.config.severity));
        }

        batch
    }

    /// One full cycle: advance every region, then hand the batch to the
    /// sink. A failed emission is logged and dropped — batches are not
    /// buffered; the next step's batch supersedes it.
    pub fn run_step(&mut self, now: DateTime<Utc>) -> Vec<RegionSnapshot> {
        let batch = self.advance(now);
        if let Err(e) = self.sink.replace_all(&batch) {
            log::warn!(
                "step={} emission failed, batch dropped (next step supersedes): {e}",
                self.step
            );
        }
        batch
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn states(&self) -> &[RegionState] {
        &self.states
    }

    pub fn current_step(&self) -> Step {
        self.step
    }
}

/// Compute one region's next state. Pure apart from the RNG draws; the
/// caller commits the result (or discards it wholesale on error).
fn advance_region(
    config: &SimConfig,
    baseline: &RegionBaseline,
    state: &RegionState,
    rng: &mut dyn RandomSource,
    now: DateTime<Utc>,
) -> SimResult<RegionState> {
    // Checked before any draw so a skewed clock consumes no randomness.
    let elapsed_hours = (now - state.last_update).num_milliseconds() as f64 / 3_600_000.0;
    if elapsed_hours < 0.0 {
        return Err(SimError::NegativeElapsed {
            hours: elapsed_hours,
        });
    }

    let drift = config.population_drift;
    let population = (state.population * (1.0 + rng.uniform(-drift, drift))).max(0.0);

    let road_blocked = if rng.chance(config.road_flip_probability) {
        !state.road_blocked
    } else {
        state.road_blocked
    };

    let consumed = consumption::compute(&config.consumption, population, elapsed_hours, rng)?;
    let after_consumption =
        PerKind::build(|kind| (state.stock.get(kind) - consumed.get(kind)).max(0.0));
    let stock = replenishment::apply(
        &config.replenishment,
        &after_consumption,
        &baseline.baseline_stock,
    );

    let needs = needs::estimate(
        &config.needs,
        &stock,
        &baseline.baseline_stock,
        population,
        baseline.baseline_population,
        rng,
    )?;

    Ok(RegionState {
        population,
        road_blocked,
        stock,
        needs,
        last_update: now,
    })
}
