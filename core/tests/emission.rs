//! Emission interface tests: replace-all store semantics and the
//! drop-and-supersede policy when the sink is unavailable.

use chrono::{DateTime, Duration, TimeZone, Utc};
use reliefsim_core::{
    config::SimConfig,
    engine::SimEngine,
    error::SimResult,
    registry::{RegionRegistry, ResourceMap},
    rng::PcgSource,
    snapshot::{RegionSnapshot, SnapshotSink},
    store::SimStore,
};
use std::sync::{Arc, Mutex};

fn start() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn snapshot(region_id: u32, name: &str, severity: f64) -> RegionSnapshot {
    RegionSnapshot {
        region_id,
        region_name: name.to_string(),
        population: 100_000,
        road_blocked: false,
        stock: ResourceMap::splat(500.0),
        needs: ResourceMap::splat(250.0),
        severity,
        timestamp: start(),
    }
}

#[test]
fn replace_all_fully_supersedes_the_previous_batch() {
    let mut store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");

    store
        .replace_snapshots(&[snapshot(0, "Delhi", 10.0), snapshot(1, "Mumbai", 20.0)])
        .expect("first batch");
    store
        .replace_snapshots(&[snapshot(0, "Delhi", 55.0), snapshot(1, "Mumbai", 60.0)])
        .expect("second batch");

    assert_eq!(store.snapshot_count().expect("count"), 2);
    let rows = store.load_snapshots().expect("load");
    assert_eq!(rows[0].severity, 55.0);
    assert_eq!(rows[1].severity, 60.0);
}

#[test]
fn snapshots_round_trip_through_the_store() {
    let mut store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");

    let batch = vec![snapshot(3, "Hyderabad", 42.5)];
    store.replace_snapshots(&batch).expect("emit");

    let rows = store.load_snapshots().expect("load");
    assert_eq!(rows, batch);
}

#[test]
fn duplicate_run_id_is_a_database_error() {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");

    store
        .insert_run("run-1", 42, "0.1.0-test", start())
        .expect("first insert");
    assert!(store.insert_run("run-1", 43, "0.1.0-test", start()).is_err());
}

/// A sink that is unavailable on its first call, then recovers.
struct FlakySink {
    calls: usize,
    delivered: Arc<Mutex<Vec<RegionSnapshot>>>,
}

impl SnapshotSink for FlakySink {
    fn replace_all(&mut self, batch: &[RegionSnapshot]) -> SimResult<()> {
        self.calls += 1;
        if self.calls == 1 {
            return Err(anyhow::anyhow!("store unavailable").into());
        }
        *self.delivered.lock().unwrap() = batch.to_vec();
        Ok(())
    }
}

#[test]
fn failed_emission_is_dropped_and_the_next_step_supersedes_it() {
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let sink = FlakySink {
        calls: 0,
        delivered: Arc::clone(&delivered),
    };

    let mut engine = SimEngine::new(
        RegionRegistry::builtin(),
        SimConfig::default(),
        Box::new(PcgSource::seed_from_u64(42)),
        Box::new(sink),
        start(),
    )
    .expect("engine builds");

    // First emission fails; the engine must neither crash nor buffer.
    engine.run_step(start() + Duration::hours(1));
    assert!(delivered.lock().unwrap().is_empty());

    // Second emission lands with the fresher batch.
    let second = engine.run_step(start() + Duration::hours(2));
    let landed = delivered.lock().unwrap().clone();
    assert_eq!(landed, second);
    assert_eq!(landed.len(), engine.registry().len());
}

#[test]
fn engine_emits_into_sqlite_end_to_end() {
    // Shared-cache URI so a second connection can observe what the
    // engine-owned connection wrote.
    let uri = "file:reliefsim_emission_e2e?mode=memory&cache=shared";
    let writer = SimStore::open(uri).expect("writer store");
    writer.migrate().expect("migration");
    let reader = SimStore::open(uri).expect("reader store");

    let mut engine = SimEngine::new(
        RegionRegistry::builtin(),
        SimConfig::default(),
        Box::new(PcgSource::seed_from_u64(9)),
        Box::new(writer),
        start(),
    )
    .expect("engine builds");

    engine.run_step(start() + Duration::hours(1));
    assert_eq!(reader.snapshot_count().expect("count"), 5);

    engine.run_step(start() + Duration::hours(2));
    let rows = reader.load_snapshots().expect("load");
    assert_eq!(rows.len(), 5, "replace-all must never grow the dataset");
    for row in &rows {
        assert_eq!(row.timestamp, start() + Duration::hours(2));
    }
}
