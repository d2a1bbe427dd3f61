//! sim-runner: headless cadence driver for the relief telemetry engine.
//!
//! Usage:
//!   sim-runner --seed 12345 --steps 100 --db relief.db
//!   sim-runner --seed 12345 --interval-secs 3 --data-dir ./data
//!
//! The perpetual loop lives here, not in the core: the engine is handed
//! `now` each step and never sleeps itself.

use anyhow::Result;
use chrono::Utc;
use reliefsim_core::{
    config::SimConfig,
    engine::SimEngine,
    registry::RegionRegistry,
    rng::PcgSource,
    store::SimStore,
};
use std::env;
use std::path::Path;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let steps = parse_arg(&args, "--steps", 0u64); // 0 = run until killed
    let print_batch = args.iter().any(|a| a == "--print-batch");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let config = load_config(data_dir)?;
    let registry = load_registry(data_dir)?;
    let interval_secs = parse_arg(&args, "--interval-secs", config.step_interval_secs);

    println!("reliefsim — sim-runner");
    println!("  seed:      {seed}");
    println!("  steps:     {}", if steps == 0 { "unbounded".into() } else { steps.to_string() });
    println!("  interval:  {interval_secs}s");
    println!("  regions:   {}", registry.len());
    println!("  db:        {db}");
    println!();

    // For :memory: use SQLite shared-memory URI so a second inspector
    // connection could attach to the same in-memory database.
    let db_effective: String = if db == ":memory:" {
        format!("file:reliefsim_{}?mode=memory&cache=shared", unix_secs())
    } else {
        db.to_string()
    };
    let store = SimStore::open(&db_effective)?;
    store.migrate()?;

    let run_id = format!("run-{seed}-{}", unix_secs());
    store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"), Utc::now())?;

    let rng = Box::new(PcgSource::seed_from_u64(seed));
    let mut engine = SimEngine::new(registry, config, rng, Box::new(store), Utc::now())?;

    let interval = Duration::from_secs(interval_secs);
    let mut last_batch = Vec::new();
    let mut n = 0u64;
    loop {
        thread::sleep(interval);
        let batch = engine.run_step(Utc::now());
        if print_batch {
            for snapshot in &batch {
                println!("{}", serde_json::to_string(snapshot)?);
            }
        }
        last_batch = batch;
        n += 1;
        if steps > 0 && n >= steps {
            break;
        }
    }

    print_summary(&run_id, n, &last_batch);
    Ok(())
}

fn load_config(data_dir: &str) -> Result<SimConfig> {
    let path = format!("{data_dir}/simulation.json");
    if Path::new(&path).exists() {
        Ok(SimConfig::load(&path)?)
    } else {
        log::info!("no {path}; using default simulation config");
        Ok(SimConfig::default())
    }
}

fn load_registry(data_dir: &str) -> Result<RegionRegistry> {
    let path = format!("{data_dir}/regions.json");
    if Path::new(&path).exists() {
        Ok(RegionRegistry::load(&path)?)
    } else {
        log::info!("no {path}; using builtin region registry");
        Ok(RegionRegistry::builtin())
    }
}

fn print_summary(run_id: &str, steps: u64, batch: &[reliefsim_core::snapshot::RegionSnapshot]) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:        {run_id}");
    println!("  steps run:     {steps}");
    if batch.is_empty() {
        println!("  (no batch emitted)");
        return;
    }
    let mean_severity: f64 =
        batch.iter().map(|s| s.severity).sum::<f64>() / batch.len() as f64;
    let blocked = batch.iter().filter(|s| s.road_blocked).count();
    let population: i64 = batch.iter().map(|s| s.population).sum();
    println!("  regions:       {}", batch.len());
    println!("  population:    {population}");
    println!("  blocked roads: {blocked}");
    println!("  mean severity: {mean_severity:.1}");
    println!();
    for s in batch {
        println!(
            "  {:<12} pop={:<8} road={} severity={:>5.1} food={:.0} water={:.0} medical={:.0}",
            s.region_name,
            s.population,
            if s.road_blocked { "BLOCKED" } else { "clear  " },
            s.severity,
            s.stock.food,
            s.stock.water,
            s.stock.medical
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn unix_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
