//! Region registry and config validation — every malformed input must be
//! fatal at startup, never silently defaulted.

use reliefsim_core::{
    config::SimConfig,
    error::SimError,
    registry::{RegionBaseline, RegionRegistry, ResourceMap},
};

fn region(id: u32, name: &str) -> RegionBaseline {
    RegionBaseline {
        id,
        name: name.to_string(),
        baseline_population: 100_000.0,
        baseline_stock: ResourceMap::splat(1000.0),
    }
}

#[test]
fn builtin_registry_is_valid_and_complete() {
    let registry = RegionRegistry::builtin();
    assert_eq!(registry.len(), 5);
    assert_eq!(registry.regions()[0].name, "Delhi");
    assert_eq!(registry.regions()[0].baseline_population, 250_000.0);
    assert_eq!(registry.regions()[0].baseline_stock.water, 3000.0);
}

#[test]
fn empty_registry_is_rejected() {
    assert!(matches!(
        RegionRegistry::new(vec![]),
        Err(SimError::Config(_))
    ));
}

#[test]
fn duplicate_region_id_is_rejected() {
    let result = RegionRegistry::new(vec![region(1, "Delhi"), region(1, "Mumbai")]);
    assert!(matches!(result, Err(SimError::Config(_))));
}

#[test]
fn non_positive_baseline_population_is_rejected() {
    let mut bad = region(0, "Delhi");
    bad.baseline_population = 0.0;
    assert!(matches!(
        RegionRegistry::new(vec![bad]),
        Err(SimError::Config(_))
    ));
}

#[test]
fn zero_baseline_stock_is_rejected() {
    let mut bad = region(0, "Delhi");
    bad.baseline_stock.medical = 0.0;
    assert!(matches!(
        RegionRegistry::new(vec![bad]),
        Err(SimError::Config(_))
    ));
}

#[test]
fn empty_region_name_is_rejected() {
    let bad = region(0, "  ");
    assert!(matches!(
        RegionRegistry::new(vec![bad]),
        Err(SimError::Config(_))
    ));
}

#[test]
fn registry_loads_from_json_file() {
    let path = std::env::temp_dir().join("reliefsim_registry_test.json");
    let json = r#"{
        "regions": [
            {
                "id": 7,
                "name": "Pune",
                "baseline_population": 120000,
                "baseline_stock": { "food": 900, "water": 1400, "medical": 400 }
            }
        ]
    }"#;
    std::fs::write(&path, json).expect("write temp registry");

    let registry = RegionRegistry::load(path.to_str().unwrap()).expect("registry loads");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.regions()[0].name, "Pune");
    assert_eq!(registry.regions()[0].baseline_stock.food, 900.0);

    let _ = std::fs::remove_file(&path);
}

// ── Config validation ──────────────────────────────────────────

#[test]
fn default_config_validates() {
    SimConfig::default().validate().expect("defaults are sane");
}

#[test]
fn out_of_range_probability_is_rejected() {
    let mut cfg = SimConfig::default();
    cfg.consumption.emergency_probability = 1.5;
    assert!(matches!(cfg.validate(), Err(SimError::Config(_))));
}

#[test]
fn out_of_range_threshold_is_rejected() {
    let mut cfg = SimConfig::default();
    cfg.replenishment.threshold = -0.1;
    assert!(matches!(cfg.validate(), Err(SimError::Config(_))));
}

#[test]
fn negative_severity_weight_is_rejected() {
    let mut cfg = SimConfig::default();
    cfg.severity.resource = -50.0;
    assert!(matches!(cfg.validate(), Err(SimError::Config(_))));
}

#[test]
fn inverted_variance_range_is_rejected() {
    let mut cfg = SimConfig::default();
    cfg.consumption.variance.lo = 2.0; // lo > hi
    assert!(matches!(cfg.validate(), Err(SimError::Config(_))));
}

#[test]
fn non_positive_consumption_rate_is_rejected() {
    let mut cfg = SimConfig::default();
    cfg.consumption.hourly_rates.water = 0.0;
    assert!(matches!(cfg.validate(), Err(SimError::Config(_))));
}
