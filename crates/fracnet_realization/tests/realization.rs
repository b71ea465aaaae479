//! End-to-end realization tests against directory destinations.

use fracnet_model::{GenerationSettings, RawSettings};
use fracnet_realization::report::{
    parse_fracture_entries, CENTERS_REPORT, INTERIOR_RADII_REPORT, RADII_REPORT, RESULTS_REPORT,
};
use fracnet_realization::{
    batch_destinations, collect_poles, directory_factory, realization_dir_name, realization_seed,
    run_batch, run_batch_parallel, DirectoryDestination, RealizationDriver,
};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

const SCENARIO: &str = r#"{
    "HL1": 10, "HL2": 5, "HL3": 3, "HL3 cube": false,
    "N": 5, "rmin": 0.5, "rmax": 2.0, "exponent": -2.0,
    "uniform size rmax": false, "perimeter distance min": 0,
    "perimeter points": 0, "polygon": false,
    "center intervals": 0, "pole intervals": 0,
    "seed": 42, "realizations": 1
}"#;

fn scenario() -> GenerationSettings {
    GenerationSettings::from_json(SCENARIO).unwrap()
}

fn read(dir: &std::path::Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn seed_42_scenario_produces_valid_network() {
    let tmp = TempDir::new().unwrap();
    let mut destination = DirectoryDestination::new(tmp.path());
    let summary = RealizationDriver::new(scenario())
        .run(42, &mut destination)
        .unwrap();
    assert_eq!(summary.total, 5);

    let radii = read(tmp.path(), RADII_REPORT);
    let names: Vec<_> = radii.lines().map(|l| l.split('\t').next().unwrap()).collect();
    assert_eq!(
        names,
        [
            "FRACTURE00000_S",
            "FRACTURE00001_S",
            "FRACTURE00002_S",
            "FRACTURE00003_S",
            "FRACTURE00004_S"
        ]
    );
    for line in radii.lines() {
        let r: f64 = line.split('\t').nth(1).unwrap().parse().unwrap();
        assert!((0.5..=2.0).contains(&r), "radius {r} out of range");
    }

    for line in read(tmp.path(), CENTERS_REPORT).lines() {
        let coords: Vec<f64> = line.split('\t').skip(1).map(|v| v.parse().unwrap()).collect();
        assert_eq!(coords.len(), 3);
        assert!(coords.iter().all(|c| (-5.0..=5.0).contains(c)), "{line}");
    }

    let entries = parse_fracture_entries(&read(tmp.path(), RESULTS_REPORT)).unwrap();
    assert_eq!(entries.len(), 5);
    for entry in entries.values() {
        let [x, y, z] = entry.unit_normal;
        assert!((x.mul_add(x, y.mul_add(y, z * z)) - 1.0).abs() < 1e-9);
        assert!(z <= 0.0);
    }

    let interior = read(tmp.path(), INTERIOR_RADII_REPORT);
    assert_eq!(interior.lines().count(), summary.interior);
}

#[test]
fn same_seed_is_byte_identical() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    let driver = RealizationDriver::new(scenario());

    let first = driver.run(42, &mut DirectoryDestination::new(a.path())).unwrap();
    let second = driver.run(42, &mut DirectoryDestination::new(b.path())).unwrap();

    assert_eq!(first.fingerprint, second.fingerprint);
    for name in [RADII_REPORT, CENTERS_REPORT, INTERIOR_RADII_REPORT, RESULTS_REPORT] {
        assert_eq!(read(a.path(), name), read(b.path(), name), "{name} differs");
    }
}

#[test]
fn different_seed_differs_but_stays_valid() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    let driver = RealizationDriver::new(scenario());

    driver.run(42, &mut DirectoryDestination::new(a.path())).unwrap();
    let other = driver.run(43, &mut DirectoryDestination::new(b.path())).unwrap();

    assert_eq!(other.total, 5);
    assert_ne!(read(a.path(), CENTERS_REPORT), read(b.path(), CENTERS_REPORT));
}

#[test]
fn rerun_keeps_foreign_result_keys() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(RESULTS_REPORT),
        r#"{"operator": "field team", "network": {"stale": true}}"#,
    )
    .unwrap();

    RealizationDriver::new(scenario())
        .run(42, &mut DirectoryDestination::new(tmp.path()))
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&read(tmp.path(), RESULTS_REPORT)).unwrap();
    assert_eq!(value["operator"], "field team");
    assert!(value["network"].get("stale").is_none());
    assert_eq!(value["network"]["seed"], 42);
}

#[test]
fn batch_realization_matches_standalone_run() {
    let batch_root = TempDir::new().unwrap();
    let single = TempDir::new().unwrap();
    let driver = RealizationDriver::new(scenario().with_realizations(3));

    let result = run_batch(&driver, directory_factory(batch_root.path()));
    assert!(result.all_passed());

    let standalone = driver
        .run(realization_seed(42, 2), &mut DirectoryDestination::new(single.path()))
        .unwrap();
    let batched = batch_root.path().join(realization_dir_name(2));
    assert_eq!(
        read(&batched, CENTERS_REPORT),
        read(single.path(), CENTERS_REPORT)
    );
    assert_eq!(
        result.outcomes[2].result.as_ref().unwrap().fingerprint,
        standalone.fingerprint
    );
}

#[test]
fn parallel_batch_writes_same_files() {
    let seq_root = TempDir::new().unwrap();
    let par_root = TempDir::new().unwrap();
    let driver = RealizationDriver::new(scenario().with_realizations(4));

    run_batch(&driver, directory_factory(seq_root.path()));
    run_batch_parallel(&driver, directory_factory(par_root.path()));

    for i in 0..4 {
        let name = realization_dir_name(i);
        assert_eq!(
            read(&seq_root.path().join(&name), RESULTS_REPORT),
            read(&par_root.path().join(&name), RESULTS_REPORT)
        );
    }
}

#[test]
fn poles_collected_from_batch_directory() {
    let root = TempDir::new().unwrap();
    let driver = RealizationDriver::new(scenario().with_realizations(3));
    run_batch(&driver, directory_factory(root.path()));
    fs::create_dir(root.path().join("unrelated")).unwrap();

    let destinations = batch_destinations(root.path()).unwrap();
    assert_eq!(destinations.len(), 3);

    let poles = collect_poles(&destinations).unwrap();
    assert_eq!(poles.len(), 15);
    assert!(poles.iter().all(|p| (p.norm() - 1.0).abs() < 1e-9));
}

#[test]
fn rejection_mode_scenario_runs() {
    let mut raw: RawSettings = serde_json::from_str(SCENARIO).unwrap();
    raw.perimeter_distance_min = 0.1;
    raw.perimeter_points = 16;
    let driver = RealizationDriver::new(raw.validate().unwrap());

    let tmp = TempDir::new().unwrap();
    let summary = driver.run(42, &mut DirectoryDestination::new(tmp.path())).unwrap();
    assert_eq!(summary.total, 5);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn any_seed_yields_network_inside_center_box(seed in any::<u64>()) {
        let driver = RealizationDriver::new(scenario());
        let model = driver.build_model(seed).unwrap();
        prop_assert_eq!(model.len(), 5);
        let center_box = driver.settings().domain.center_box();
        for fracture in model.fractures() {
            prop_assert!(center_box.contains(fracture.center()));
            prop_assert!(fracture.radius() >= 0.5 && fracture.radius() <= 2.0);
        }
    }
}
