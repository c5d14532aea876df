//! Aggregation tests over store snapshots

use qpbench::aggregate::{
    self, AggregationConfig, Aggregator, ErrorMetric, SingleSettings, TimeLimits,
};
use qpbench::results::{ResultRecord, ResultsStore};
use qpbench::shgeom::shgeom;

/// Settings group encoded in the solver name, e.g. `osqp@high_accuracy`.
fn settings_suffix(record: &ResultRecord) -> String {
    record
        .solver()
        .split_once('@')
        .map_or("default", |(_, settings)| settings)
        .to_string()
}

fn approx_eq(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|value| (value - expected).abs() < 1e-9)
}

// =============================================================================
// Success rate
// =============================================================================

#[test]
fn test_success_rate_scenario() {
    let mut store = ResultsStore::new();
    store.upsert(ResultRecord::new("p1", "s1", 10.0, true));
    store.upsert(ResultRecord::new("p2", "s1", 10.0, false));
    store.upsert(ResultRecord::new("p1", "s2", 10.0, true));

    let table = store.success_rate_table(&SingleSettings::default());

    assert_eq!(table.get("s1", "default"), Some(50.0));
    // s2 never ran p2: not a failure
    assert_eq!(table.get("s2", "default"), Some(100.0));
}

#[test]
fn test_success_rate_follows_upserts() {
    let mut store = ResultsStore::new();
    store.upsert(ResultRecord::new("p1", "s1", 10.0, false));
    let before = store.success_rate_table(&SingleSettings::default());

    store.upsert(ResultRecord::new("p1", "s1", 10.0, true));
    let after = store.success_rate_table(&SingleSettings::default());

    assert_eq!(before.get("s1", "default"), Some(0.0));
    assert_eq!(after.get("s1", "default"), Some(100.0));
}

#[test]
fn test_tables_cover_every_solver_and_settings_group() {
    let records = vec![
        ResultRecord::new("p1", "osqp@low_accuracy", 10.0, false),
        ResultRecord::new("p1", "osqp@high_accuracy", 10.0, false),
        ResultRecord::new("p1", "scs", 10.0, true),
    ];

    let success = aggregate::success_rate(&records, &settings_suffix);
    let runtime =
        aggregate::geometric_mean(&records, &settings_suffix, &TimeLimits::new(), 10.0).unwrap();

    for table in [&success, &runtime] {
        assert_eq!(table.solvers().len(), 3);
        assert_eq!(
            table.settings(),
            ["default", "high_accuracy", "low_accuracy"].map(String::from)
        );
    }
    assert_eq!(success.get("osqp@low_accuracy", "low_accuracy"), Some(0.0));
    assert_eq!(runtime.get("osqp@low_accuracy", "low_accuracy"), None);
    assert!(approx_eq(runtime.get("scs", "default"), 10.0));
}

// =============================================================================
// Shifted geometric mean
// =============================================================================

#[test]
fn test_geometric_mean_scenario() {
    let records = vec![
        ResultRecord::new("p1", "s1", 100.0, true),
        ResultRecord::new("p2", "s1", 200.0, true),
    ];
    let table =
        aggregate::geometric_mean(&records, &SingleSettings::default(), &TimeLimits::new(), 10.0)
            .unwrap();

    let expected = ((110.0_f64.ln() + 210.0_f64.ln()) / 2.0).exp() - 10.0;
    assert!(approx_eq(table.get("s1", "default"), expected));
}

#[test]
fn test_geometric_mean_penalty_and_exclusion_policies() {
    let records = vec![
        ResultRecord::new("p1", "s1", 100.0, true),
        ResultRecord::new("p2", "s1", 5.0, false),
    ];
    let settings = SingleSettings::new("default");

    let penalized = aggregate::geometric_mean(
        &records,
        &settings,
        &TimeLimits::from([("default".to_string(), 1000.0)]),
        10.0,
    )
    .unwrap();
    let excluded =
        aggregate::geometric_mean(&records, &settings, &TimeLimits::new(), 10.0).unwrap();

    assert!(approx_eq(
        penalized.get("s1", "default"),
        shgeom(&[100.0, 1000.0], 10.0).unwrap()
    ));
    assert!(approx_eq(excluded.get("s1", "default"), 100.0));
}

#[test]
fn test_time_limits_apply_per_settings_group() {
    let records = vec![
        ResultRecord::new("p1", "osqp@low", 50.0, true),
        ResultRecord::new("p2", "osqp@low", 1.0, false),
        ResultRecord::new("p1", "osqp@high", 80.0, true),
        ResultRecord::new("p2", "osqp@high", 1.0, false),
    ];
    let config = AggregationConfig::builder()
        .shift(1.0)
        .time_limit("low", 500.0)
        .build()
        .unwrap();
    let table = Aggregator::new(config)
        .unwrap()
        .geometric_mean(&records, &settings_suffix)
        .unwrap();

    assert!(approx_eq(
        table.get("osqp@low", "low"),
        shgeom(&[50.0, 500.0], 1.0).unwrap()
    ));
    // No limit configured for "high": the failure is left out
    assert!(approx_eq(table.get("osqp@high", "high"), 80.0));
}

#[test]
fn test_store_geometric_mean_table_uses_default_shift() {
    let mut store = ResultsStore::new();
    store.upsert(ResultRecord::new("p1", "s1", 0.0, true));
    store.upsert(ResultRecord::new("p2", "s1", 90.0, true));

    let table = store
        .geometric_mean_table(&SingleSettings::default(), &TimeLimits::new())
        .unwrap();

    // sqrt(10 * 100) - 10
    assert!(approx_eq(table.get("s1", "default"), 1000.0_f64.sqrt() - 10.0));
}

// =============================================================================
// Found table and precision
// =============================================================================

#[test]
fn test_found_table_and_summary() {
    let records = vec![
        ResultRecord::new("p1", "s1", 1.0, true),
        ResultRecord::new("p2", "s1", 1.0, false),
        ResultRecord::new("p3", "s1", 1.0, true),
        ResultRecord::new("p1", "s2", 1.0, false),
    ];
    let table = aggregate::found_table(&records);

    assert_eq!(table.problems().len(), 3);
    assert_eq!(table.get("s1", "p3"), Some(true));
    assert_eq!(table.get("s2", "p3"), None);

    let summary = table.summary();
    assert!((summary["s1"] - 200.0 / 3.0).abs() < 1e-9);
    assert!(summary["s2"].abs() < f64::EPSILON);
}

#[test]
fn test_max_error_ignores_unfound_records() {
    let records = vec![
        ResultRecord::builder("p1", "s1", 1.0, true)
            .primal_error(1e-8)
            .build(),
        // Unfound rows should never carry errors, but must not count if they do
        ResultRecord::builder("p2", "s1", 1.0, false)
            .primal_error(1.0)
            .build(),
    ];
    let table = aggregate::max_error(&records, &SingleSettings::default(), ErrorMetric::Primal);
    assert_eq!(table.get("s1", "default"), Some(1e-8));
}
