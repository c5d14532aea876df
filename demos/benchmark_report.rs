//! Benchmark Report Example
//!
//! Records a few synthetic solver runs into a persistent results file and
//! prints the markdown report derived from it. Running it twice shows
//! results being reloaded and overwritten rather than duplicated.
//!
//! Run with: RUST_LOG=qpbench=debug cargo run --example benchmark_report

use qpbench::aggregate::{AggregationConfig, Aggregator};
use qpbench::report::MarkdownReport;
use qpbench::results::{Problem, ResultRecord, ResultsStore};
use tracing_subscriber::EnvFilter;

/// Box-constrained toy problem: minimize |x - target|^2 subject to x >= 0.
struct BoxProblem {
    name: &'static str,
    target: [f64; 2],
    optimum: [f64; 2],
}

impl Problem for BoxProblem {
    type Solution = [f64; 2];

    fn name(&self) -> &str {
        self.name
    }

    fn cost_error(&self, solution: Option<&[f64; 2]>) -> Option<f64> {
        let cost = |x: &[f64; 2]| -> f64 {
            x.iter()
                .zip(&self.target)
                .map(|(a, b)| (a - b).powi(2))
                .sum()
        };
        solution.map(|x| (cost(x) - cost(&self.optimum)).abs())
    }

    fn primal_error(&self, solution: Option<&[f64; 2]>) -> Option<f64> {
        solution.map(|x| x.iter().map(|v| (-v).max(0.0)).fold(0.0, f64::max))
    }
}

/// Settings group encoded in the solver name, e.g. `osqp@high_accuracy`.
fn settings_of(record: &ResultRecord) -> String {
    record
        .solver()
        .split_once('@')
        .map_or("default", |(_, settings)| settings)
        .to_string()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::temp_dir().join("qpbench_demo").join("results.csv");
    println!("=== qpbench results: {} ===\n", path.display());

    let mut store = ResultsStore::load(&path)?;
    println!("Loaded {} existing record(s)\n", store.len());

    let problems = [
        BoxProblem {
            name: "BOX1",
            target: [1.0, 2.0],
            optimum: [1.0, 2.0],
        },
        BoxProblem {
            name: "BOX2",
            target: [-1.0, 3.0],
            optimum: [0.0, 3.0],
        },
    ];

    // (solver, per-problem outcome: solution and duration in microseconds)
    let runs: [(&str, [(Option<[f64; 2]>, f64); 2]); 3] = [
        (
            "osqp@default",
            [(Some([1.0, 2.0]), 120.0), (Some([-1e-6, 3.0]), 340.0)],
        ),
        (
            "osqp@high_accuracy",
            [(Some([1.0, 2.0]), 410.0), (None, 5_000_000.0)],
        ),
        (
            "quadprog@default",
            [(Some([1.0, 2.0]), 35.0), (Some([0.0, 3.0]), 42.0)],
        ),
    ];

    for (solver, outcomes) in &runs {
        for (problem, (solution, duration_us)) in problems.iter().zip(outcomes) {
            store.update(problem, solver, solution.as_ref(), *duration_us);
        }
    }
    store.persist(&path)?;
    println!("Persisted {} record(s)\n", store.len());

    let config = AggregationConfig::builder()
        .time_limit("high_accuracy", 5_000_000.0)
        .time_limit("default", 1_000_000.0)
        .build()?;
    let aggregator = Aggregator::new(config)?;

    let report = MarkdownReport::new("Box problems").render(&store, &aggregator, &settings_of)?;
    println!("{report}");

    let runtime = store.geometric_mean_table(&settings_of, &aggregator.config().time_limits)?;
    println!("Runtime table as JSON:\n{}", runtime.to_json()?);

    Ok(())
}
