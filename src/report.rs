//! Markdown report generation
//!
//! Renders the tables of [`aggregate`](crate::aggregate) into a markdown
//! document. The report never reads the results file itself: it works on a
//! [`ResultsStore`] snapshot handed over by the driver.

use std::fs;

use chrono::{DateTime, Utc};

use crate::aggregate::{Aggregator, FoundTable, SettingsClassifier, SummaryTable};
use crate::results::ResultsStore;
use crate::Result;

/// Check mark for `true`, cross for `false`.
#[must_use]
pub const fn bool_as_emoji(b: bool) -> &'static str {
    if b {
        "\u{2714}"
    } else {
        "\u{274C}"
    }
}

/// Human-readable description of the host CPU.
///
/// Uses the `model name` entry of `/proc/cpuinfo` when available and falls
/// back to the target architecture.
#[must_use]
pub fn cpu_info() -> String {
    fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|info| {
            info.lines()
                .find(|line| line.starts_with("model name"))
                .and_then(|line| line.split_once(':'))
                .map(|(_, model)| model.trim().to_string())
        })
        .filter(|model| !model.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string())
}

/// Markdown benchmark report.
///
/// # Example
///
/// ```rust
/// use qpbench::aggregate::{Aggregator, SingleSettings};
/// use qpbench::report::MarkdownReport;
/// use qpbench::results::{ResultRecord, ResultsStore};
///
/// let mut store = ResultsStore::new();
/// store.upsert(ResultRecord::new("HS21", "osqp", 120.0, true));
///
/// let report = MarkdownReport::new("Maros-Meszaros")
///     .cpu("test CPU")
///     .render(&store, &Aggregator::default(), &SingleSettings::default())?;
/// assert!(report.starts_with("# Maros-Meszaros"));
/// assert!(report.contains("| osqp | 100.0 |"));
/// # Ok::<(), qpbench::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownReport {
    title: String,
    date: DateTime<Utc>,
    cpu: String,
}

impl MarkdownReport {
    /// Create a report dated now, describing the host CPU.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: Utc::now(),
            cpu: cpu_info(),
        }
    }

    /// Set the report date.
    #[must_use]
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Set the CPU description.
    #[must_use]
    pub fn cpu(mut self, cpu: impl Into<String>) -> Self {
        self.cpu = cpu.into();
        self
    }

    /// Render the report for a results snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// the runtime means cannot be computed.
    pub fn render<C: SettingsClassifier + ?Sized>(
        &self,
        store: &ResultsStore,
        aggregator: &Aggregator,
        settings: &C,
    ) -> Result<String> {
        let records = store.all_records();
        let config = aggregator.config();
        let success = aggregator.success_rate(records, settings);
        let runtime = aggregator.geometric_mean(records, settings)?;
        let found = aggregator.found_table(records);

        let mut lines = vec![
            format!("# {}", self.title),
            String::new(),
            format!("- Date: {}", self.date),
            format!("- CPU: {}", self.cpu),
            format!("- Problems: {}", store.problems().len()),
            format!("- Solvers: {}", store.solvers().len()),
            String::new(),
            "## Parameters".to_string(),
            String::new(),
            "| Name | Value |".to_string(),
            "|------|-------|".to_string(),
            format!("| ``shift`` | {} |", config.shift),
        ];
        lines.extend(
            config
                .time_limits
                .iter()
                .map(|(group, limit)| format!("| ``time_limit[{group}]`` | {limit} us |")),
        );

        lines.push(String::new());
        lines.push("## Success rate (%)".to_string());
        lines.push(String::new());
        summary_lines(&success, &mut lines);

        lines.push(String::new());
        lines.push(format!(
            "## Shifted geometric mean of solve time (us, shift {})",
            config.shift
        ));
        lines.push(String::new());
        summary_lines(&runtime, &mut lines);

        lines.push(String::new());
        lines.push("## Found solutions".to_string());
        lines.push(String::new());
        found_lines(&found, &mut lines);

        let mut report = lines.join("\n");
        report.push('\n');
        Ok(report)
    }
}

fn summary_lines(table: &SummaryTable, lines: &mut Vec<String>) {
    lines.push(table_row(
        std::iter::once("Solver").chain(table.settings().iter().map(String::as_str)),
    ));
    lines.push(separator(table.settings().len() + 1));
    for (solver, cells) in table.rows() {
        let cells: Vec<String> = cells
            .iter()
            .map(|cell| cell.map_or_else(String::new, |value| format!("{value:.1}")))
            .collect();
        lines.push(table_row(
            std::iter::once(solver).chain(cells.iter().map(String::as_str)),
        ));
    }
}

fn found_lines(table: &FoundTable, lines: &mut Vec<String>) {
    let solvers: Vec<&str> = table.solvers().collect();
    lines.push(table_row(
        std::iter::once("Problem").chain(solvers.iter().copied()),
    ));
    lines.push(separator(solvers.len() + 1));
    for problem in table.problems() {
        let cells = solvers
            .iter()
            .map(|solver| table.get(solver, problem).map_or("", bool_as_emoji));
        lines.push(table_row(std::iter::once(problem.as_str()).chain(cells)));
    }
}

fn table_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    // A bare pipe inside a cell would split it in two
    let cells: Vec<String> = cells.map(|cell| cell.replace('|', "\\|")).collect();
    format!("| {} |", cells.join(" | "))
}

fn separator(columns: usize) -> String {
    format!("|{}", "------|".repeat(columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AggregationConfig, SingleSettings};
    use crate::results::ResultRecord;

    fn store() -> ResultsStore {
        let mut store = ResultsStore::new();
        store.upsert(ResultRecord::new("p1", "s1", 100.0, true));
        store.upsert(ResultRecord::new("p2", "s1", 0.0, false));
        store.upsert(ResultRecord::new("p1", "s2", 100.0, true));
        store
    }

    #[test]
    fn test_bool_as_emoji() {
        assert_eq!(bool_as_emoji(true), "✔");
        assert_eq!(bool_as_emoji(false), "❌");
    }

    #[test]
    fn test_cpu_info_not_empty() {
        assert!(!cpu_info().is_empty());
    }

    #[test]
    fn test_separator() {
        assert_eq!(separator(2), "|------|------|");
    }

    #[test]
    fn test_table_row_escapes_pipes() {
        assert_eq!(
            table_row(["osqp|fast", "1.0"].into_iter()),
            "| osqp\\|fast | 1.0 |"
        );
    }

    #[test]
    fn test_render_tables() {
        let report = MarkdownReport::new("Test set")
            .cpu("Test CPU")
            .render(&store(), &Aggregator::default(), &SingleSettings::default())
            .unwrap();

        assert!(report.contains("- CPU: Test CPU"));
        assert!(report.contains("| Solver | default |"));
        assert!(report.contains("| s1 | 50.0 |"));
        assert!(report.contains("| s2 | 100.0 |"));
        assert!(report.contains("| Problem | s1 | s2 |"));
        assert!(report.contains("| p1 | ✔ | ✔ |"));
        assert!(report.contains("| p2 | ❌ |  |"));
    }

    #[test]
    fn test_render_lists_time_limits() {
        let config = AggregationConfig::builder()
            .time_limit("default", 1000.0)
            .build()
            .unwrap();
        let report = MarkdownReport::new("Test set")
            .render(
                &store(),
                &Aggregator::new(config).unwrap(),
                &SingleSettings::default(),
            )
            .unwrap();
        assert!(report.contains("| ``time_limit[default]`` | 1000 us |"));
    }
}
