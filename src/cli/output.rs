//! Output formatting utilities for CLI.

use exprgp::gp::EvolutionOutcome;
use exprgp::problem::Problem;
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// JSON-serializable summary of one trial.
#[derive(Debug, Serialize)]
pub(super) struct TrialSummary {
    /// Trial index.
    pub(super) trial: usize,
    /// Seed the trial ran with.
    pub(super) seed: u64,
    /// Raw fitness of the best individual (null when not finite).
    pub(super) fitness: f64,
    /// Adjusted fitness of the best individual.
    pub(super) adjusted: f64,
    /// Total node count.
    pub(super) size: usize,
    /// Tree depth.
    pub(super) depth: usize,
    /// Post-order rendering of the best tree.
    pub(super) expression: String,
    /// Wall-clock time of the trial.
    pub(super) elapsed_seconds: f64,
    /// Generation log, if one was written.
    pub(super) log: Option<PathBuf>,
    /// Plot data of the best individual.
    pub(super) plot: PathBuf,
    /// Per-sample calculation listing.
    #[serde(skip)]
    pub(super) calculation: String,
}

impl TrialSummary {
    /// Create from an evolution outcome.
    pub(super) fn new(
        trial: usize,
        outcome: &EvolutionOutcome,
        problem: &Problem,
        log: Option<&Path>,
        plot: &Path,
    ) -> Self {
        let best = &outcome.best;
        Self {
            trial,
            seed: outcome.stats.seed,
            fitness: best.fitness(),
            adjusted: best.adjusted(),
            size: best.size().total(),
            depth: best.depth(),
            expression: best.root().to_string(),
            elapsed_seconds: outcome.stats.elapsed_seconds,
            log: log.map(Path::to_path_buf),
            plot: plot.to_path_buf(),
            calculation: best.calculation(&problem.dataset),
        }
    }
}

/// Format a trial summary as human-readable text.
pub(super) fn format_text(summary: &TrialSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Trial {} (seed: {})", summary.trial, summary.seed);
    let _ = writeln!(
        output,
        "  Best fitness: {:.6} (adjusted {:.6})",
        summary.fitness, summary.adjusted
    );
    let _ = writeln!(output, "  Size: {}, depth: {}", summary.size, summary.depth);
    let _ = writeln!(output, "  Expression: {}", summary.expression);
    let _ = writeln!(output, "  Elapsed time: {:.2}s", summary.elapsed_seconds);
    if let Some(log) = &summary.log {
        let _ = writeln!(output, "  Log: {}", log.display());
    }
    let _ = writeln!(output, "  Plot: {}", summary.plot.display());
    output.push('\n');
    for line in summary.calculation.lines() {
        let _ = writeln!(output, "  {line}");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprgp::gp::{EvolutionStats, Individual, Node};

    fn summary() -> TrialSummary {
        let dataset = vec![(1.0, 1.0), (2.0, 4.0)];
        let problem = Problem::new(dataset, 2, -1.0, 1.0);
        let outcome = EvolutionOutcome {
            best: Individual::from_root(Node::Input, &problem.dataset, 0.0),
            stats: EvolutionStats {
                generations: 3,
                seed: 9,
                elapsed_seconds: 0.25,
            },
        };
        TrialSummary::new(1, &outcome, &problem, None, Path::new("plots/1_1.dat"))
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&summary());
        assert!(text.starts_with("Trial 1 (seed: 9)\n"));
        assert!(text.contains("  Best fitness: 2.000000"));
        assert!(text.contains("  Expression: (x)"));
        assert!(text.contains("  Plot: plots/1_1.dat"));
        assert!(!text.contains("Log:"));
        assert!(text.contains("  Total fitness: 2."));
    }

    #[test]
    fn test_json_skips_calculation() {
        let json = serde_json::to_value(summary()).unwrap();
        assert_eq!(json["trial"], 1);
        assert_eq!(json["expression"], "(x)");
        assert!(json["log"].is_null());
        assert!(json.get("calculation").is_none());
    }
}
