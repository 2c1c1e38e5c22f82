//! Check command implementation.

use super::{CliError, ProblemArgs, TuningArgs};

/// Execute the check command.
///
/// Builds the problem and configuration exactly as `evolve` would and
/// prints the effective configuration.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or the configuration
/// is invalid.
pub(crate) fn execute(problem: &ProblemArgs, tuning: &TuningArgs) -> Result<(), CliError> {
    let problem = problem.build()?;
    let config = tuning.build()?;
    config.validate(&problem)?;

    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
    println!("{json}");
    println!(
        "OK: {} samples, max depth {}, constants in [{}, {}]",
        problem.dataset.len(),
        problem.max_depth,
        problem.constant_min,
        problem.constant_max
    );

    Ok(())
}
