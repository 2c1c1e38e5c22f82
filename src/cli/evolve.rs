//! CLI command for genetic programming evolution.

use super::output::{TrialSummary, format_text};
use super::{CliError, OutputFormat, ProblemArgs, TuningArgs};
use exprgp::gp::{EvolutionConfig, EvolutionStats, Individual, evolve};
use exprgp::problem::Problem;
use exprgp::report::{DatLog, GenerationRecord, ProgressSink, dat_path, unix_timestamp, write_plot};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::io;
use std::path::Path;

/// Execute the evolve command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a log or plot file
/// cannot be written.
pub(crate) fn execute(
    problem: &ProblemArgs,
    tuning: &TuningArgs,
    trials: usize,
    logs_dir: &Path,
    plots_dir: &Path,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    let problem = problem.build()?;
    let base = tuning.build()?;
    base.validate(&problem)?;

    let timestamp = unix_timestamp();
    let mut summaries = Vec::with_capacity(trials);

    for trial in 0..trials {
        let config = EvolutionConfig {
            seed: base.seed.wrapping_add(trial as u64),
            ..base
        };
        info!("trial {trial} of {trials} with seed {}", config.seed);

        let mut sink = TrialSink::open(logs_dir, timestamp, trial, &config, &problem, progress)?;
        let outcome = evolve(&config, &problem, &mut sink)?;

        let plot = dat_path(plots_dir, timestamp, trial);
        write_plot(&plot, &outcome.best.trace(&problem.dataset))
            .map_err(|e| CliError::new(format!("Failed to write {}: {e}", plot.display())))?;

        summaries.push(TrialSummary::new(trial, &outcome, &problem, sink.log_path(), &plot));
    }

    match format {
        OutputFormat::Text => {
            for summary in &summaries {
                print!("{}", format_text(summary));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summaries)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Generation log file plus an optional progress bar.
struct TrialSink {
    log: Option<DatLog>,
    bar: Option<ProgressBar>,
}

impl TrialSink {
    /// Open the trial's log when the run is verbose.
    fn open(
        logs_dir: &Path,
        timestamp: u64,
        trial: usize,
        config: &EvolutionConfig,
        problem: &Problem,
        progress: bool,
    ) -> Result<Self, CliError> {
        if config.verbosity == 0 {
            return Ok(Self { log: None, bar: None });
        }

        let log = DatLog::create(logs_dir, timestamp, trial, config, problem).map_err(|e| {
            let path = dat_path(logs_dir, timestamp, trial);
            CliError::new(format!("Log file {} could not be opened: {e}", path.display()))
        })?;

        let bar = progress.then(|| {
            let pb = ProgressBar::new(config.iterations as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} generations {msg}")
                .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("=>-"));
            pb.set_style(style);
            pb
        });

        Ok(Self { log: Some(log), bar })
    }

    fn log_path(&self) -> Option<&Path> {
        self.log.as_ref().map(DatLog::path)
    }
}

impl ProgressSink for TrialSink {
    fn record(&mut self, record: &GenerationRecord) -> io::Result<()> {
        if let Some(log) = &mut self.log {
            log.record(record)?;
        }
        if let Some(bar) = &self.bar {
            bar.set_message(format!("best {:.6}", record.best_score));
            bar.inc(1);
        }
        Ok(())
    }

    fn finish(&mut self, best: &Individual, stats: &EvolutionStats) -> io::Result<()> {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!("best {:.6}", best.fitness()));
        }
        match &mut self.log {
            Some(log) => log.finish(best, stats),
            None => Ok(()),
        }
    }
}
