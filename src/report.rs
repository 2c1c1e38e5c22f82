//! Progress reporting: per-generation records and the sinks that store them.
//!
//! The driver hands one [`GenerationRecord`] per generation to a
//! [`ProgressSink`]. [`DatLog`] appends fixed-width columns to a `.dat`
//! file suitable for plotting; [`MemoryLog`] keeps everything in memory.

// Averages over the population use intentional casts
#![allow(clippy::cast_precision_loss)]

use crate::gp::{EvolutionConfig, EvolutionStats, Individual, TracePoint};
use crate::problem::Problem;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Column width of `.dat` files, including the separating space.
const WIDTH: usize = 10;

/// Padding before the separating space.
const PAD: usize = WIDTH - 1;

/// Summary of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationRecord {
    /// Zero-based generation index.
    pub generation: usize,
    /// Raw fitness of the best individual.
    pub best_score: f64,
    /// Adjusted fitness of the best individual.
    pub best_fitness: f64,
    /// Mean adjusted fitness of the population.
    pub avg_fitness: f64,
    /// Total node count of the best individual.
    pub best_size: usize,
    /// Mean total node count.
    pub avg_size: f64,
    /// Depth of the best individual.
    pub best_depth: usize,
    /// Mean depth.
    pub avg_depth: f64,
}

impl GenerationRecord {
    /// Summarize `population`, whose best member is `best`.
    ///
    /// Non-normal fitness values flow into the averages unchanged.
    #[must_use]
    pub fn summarize(generation: usize, best: &Individual, population: &[Individual]) -> Self {
        let count = population.len().max(1) as f64;
        let (fitness, size, depth) = population.iter().fold((0.0, 0, 0), |(f, s, d), individual| {
            (
                f + individual.adjusted(),
                s + individual.size().total(),
                d + individual.depth(),
            )
        });

        Self {
            generation,
            best_score: best.fitness(),
            best_fitness: best.adjusted(),
            avg_fitness: fitness / count,
            best_size: best.size().total(),
            avg_size: size as f64 / count,
            best_depth: best.depth(),
            avg_depth: depth as f64 / count,
        }
    }
}

/// Receiver of evolution progress.
///
/// Sinks run on the rayon pool concurrently with offspring construction,
/// hence the `Send` bound.
pub trait ProgressSink: Send {
    /// Store the record of one generation.
    ///
    /// # Errors
    ///
    /// An error aborts the run.
    fn record(&mut self, record: &GenerationRecord) -> io::Result<()>;

    /// Called once after the last generation with the final best individual.
    ///
    /// # Errors
    ///
    /// An error aborts the run.
    fn finish(&mut self, _best: &Individual, _stats: &EvolutionStats) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    /// Records in generation order.
    pub records: Vec<GenerationRecord>,
    /// Final best individual, set by `finish`.
    pub best: Option<Individual>,
}

impl ProgressSink for MemoryLog {
    fn record(&mut self, record: &GenerationRecord) -> io::Result<()> {
        self.records.push(*record);
        Ok(())
    }

    fn finish(&mut self, best: &Individual, _stats: &EvolutionStats) -> io::Result<()> {
        self.best = Some(best.clone());
        Ok(())
    }
}

/// Sink appending fixed-width columns to `<dir>/<timestamp>_<trial>.dat`.
#[derive(Debug)]
pub struct DatLog {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl DatLog {
    /// Open the log file and write the run header.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create(
        dir: &Path,
        timestamp: u64,
        trial: usize,
        config: &EvolutionConfig,
        problem: &Problem,
    ) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dat_path(dir, timestamp, trial);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "# running a Genetic Program @ {timestamp}")?;
        writeln!(
            writer,
            "# initial depth: {}, iterations: {}, population size: {}, tournament size: {}, \
             elitism size: {}, fitness penalty: {} * total size, crossover chance: {}, \
             mutate chance: {}, grow chance: {}, seed: {}",
            problem.max_depth,
            config.iterations,
            config.population_size,
            config.selection.tournament_size,
            config.selection.elitism_size,
            config.penalty,
            config.crossover.crossover_chance,
            config.mutation.mutate_chance,
            config.grow_chance,
            config.seed,
        )?;
        let titles = ["# gen", "score", "best fit", "avg fit", "best size", "avg size", "best dep", "avg dep"];
        for title in titles {
            write!(writer, "{title:<PAD$} ")?;
        }
        writeln!(writer)?;
        writer.flush()?;

        Ok(Self { writer, path })
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressSink for DatLog {
    fn record(&mut self, record: &GenerationRecord) -> io::Result<()> {
        let columns = [
            record.generation.to_string(),
            column(record.best_score),
            column(record.best_fitness),
            column(record.avg_fitness),
            record.best_size.to_string(),
            column(record.avg_size),
            record.best_depth.to_string(),
            column(record.avg_depth),
        ];
        for value in &columns {
            write!(self.writer, "{value:<PAD$} ")?;
        }
        writeln!(self.writer)?;
        self.writer.flush()
    }

    fn finish(&mut self, best: &Individual, stats: &EvolutionStats) -> io::Result<()> {
        for line in best.formula().lines() {
            writeln!(self.writer, "# {line}")?;
        }
        writeln!(self.writer, "# Finished computation @ {}", unix_timestamp())?;
        writeln!(self.writer, "# Elapsed time: {}s", stats.elapsed_seconds)?;
        self.writer.flush()
    }
}

/// Four decimals, switching to scientific notation for large magnitudes.
fn column(value: f64) -> String {
    if value.abs() < 1e5 {
        format!("{value:.4}")
    } else {
        format!("{value:.3e}")
    }
}

/// `<dir>/<timestamp>_<trial>.dat`, shared by logs and plots.
#[must_use]
pub fn dat_path(dir: &Path, timestamp: u64, trial: usize) -> PathBuf {
    dir.join(format!("{timestamp}_{trial}.dat"))
}

/// Write an `input output target` trace, one sample per line.
///
/// # Errors
///
/// Returns an error if the parent directory or file cannot be written.
pub fn write_plot(path: &Path, trace: &[TracePoint]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for point in trace {
        writeln!(writer, "{} {} {}", point.input, point.output, point.target)?;
    }
    writer.flush()
}

/// Seconds since the Unix epoch, `0` if the clock is before it.
#[must_use]
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::{BinaryOp, Node};

    const SQUARES: [(f64, f64); 3] = [(1.0, 1.0), (2.0, 4.0), (3.0, 9.0)];

    fn population() -> Vec<Individual> {
        let square = Node::Binary(BinaryOp::Multiply, Box::new([Node::Input, Node::Input]));
        vec![
            Individual::from_root(square, &SQUARES, 0.0),
            Individual::from_root(Node::Input, &SQUARES, 0.0),
        ]
    }

    #[test]
    fn test_summarize() {
        let population = population();
        let record = GenerationRecord::summarize(3, &population[1], &population);

        assert_eq!(record.generation, 3);
        assert!((record.best_score - 40.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(record.best_size, 1);
        assert_eq!(record.best_depth, 0);
        assert!((record.avg_size - 2.0).abs() < f64::EPSILON);
        assert!((record.avg_depth - 0.5).abs() < f64::EPSILON);
        let expected = (population[0].adjusted() + population[1].adjusted()) / 2.0;
        assert!((record.avg_fitness - expected).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_tolerates_non_normal() {
        let nan = Individual::from_root(Node::Constant(f64::NAN), &SQUARES, 0.0);
        let record = GenerationRecord::summarize(0, &nan, &[nan.clone()]);
        assert!(record.best_score.is_nan());
        assert!(record.avg_fitness.is_nan());
        assert_eq!(record.best_size, 1);
    }

    #[test]
    fn test_dat_log_writes_header_records_and_footer() {
        let dir = tempfile::tempdir().unwrap();
        let population = population();
        let config = EvolutionConfig::default();
        let problem = Problem::default();

        let mut log = DatLog::create(dir.path(), 1234, 2, &config, &problem).unwrap();
        assert_eq!(log.path(), dir.path().join("1234_2.dat"));
        log.record(&GenerationRecord::summarize(0, &population[0], &population))
            .unwrap();
        let stats = EvolutionStats {
            generations: 1,
            seed: 42,
            elapsed_seconds: 0.5,
        };
        log.finish(&population[0], &stats).unwrap();

        let text = fs::read_to_string(dir.path().join("1234_2.dat")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("# running a Genetic Program @ 1234"));
        assert!(lines[1].contains("population size: 100"));
        assert!(lines[2].starts_with("# gen     score"));
        assert!(lines[3].starts_with("0         0.0000    1.0000"));
        assert!(text.contains("# ((x)(x) *)"));
        assert!(text.ends_with("# Elapsed time: 0.5s\n"));
    }

    #[test]
    fn test_dat_log_fails_on_bad_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        fs::write(&file, "").unwrap();

        let result = DatLog::create(&file, 1, 0, &EvolutionConfig::default(), &Problem::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_write_plot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dat_path(&dir.path().join("plots"), 7, 0);
        let individual = Individual::from_root(Node::Input, &SQUARES, 0.0);

        write_plot(&path, &individual.trace(&SQUARES)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "1 1 1\n2 2 4\n3 3 9\n");
    }

    #[test]
    fn test_unix_timestamp_is_after_epoch() {
        // 2020-01-01
        assert!(unix_timestamp() > 1_577_836_800);
    }

    #[test]
    fn test_column_format() {
        assert_eq!(column(1.5), "1.5000");
        assert_eq!(column(2.5e7), "2.500e7");
        assert_eq!(column(f64::INFINITY), "inf");
    }
}
