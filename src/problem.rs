//! Problem definition: the dataset to fit and the tree construction limits.

// Sample generation uses intentional index casts
#![allow(clippy::cast_precision_loss)]

use crate::error::ProblemError;
use serde::Serialize;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// A symbolic regression problem, read-only while evolution runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    /// Maximum depth of initial trees and of grown mutation subtrees.
    pub max_depth: usize,
    /// Lower bound for random constants.
    pub constant_min: f64,
    /// Upper bound for random constants.
    pub constant_max: f64,
    /// `(input, target)` samples.
    pub dataset: Vec<(f64, f64)>,
}

impl Default for Problem {
    fn default() -> Self {
        Self::sampled(Builtin::Square, 4, -10.0, 10.0)
    }
}

/// Built-in target functions sampled on a fixed grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Builtin {
    /// `x^2`
    Square,
    /// `x^3 - x`
    Cubic,
    /// `sin(x) + x / 2`
    Sine,
}

impl Builtin {
    /// Target value at `x`.
    #[must_use]
    pub fn target(self, x: f64) -> f64 {
        match self {
            Self::Square => x * x,
            Self::Cubic => x * x * x - x,
            Self::Sine => x.sin() + x / 2.0,
        }
    }

    fn domain(self) -> (f64, f64) {
        match self {
            Self::Square | Self::Cubic => (-2.0, 2.0),
            Self::Sine => (-std::f64::consts::PI, std::f64::consts::PI),
        }
    }
}

/// Number of grid points for built-in problems.
const BUILTIN_SAMPLES: usize = 21;

impl Problem {
    /// Create a problem over an explicit dataset.
    #[must_use]
    pub fn new(dataset: Vec<(f64, f64)>, max_depth: usize, constant_min: f64, constant_max: f64) -> Self {
        Self {
            max_depth,
            constant_min,
            constant_max,
            dataset,
        }
    }

    /// Sample a built-in target function on an evenly spaced grid.
    #[must_use]
    pub fn sampled(builtin: Builtin, max_depth: usize, constant_min: f64, constant_max: f64) -> Self {
        let (lo, hi) = builtin.domain();
        let step = (hi - lo) / (BUILTIN_SAMPLES - 1) as f64;
        let dataset = (0..BUILTIN_SAMPLES)
            .map(|i| {
                let x = lo + step * i as f64;
                (x, builtin.target(x))
            })
            .collect();
        Self::new(dataset, max_depth, constant_min, constant_max)
    }

    /// Load a dataset file and build a problem around it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line is malformed.
    pub fn load(path: &Path, max_depth: usize, constant_min: f64, constant_max: f64) -> Result<Self, ProblemError> {
        let text = fs::read_to_string(path)?;
        let dataset = parse_dataset(&text)?;
        Ok(Self::new(dataset, max_depth, constant_min, constant_max))
    }

    /// Range constants are drawn from.
    #[must_use]
    pub fn constants(&self) -> RangeInclusive<f64> {
        self.constant_min..=self.constant_max
    }
}

/// Parse `input target` pairs, one per line.
///
/// Values may be separated by whitespace or a comma. Blank lines and lines
/// starting with `#` are skipped.
///
/// # Errors
///
/// Returns [`ProblemError::Parse`] for the first line that does not hold
/// exactly two real numbers.
pub fn parse_dataset(text: &str) -> Result<Vec<(f64, f64)>, ProblemError> {
    let mut dataset = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parse_error = || ProblemError::Parse {
            line: i + 1,
            content: trimmed.to_string(),
        };
        let values: Vec<f64> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .map(str::parse::<f64>)
            .collect::<Result<_, _>>()
            .map_err(|_| parse_error())?;
        match values[..] {
            [input, target] => dataset.push((input, target)),
            _ => return Err(parse_error()),
        }
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset() {
        let text = "# x y\n1 1\n2, 4\n\n  3\t9  \n";
        let dataset = parse_dataset(text).unwrap();
        assert_eq!(dataset, vec![(1.0, 1.0), (2.0, 4.0), (3.0, 9.0)]);
    }

    #[test]
    fn test_parse_dataset_reports_line() {
        let err = parse_dataset("1 1\n2 four\n").unwrap_err();
        assert!(matches!(err, ProblemError::Parse { line: 2, .. }));

        let err = parse_dataset("1 2 3\n").unwrap_err();
        assert!(matches!(err, ProblemError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_sampled_square() {
        let problem = Problem::sampled(Builtin::Square, 3, -1.0, 1.0);
        assert_eq!(problem.dataset.len(), BUILTIN_SAMPLES);
        for &(x, y) in &problem.dataset {
            assert!((x * x - y).abs() < 1e-12);
        }
        assert!((problem.dataset[0].0 + 2.0).abs() < 1e-12);
        assert!((problem.dataset[BUILTIN_SAMPLES - 1].0 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Problem::load(Path::new("/nonexistent/data.txt"), 4, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, ProblemError::Io(_)));
    }
}
