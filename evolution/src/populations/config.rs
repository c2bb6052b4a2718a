use crate::ConfigError;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Configuration data for population generation
/// and training.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Size of the population. Must be a positive
    /// multiple of 4, as the population is split
    /// into quarters during regeneration.
    pub size: usize,
    /// Number of generations to train for.
    pub generations: NonZeroUsize,
    /// Number of rows sampled (with replacement)
    /// per generation.
    pub sub_iterations: NonZeroUsize,
    /// Row columns fed to the genomes as inputs.
    pub input_columns: Vec<usize>,
    /// Row columns the genomes' outputs are compared to.
    pub output_columns: Vec<usize>,
    /// Minimum time between two progress reports
    /// at the `info` log level.
    pub report_interval: Duration,
    /// Seed of the population's random number generator.
    /// If `None`, the generator is seeded from entropy.
    pub seed: Option<u64>,
}

impl PopulationConfig {
    /// Returns a "zero-valued" configuration.
    /// All values are 0, empty, `None`, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value does not pass [`validate`]. It is meant
    /// as a way to abbreviate configuration instantiation.
    ///
    /// [`validate`]: PopulationConfig::validate
    ///
    /// # Examples
    /// ```
    /// use evolution::PopulationConfig;
    ///
    /// let config = PopulationConfig {
    ///     size: 8,
    ///     input_columns: vec![0, 1],
    ///     output_columns: vec![2],
    ///     ..PopulationConfig::zero()
    /// };
    /// assert!(config.validate().is_ok());
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: 0,
            generations: NonZeroUsize::MIN,
            sub_iterations: NonZeroUsize::MIN,
            input_columns: vec![],
            output_columns: vec![],
            report_interval: Duration::ZERO,
            seed: None,
        }
    }

    /// Checks that the population can be split into
    /// quarters and that the column sets are usable.
    ///
    /// # Errors
    /// Returns the first problem found.
    ///
    /// # Examples
    /// ```
    /// use evolution::{ConfigError, PopulationConfig};
    ///
    /// let config = PopulationConfig { size: 7, ..PopulationConfig::default() };
    /// assert_eq!(config.validate(), Err(ConfigError::PopulationSize(7)));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 || self.size % 4 != 0 {
            return Err(ConfigError::PopulationSize(self.size));
        }
        for columns in [&self.input_columns, &self.output_columns] {
            if columns.is_empty() {
                return Err(ConfigError::NoColumns);
            }
            let mut seen = HashSet::with_capacity_and_hasher(columns.len(), RandomState::new());
            if let Some(&duplicate) = columns.iter().find(|&&c| !seen.insert(c)) {
                return Err(ConfigError::DuplicateColumn(duplicate));
            }
        }
        Ok(())
    }

    /// Number of genomes in each quarter of the population.
    pub fn quarter(&self) -> usize {
        self.size / 4
    }
}

impl Default for PopulationConfig {
    /// 128 genomes trained for 4096 generations of
    /// 64 samples, on nine input and two output columns.
    fn default() -> PopulationConfig {
        PopulationConfig {
            size: 128,
            generations: NonZeroUsize::new(4096).unwrap(),
            sub_iterations: NonZeroUsize::new(64).unwrap(),
            input_columns: (0..9).collect(),
            output_columns: vec![9, 10],
            report_interval: Duration::from_secs(1),
            seed: None,
        }
    }
}
