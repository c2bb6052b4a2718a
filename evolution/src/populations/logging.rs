use super::Population;

use crate::genome::Genome;

use std::cmp::Ordering;
use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones the surviving quarter of the population.
    Survivors,
    /// Clones only the population champion.
    Champion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a ranked population.
#[derive(Clone, Debug)]
pub struct Log<G> {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord<G>,
    /// Mean fitness of the surviving quarter.
    pub survivor_deviation: f64,
    pub fitness: Stats,
    pub evaluations: Stats,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \tsurvivor_deviation: {:?}\n\
            \tfitness: {:?}\n\
            \tevaluations: {:?}\n\
            }}",
            &self.generation_number, &self.survivor_deviation, &self.fitness, &self.evaluations,
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// An empty sequence yields NaN everywhere.
    ///
    /// # Examples
    /// ```
    /// use evolution::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Stats {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: f64::NAN,
                minimum: f64::NAN,
                mean: f64::NAN,
                median: f64::NAN,
            };
        }
        data.sort_unstable_by(f64::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f64>() / data.len() as f64,
            median,
        }
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord<G> {
    /// The surviving quarter, best first.
    Survivors(Vec<G>),
    /// Only the population champion.
    Champion(G),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Genome + Clone> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// # use evolution_nn::Network as G;
    /// use evolution::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let logger = EvolutionLogger::<G>::new(ReportingLevel::NoGenomes);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a ranked population.
    ///
    /// Meant to be called from the observer passed to
    /// [`Population::train_with`], after ranking and
    /// before regeneration.
    pub fn log<C>(&mut self, population: &Population<C, G>)
    where
        G: Genome<Config = C>,
    {
        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::Survivors => {
                    GenerationMemberRecord::Survivors(population.survivors().to_vec())
                }
                ReportingLevel::Champion => {
                    GenerationMemberRecord::Champion(population.champion().clone())
                }
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
            survivor_deviation: population.survivor_deviation(),
            fitness: Stats::from(population.genomes().iter().map(G::fitness)),
            evaluations: Stats::from(
                population
                    .genomes()
                    .iter()
                    .map(|g| g.evaluation_count() as f64),
            ),
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }

    /// Returns the snapshot with the lowest survivor deviation.
    pub fn best(&self) -> Option<&Log<G>> {
        self.logs.iter().min_by(|a, b| {
            a.survivor_deviation
                .partial_cmp(&b.survivor_deviation)
                .unwrap_or(Ordering::Equal)
        })
    }
}
