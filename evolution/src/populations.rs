//! A Population is a ranked collection of genomes,
//! trained against rows sampled from a [`DataSet`].
//!
//! Each generation, every genome is scored on a
//! number of randomly drawn rows, the population is
//! sorted by average deviation, and the worse
//! three quarters are regenerated from the best one.
//!
//! [`DataSet`]: crate::data::DataSet
mod config;
pub mod logging;

use crate::data::{deviation, extract_columns, DataSet};
use crate::{ConfigError, DataError, Genome, TrainingError};
pub use config::PopulationConfig;

use rand::prelude::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// A population of genomes.
pub struct Population<C, G> {
    genomes: Vec<G>,
    generation: usize,
    rng: ChaCha8Rng,
    last_report: Option<Instant>,
    population_config: PopulationConfig,
    genetic_config: C,
}

impl<C, G> Population<C, G>
where
    G: Genome<Config = C>,
{
    /// Creates a new population of randomized genomes
    /// using the passed configurations.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// # Errors
    /// Returns an error if the population configuration
    /// is invalid, see [`PopulationConfig::validate`].
    ///
    /// # Examples
    /// ```
    /// # use evolution_nn::{Network as G, TopologyConfig};
    /// use evolution::{Population, PopulationConfig};
    ///
    /// let config = PopulationConfig {
    ///     size: 8,
    ///     input_columns: vec![0, 1],
    ///     output_columns: vec![2],
    ///     ..PopulationConfig::zero()
    /// };
    /// # let genetic_config = TopologyConfig::new(2, 1, &[3]).unwrap();
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, G>::new(config, genetic_config).unwrap();
    /// assert_eq!(population.genomes().len(), 8);
    /// ```
    pub fn new(
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Result<Population<C, G>, ConfigError> {
        population_config.validate()?;
        let mut rng = match population_config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let genomes = (0..population_config.size)
            .map(|_| G::new(&genetic_config, &mut rng))
            .collect();

        Ok(Population {
            genomes,
            generation: 0,
            rng,
            last_report: None,
            population_config,
            genetic_config,
        })
    }

    /// Trains the population on `data` for the configured
    /// number of generations, and returns the champion.
    ///
    /// # Errors
    /// Returns an error if `data` is empty, a sampled row is
    /// too short for the configured columns, or a genome's
    /// input or output width differs from the number of
    /// input or output columns.
    ///
    /// # Examples
    /// ```
    /// # use evolution_nn::{Network as G, TopologyConfig};
    /// use evolution::{data::DataSet, Genome, Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = PopulationConfig {
    ///     size: 8,
    ///     generations: NonZeroUsize::new(5).unwrap(),
    ///     sub_iterations: NonZeroUsize::new(10).unwrap(),
    ///     input_columns: vec![0, 1],
    ///     output_columns: vec![2],
    ///     seed: Some(42),
    ///     ..PopulationConfig::zero()
    /// };
    /// # let genetic_config = TopologyConfig::new(2, 1, &[3]).unwrap();
    /// let data = DataSet::from_rows(vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]]);
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, G>::new(config, genetic_config).unwrap();
    /// let champion = population.train(&data).unwrap();
    /// assert!(champion.fitness().is_finite());
    /// ```
    pub fn train(&mut self, data: &DataSet) -> Result<&G, TrainingError> {
        self.train_with(data, &AtomicBool::new(false), |_| {})
    }

    /// Trains the population like [`train`], calling `observer`
    /// after every ranking, and stopping at the end of the
    /// current generation once `cancel` is set.
    ///
    /// A cancelled run is left ranked but not regenerated,
    /// so [`champion`] is still meaningful.
    ///
    /// [`train`]: Population::train
    /// [`champion`]: Population::champion
    ///
    /// # Errors
    /// See [`train`].
    pub fn train_with<F>(
        &mut self,
        data: &DataSet,
        cancel: &AtomicBool,
        mut observer: F,
    ) -> Result<&G, TrainingError>
    where
        F: FnMut(&Population<C, G>),
    {
        if data.is_empty() {
            return Err(DataError::Empty.into());
        }
        for remaining in (0..self.population_config.generations.get()).rev() {
            self.evaluate_generation(data)?;
            self.rank();
            self.report();
            observer(&*self);
            if remaining == 0 {
                break;
            }
            if cancel.load(Ordering::Relaxed) {
                log::info!("training cancelled after generation {}", self.generation + 1);
                break;
            }
            self.regenerate();
        }
        Ok(self.champion())
    }

    /// Scores every genome on the configured number of
    /// rows drawn uniformly, with replacement, from `data`.
    ///
    /// # Errors
    /// See [`train`](Population::train).
    pub fn evaluate_generation(&mut self, data: &DataSet) -> Result<(), TrainingError> {
        if data.is_empty() {
            return Err(DataError::Empty.into());
        }
        for _ in 0..self.population_config.sub_iterations.get() {
            let row = &data.rows()[self.rng.gen_range(0..data.len())];
            let inputs = extract_columns(row, &self.population_config.input_columns)?;
            let targets = extract_columns(row, &self.population_config.output_columns)?;
            self.evaluate_sample(&inputs, &targets)?;
        }
        Ok(())
    }

    /// Evaluates every genome on a single example in parallel,
    /// recording each genome's deviation from `targets`.
    ///
    /// # Errors
    /// Returns an error if a genome rejects the number of inputs,
    /// or produces a different number of outputs than `targets`.
    pub fn evaluate_sample(&mut self, inputs: &[f64], targets: &[f64]) -> Result<(), TrainingError> {
        self.genomes
            .par_iter_mut()
            .try_for_each(|genome| -> Result<(), TrainingError> {
                let outputs = genome.evaluate(inputs)?;
                if outputs.len() != targets.len() {
                    return Err(TrainingError::Outputs {
                        expected: targets.len(),
                        found: outputs.len(),
                    });
                }
                genome.record_fitness(deviation(&outputs, targets));
                Ok(())
            })
    }

    /// Sorts the population by increasing average deviation.
    /// The sort is stable.
    pub fn rank(&mut self) {
        self.genomes
            .sort_by(|g1, g2| g1.fitness().total_cmp(&g2.fitness()));
    }

    /// Replaces the worse three quarters of a ranked population.
    ///
    /// The first quarter survives untouched. The second and third
    /// quarters are replaced by mutated copies of the survivor at
    /// the same position within the first quarter, or by random
    /// genomes where that survivor has a deviation of exactly zero
    /// (its copies would be identical to it). The last quarter is
    /// replaced by random genomes.
    pub fn regenerate(&mut self) {
        let quarter = self.population_config.quarter();
        for offset in [quarter, 2 * quarter] {
            for j in 0..quarter {
                let child = if self.genomes[j].fitness() == 0.0 {
                    G::new(&self.genetic_config, &mut self.rng)
                } else {
                    self.genomes[j].mutate(&mut self.rng)
                };
                self.genomes[offset + j] = child;
            }
        }
        for genome in &mut self.genomes[3 * quarter..] {
            *genome = G::new(&self.genetic_config, &mut self.rng);
        }
        self.generation += 1;
    }

    fn report(&mut self) {
        let deviation = self.survivor_deviation();
        log::debug!(
            "generation {}: survivor deviation {}, champion deviation {}",
            self.generation + 1,
            deviation,
            self.champion().fitness()
        );
        let now = Instant::now();
        let due = self.last_report.map_or(true, |last| {
            now.duration_since(last) >= self.population_config.report_interval
        });
        if due {
            self.last_report = Some(now);
            let width = self.population_config.generations.to_string().len();
            log::info!(
                "generation {:>width$} - deviation: {}",
                self.generation + 1,
                deviation,
                width = width
            );
        }
    }

    /// Returns the mean average deviation of the
    /// best quarter of the population.
    pub fn survivor_deviation(&self) -> f64 {
        let survivors = self.survivors();
        survivors.iter().map(G::fitness).sum::<f64>() / survivors.len() as f64
    }

    /// Returns the best quarter of the population.
    /// Only meaningful after ranking.
    pub fn survivors(&self) -> &[G] {
        &self.genomes[..self.population_config.quarter()]
    }

    /// Returns the best-performing genome of the last ranking.
    pub fn champion(&self) -> &G {
        &self.genomes[0]
    }

    /// Returns all genomes, in the order of the last ranking.
    pub fn genomes(&self) -> &[G] {
        &self.genomes
    }

    /// Returns the number of completed regenerations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population configuration.
    pub fn config(&self) -> &PopulationConfig {
        &self.population_config
    }
}

#[cfg(test)]
mod tests {
    use super::logging::{EvolutionLogger, GenerationMemberRecord, ReportingLevel};
    use super::*;
    use crate::ShapeError;

    use std::num::NonZeroUsize;

    /// Single-weight genome computing `tanh(w * sum(inputs))`.
    #[derive(Clone, Debug, PartialEq)]
    struct Scalar {
        weight: f64,
        fitness: f64,
        evaluations: usize,
        children: usize,
    }

    impl Genome for Scalar {
        type Config = usize;

        fn new<R: Rng>(_config: &usize, rng: &mut R) -> Self {
            Scalar {
                weight: rng.gen_range(-1.0f64..=1.0),
                fitness: 0.0,
                evaluations: 0,
                children: 0,
            }
        }

        fn evaluate(&self, inputs: &[f64]) -> Result<Vec<f64>, ShapeError> {
            Ok(vec![(self.weight * inputs.iter().sum::<f64>()).tanh()])
        }

        fn record_fitness(&mut self, deviation: f64) {
            self.fitness = (self.fitness * self.evaluations as f64 + deviation)
                / (self.evaluations + 1) as f64;
            self.evaluations += 1;
        }

        fn fitness(&self) -> f64 {
            self.fitness
        }

        fn evaluation_count(&self) -> usize {
            self.evaluations
        }

        fn mutate<R: Rng>(&self, rng: &mut R) -> Self {
            Scalar {
                weight: self.weight + rng.gen_range(-1.0f64..=1.0) * self.fitness,
                fitness: 0.0,
                evaluations: 0,
                children: self.children + 1,
            }
        }
    }

    fn config(size: usize) -> PopulationConfig {
        PopulationConfig {
            size,
            generations: NonZeroUsize::new(3).unwrap(),
            sub_iterations: NonZeroUsize::new(4).unwrap(),
            input_columns: vec![0],
            output_columns: vec![1],
            seed: Some(7),
            ..PopulationConfig::zero()
        }
    }

    fn data() -> DataSet {
        DataSet::from_rows(vec![vec![1.0, 0.5], vec![-1.0, -0.5], vec![0.0, 0.0]])
    }

    #[test]
    fn new_rejects_bad_size() {
        assert!(matches!(
            Population::<_, Scalar>::new(config(7), 1),
            Err(ConfigError::PopulationSize(7))
        ));
        assert!(matches!(
            Population::<_, Scalar>::new(config(0), 1),
            Err(ConfigError::PopulationSize(0))
        ));
    }

    #[test]
    fn train_rejects_empty_data() {
        let mut population = Population::<_, Scalar>::new(config(4), 1).unwrap();
        assert!(matches!(
            population.train(&DataSet::default()),
            Err(TrainingError::Data(DataError::Empty))
        ));
        assert!(population.genomes().iter().all(|g| g.evaluations == 0));
    }

    #[test]
    fn train_rejects_short_rows() {
        let mut population = Population::<_, Scalar>::new(config(4), 1).unwrap();
        let data = DataSet::from_rows(vec![vec![1.0]]);
        assert!(matches!(
            population.train(&data),
            Err(TrainingError::Index(e)) if e.column == 1 && e.row_len == 1
        ));
    }

    #[test]
    fn evaluate_sample_rejects_extra_targets() {
        let mut population = Population::<_, Scalar>::new(config(4), 1).unwrap();
        assert!(matches!(
            population.evaluate_sample(&[0.5], &[0.5, 0.5]),
            Err(TrainingError::Outputs {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn train_rejects_output_column_mismatch() {
        let config = PopulationConfig {
            output_columns: vec![1, 0],
            ..config(4)
        };
        let mut population = Population::<_, Scalar>::new(config, 1).unwrap();
        assert!(matches!(
            population.train(&data()),
            Err(TrainingError::Outputs {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn evaluate_sample_records_every_genome() {
        let mut population = Population::<_, Scalar>::new(config(8), 1).unwrap();
        population.evaluate_sample(&[0.0], &[0.25]).unwrap();
        population.evaluate_sample(&[0.0], &[0.75]).unwrap();
        for genome in population.genomes() {
            assert_eq!(genome.evaluations, 2);
            assert_eq!(genome.fitness, 0.5);
        }
    }

    #[test]
    fn rank_orders_by_fitness() {
        let mut population = Population::<_, Scalar>::new(config(8), 1).unwrap();
        population.evaluate_sample(&[1.0], &[0.0]).unwrap();
        population.rank();
        let fitnesses: Vec<f64> = population.genomes().iter().map(|g| g.fitness).collect();
        assert!(fitnesses.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(population.champion().fitness, fitnesses[0]);
    }

    #[test]
    fn regenerate_quarters() {
        let mut population = Population::<_, Scalar>::new(config(8), 1).unwrap();
        population.evaluate_sample(&[1.0], &[0.0]).unwrap();
        population.rank();
        let survivors = population.survivors().to_vec();

        population.regenerate();

        let genomes = population.genomes();
        assert_eq!(&genomes[..2], &survivors[..]);
        for (j, survivor) in survivors.iter().enumerate() {
            for child in [&genomes[2 + j], &genomes[4 + j]] {
                assert_eq!(child.children, survivor.children + 1);
                assert!((child.weight - survivor.weight).abs() <= survivor.fitness + 1e-12);
                assert_eq!(child.evaluations, 0);
            }
        }
        assert!(genomes[6..].iter().all(|g| g.children == 0 && g.evaluations == 0));
        assert_eq!(population.generation(), 1);
    }

    #[test]
    fn regenerate_replaces_children_of_perfect_survivors() {
        let mut population = Population::<_, Scalar>::new(config(4), 1).unwrap();
        // Zero input makes every output 0.0, matching the target exactly.
        population.evaluate_sample(&[0.0], &[0.0]).unwrap();
        population.rank();
        population.regenerate();
        assert_eq!(population.genomes()[0].evaluations, 1);
        assert!(population.genomes()[1..].iter().all(|g| g.children == 0));
    }

    #[test]
    fn train_skips_final_regeneration() {
        let mut population = Population::<_, Scalar>::new(config(4), 1).unwrap();
        let mut rankings = 0;
        population
            .train_with(&data(), &AtomicBool::new(false), |_| rankings += 1)
            .unwrap();
        assert_eq!(rankings, 3);
        assert_eq!(population.generation(), 2);
        // Nothing was regenerated after the last ranking.
        assert!(population.genomes().iter().all(|g| g.evaluations > 0));
    }

    #[test]
    fn train_cancelled() {
        let mut population = Population::<_, Scalar>::new(config(4), 1).unwrap();
        let cancel = AtomicBool::new(true);
        let mut rankings = 0;
        population
            .train_with(&data(), &cancel, |_| rankings += 1)
            .unwrap();
        assert_eq!(rankings, 1);
        assert_eq!(population.generation(), 0);
        assert!(population.genomes().iter().all(|g| g.evaluations == 4));
    }

    #[test]
    fn seeded_runs_are_identical() {
        let run = || {
            let mut population = Population::<_, Scalar>::new(config(8), 1).unwrap();
            population.train(&data()).unwrap();
            population.genomes().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn logger_records_rankings() {
        let mut population = Population::<_, Scalar>::new(config(8), 1).unwrap();
        let mut logger = EvolutionLogger::new(ReportingLevel::Survivors);
        population
            .train_with(&data(), &AtomicBool::new(false), |p| logger.log(p))
            .unwrap();

        let logs: Vec<_> = logger.iter().collect();
        assert_eq!(logs.len(), 3);
        assert_eq!(
            logs.iter().map(|l| l.generation_number).collect::<Vec<_>>(),
            [0, 1, 2]
        );
        let last = logs[2];
        assert_eq!(last.survivor_deviation, population.survivor_deviation());
        match &last.generation_sample {
            GenerationMemberRecord::Survivors(survivors) => {
                assert_eq!(&survivors[..], population.survivors())
            }
            other => panic!("unexpected record {:?}", other),
        }
        assert!(logger.best().is_some());
    }
}
