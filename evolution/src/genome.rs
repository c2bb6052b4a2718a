use crate::ShapeError;

use rand::Rng;

/// An interface for genomes that can be trained
/// by a [`Population`].
///
/// Fitness is a running average of the deviation
/// between a genome's outputs and the expected
/// outputs, so _lower_ is better.
///
/// [`Population`]: crate::Population
pub trait Genome: Send {
    type Config;

    /// Returns a randomized genome.
    fn new<R: Rng>(config: &Self::Config, rng: &mut R) -> Self;

    /// Computes the genome's outputs for the given inputs.
    ///
    /// # Errors
    /// Returns an error if the number of inputs does not
    /// match the genome's input width.
    fn evaluate(&self, inputs: &[f64]) -> Result<Vec<f64>, ShapeError>;

    /// Folds a new deviation sample into the genome's
    /// running average.
    fn record_fitness(&mut self, deviation: f64);

    /// Returns the average deviation over all recorded samples.
    fn fitness(&self) -> f64;

    /// Returns the number of recorded samples.
    fn evaluation_count(&self) -> usize;

    /// Returns a perturbed copy of the genome with
    /// reset fitness.
    fn mutate<R: Rng>(&self, rng: &mut R) -> Self;
}
