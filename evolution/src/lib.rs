//! Evolutionary training of function approximators on tabular data.
//!
//! Instead of gradient descent, a [`Population`] of genomes is scored
//! against rows sampled from a [`DataSet`], ranked by their running
//! average deviation, and the worse three quarters are regenerated
//! each generation from mutated copies of the best quarter and from
//! fresh random genomes.
//!
//! Genomes are arbitrary types implementing the [`Genome`] trait.
//! A fixed-topology feed-forward network is supplied by the
//! `evolution-nn` crate.
//!
//! [`DataSet`]: crate::data::DataSet
//!
//! # Example usage: fitting a small truth table
//! ```
//! use evolution::{data::DataSet, Genome, Population, PopulationConfig};
//! use evolution_nn::{Network, TopologyConfig};
//! use std::num::NonZeroUsize;
//!
//! fn main() {
//!     // Two input columns, one target column.
//!     let data = DataSet::parse("0 0 -1\n0 1 1\n1 0 1\n1 1 -1\n");
//!
//!     let population_config = PopulationConfig {
//!         size: 32,
//!         generations: NonZeroUsize::new(50).unwrap(),
//!         sub_iterations: NonZeroUsize::new(16).unwrap(),
//!         input_columns: vec![0, 1],
//!         output_columns: vec![2],
//!         seed: Some(1),
//!         ..PopulationConfig::zero()
//!     };
//!     let topology = TopologyConfig::new(2, 1, &[4]).unwrap();
//!
//!     let mut population = Population::<_, Network>::new(population_config, topology).unwrap();
//!     match population.train(&data) {
//!         Ok(champion) => println!(
//!             "best deviation {} over {} samples",
//!             champion.fitness(),
//!             champion.evaluation_count()
//!         ),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

pub mod data;
mod errors;
mod genome;
mod populations;

pub use errors::*;
pub use genome::*;
pub use populations::*;
