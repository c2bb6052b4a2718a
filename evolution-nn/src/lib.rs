//! # Evolution-NN
//! A fixed-topology feed-forward network implementing the
//! `evolution` crate's [`Genome`] trait.
//!
//! Networks are fully connected between consecutive layers,
//! every non-input node has a bias weight and a `tanh`
//! activation, and weights are stored in one flat buffer
//! per layer transition.
//!
//! [`Genome`]: evolution::Genome
//!
//! # Example usage
//! ```
//! use evolution_nn::{Network, TopologyConfig};
//!
//! let topology = TopologyConfig::new(2, 1, &[3]).unwrap();
//! let mut network = Network::new(&topology, &mut rand::thread_rng());
//!
//! let output = network.evaluate(&[1.0, 0.0]).unwrap();
//! network.record_fitness((output[0] - 1.0).abs());
//!
//! let child = network.mutate(&mut rand::thread_rng());
//! assert_eq!(child.layer_sizes(), &[2, 3, 1]);
//! ```

pub mod networks;

pub use networks::{Network, TopologyConfig};
