//! A fixed-topology, fully-connected feed-forward network
//! with `tanh` activations, usable as a [`Genome`].
//!
//! The network's weights are its genes: evolution never
//! changes the topology, only perturbs the weights of
//! copies of well-performing networks.
//!
//! [`Genome`]: evolution::Genome
mod config;
mod layer;

pub use config::TopologyConfig;
use layer::Layer;

use evolution::{ConfigError, Genome, ShapeError};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// A feed-forward neural network that keeps track of its
/// own average deviation from the expected outputs.
///
/// Supports Serde for convenient inspection of trained weights.
/// Deserialized networks are checked for a consistent shape.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork")]
pub struct Network {
    layer_sizes: Box<[usize]>,
    layers: Box<[Layer]>,
    fitness: f64,
    evaluation_count: usize,
}

#[derive(Deserialize)]
struct RawNetwork {
    layer_sizes: Box<[usize]>,
    layers: Box<[Layer]>,
    fitness: f64,
    evaluation_count: usize,
}

impl TryFrom<RawNetwork> for Network {
    type Error = String;

    fn try_from(raw: RawNetwork) -> Result<Network, String> {
        if raw.layer_sizes.len() < 2 || raw.layer_sizes.contains(&0) {
            return Err(format!("invalid layer sizes {:?}", raw.layer_sizes));
        }
        if raw.layers.len() != raw.layer_sizes.len() - 1 {
            return Err(format!(
                "expected {} layers, found {}",
                raw.layer_sizes.len() - 1,
                raw.layers.len()
            ));
        }
        for (i, (layer, pair)) in raw.layers.iter().zip(raw.layer_sizes.windows(2)).enumerate() {
            if !layer.has_shape(pair[0], pair[1]) {
                return Err(format!(
                    "layer {} does not connect {} to {} nodes",
                    i, pair[0], pair[1]
                ));
            }
        }
        Ok(Network {
            layer_sizes: raw.layer_sizes,
            layers: raw.layers,
            fitness: raw.fitness,
            evaluation_count: raw.evaluation_count,
        })
    }
}

impl Network {
    /// Creates a network with the configured topology and
    /// every weight drawn uniformly from [-1, 1].
    ///
    /// # Examples
    /// ```
    /// use evolution_nn::{Network, TopologyConfig};
    ///
    /// let config = TopologyConfig::new(9, 2, &[12, 8]).unwrap();
    /// let network = Network::new(&config, &mut rand::thread_rng());
    ///
    /// assert_eq!(network.layer_sizes(), &[9, 12, 8, 2]);
    /// assert!(network.weights(0).iter().all(|w| w.abs() <= 1.0));
    /// assert_eq!(network.weights(0).len(), 12 * (9 + 1));
    /// ```
    pub fn new<R: Rng>(config: &TopologyConfig, rng: &mut R) -> Network {
        let layer_sizes: Box<[usize]> = config.layer_sizes().into();
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Layer::random(pair[0], pair[1], rng))
            .collect();
        Network {
            layer_sizes,
            layers,
            fitness: 0.0,
            evaluation_count: 0,
        }
    }

    /// Creates a network from raw layer widths.
    ///
    /// # Errors
    /// Returns an error if any width is zero.
    ///
    /// # Examples
    /// ```
    /// use evolution_nn::Network;
    ///
    /// let mut rng = rand::thread_rng();
    /// assert!(Network::with_layers(2, 1, &[3], &mut rng).is_ok());
    /// assert!(Network::with_layers(2, 0, &[3], &mut rng).is_err());
    /// ```
    pub fn with_layers<R: Rng>(
        input_count: usize,
        output_count: usize,
        hidden_layers: &[usize],
        rng: &mut R,
    ) -> Result<Network, ConfigError> {
        let config = TopologyConfig::new(input_count, output_count, hidden_layers)?;
        Ok(Network::new(&config, rng))
    }

    /// Feeds `inputs` forward through the network and
    /// returns the output layer's activations.
    ///
    /// Inputs are used as-is; every other node computes
    /// `tanh` of its weighted inputs plus its bias.
    ///
    /// # Errors
    /// Returns an error if `inputs` does not have exactly
    /// one value per input node.
    ///
    /// # Examples
    /// ```
    /// use evolution_nn::Network;
    ///
    /// let network = Network::with_layers(2, 3, &[4], &mut rand::thread_rng()).unwrap();
    /// let outputs = network.evaluate(&[0.5, -0.5]).unwrap();
    ///
    /// assert_eq!(outputs.len(), 3);
    /// assert!(outputs.iter().all(|o| o.abs() < 1.0));
    /// assert!(network.evaluate(&[0.5]).is_err());
    /// ```
    pub fn evaluate(&self, inputs: &[f64]) -> Result<Vec<f64>, ShapeError> {
        if inputs.len() != self.input_count() {
            return Err(ShapeError {
                expected: self.input_count(),
                found: inputs.len(),
            });
        }
        let mut activations = inputs.to_vec();
        let mut next = Vec::with_capacity(self.layer_sizes.iter().copied().max().unwrap_or(0));
        for layer in self.layers.iter() {
            layer.propagate(&activations, &mut next);
            std::mem::swap(&mut activations, &mut next);
        }
        Ok(activations)
    }

    /// Folds a deviation sample into the network's
    /// running average deviation.
    ///
    /// # Examples
    /// ```
    /// use evolution_nn::Network;
    ///
    /// let mut network = Network::with_layers(1, 1, &[], &mut rand::thread_rng()).unwrap();
    /// network.record_fitness(1.0);
    /// network.record_fitness(2.0);
    ///
    /// assert_eq!(network.fitness(), 1.5);
    /// assert_eq!(network.evaluation_count(), 2);
    /// ```
    pub fn record_fitness(&mut self, deviation: f64) {
        self.fitness = (self.fitness * self.evaluation_count as f64 + deviation)
            / (self.evaluation_count + 1) as f64;
        self.evaluation_count += 1;
    }

    /// Returns a copy of the network with reset fitness, where
    /// every weight is shifted by a value drawn uniformly from
    /// `±fitness / output_count`.
    ///
    /// A network with zero average deviation therefore
    /// produces exact copies of itself.
    ///
    /// # Examples
    /// ```
    /// use evolution_nn::Network;
    ///
    /// let mut rng = rand::thread_rng();
    /// let mut network = Network::with_layers(2, 2, &[3], &mut rng).unwrap();
    /// network.record_fitness(0.5);
    ///
    /// let child = network.mutate(&mut rng);
    /// assert_eq!(child.layer_sizes(), network.layer_sizes());
    /// assert_eq!(child.evaluation_count(), 0);
    /// for (c, p) in child.weights(0).iter().zip(network.weights(0)) {
    ///     assert!((c - p).abs() <= 0.5 / 2.0 + 1e-12);
    /// }
    /// ```
    pub fn mutate<R: Rng>(&self, rng: &mut R) -> Network {
        let scale = self.fitness / self.output_count() as f64;
        Network {
            layer_sizes: self.layer_sizes.clone(),
            layers: self
                .layers
                .iter()
                .map(|layer| layer.perturbed(scale, rng))
                .collect(),
            fitness: 0.0,
            evaluation_count: 0,
        }
    }

    /// Returns the width of every layer, input first.
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    /// Returns the number of input nodes.
    pub fn input_count(&self) -> usize {
        self.layer_sizes[0]
    }

    /// Returns the number of output nodes.
    pub fn output_count(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Returns the weights from layer `layer` into layer `layer + 1`,
    /// row-major by destination node, each row ending in the
    /// destination node's bias weight.
    ///
    /// # Panics
    /// Panics if `layer` is not smaller than `layer_sizes().len() - 1`.
    pub fn weights(&self, layer: usize) -> &[f64] {
        self.layers[layer].weights()
    }

    /// Returns the weight from `source` in layer `layer` to `node` in
    /// layer `layer + 1`. A `source` equal to the width of `layer`
    /// designates the bias weight.
    ///
    /// # Panics
    /// Panics if any index is out of range.
    pub fn weight(&self, layer: usize, node: usize, source: usize) -> f64 {
        self.layers[layer].row(node)[source]
    }

    /// Returns the average deviation over all recorded samples.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Returns the number of recorded deviation samples.
    pub fn evaluation_count(&self) -> usize {
        self.evaluation_count
    }
}

impl Genome for Network {
    type Config = TopologyConfig;

    fn new<R: Rng>(config: &TopologyConfig, rng: &mut R) -> Self {
        Network::new(config, rng)
    }

    fn evaluate(&self, inputs: &[f64]) -> Result<Vec<f64>, ShapeError> {
        Network::evaluate(self, inputs)
    }

    fn record_fitness(&mut self, deviation: f64) {
        Network::record_fitness(self, deviation)
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn evaluation_count(&self) -> usize {
        self.evaluation_count
    }

    fn mutate<R: Rng>(&self, rng: &mut R) -> Self {
        Network::mutate(self, rng)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("layers", &self.layer_sizes)
            .field("fitness", &self.fitness)
            .field("evaluations", &self.evaluation_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0x5eed)
    }

    fn inputs(count: usize, rng: &mut ChaCha8Rng) -> Vec<f64> {
        (0..count).map(|_| rng.gen_range(-1.0..=1.0)).collect()
    }

    #[test]
    fn weight_shapes() {
        let network = Network::with_layers(3, 2, &[5, 4], &mut rng()).unwrap();
        assert_eq!(network.layer_sizes(), &[3, 5, 4, 2]);
        assert_eq!(network.layers.len(), 3);
        for (i, layer) in network.layers.iter().enumerate() {
            let (from, to) = (network.layer_sizes[i], network.layer_sizes[i + 1]);
            assert_eq!(layer.output_count(), to);
            assert_eq!(layer.weights().len(), to * (from + 1));
            for node in 0..to {
                assert_eq!(layer.row(node).len(), from + 1);
            }
        }
        assert!((0..3).all(|l| network.weights(l).iter().all(|w| (-1.0..=1.0).contains(w))));
    }

    #[test]
    fn fresh_network_has_no_fitness() {
        let network = Network::with_layers(1, 1, &[1], &mut rng()).unwrap();
        assert_eq!(network.fitness(), 0.0);
        assert_eq!(network.evaluation_count(), 0);
    }

    #[test]
    fn invalid_widths() {
        let mut rng = rng();
        assert_eq!(
            Network::with_layers(0, 1, &[], &mut rng),
            Err(ConfigError::InvalidWidth { layer: 0 })
        );
        assert_eq!(
            Network::with_layers(2, 1, &[3, 0], &mut rng),
            Err(ConfigError::InvalidWidth { layer: 2 })
        );
    }

    #[test]
    fn evaluate_output_range() {
        let mut rng = rng();
        let hidden_layers: [&[usize]; 5] = [&[], &[1], &[3], &[6, 4], &[2, 7, 3]];
        for hidden in hidden_layers {
            for (input_count, output_count) in [(1, 1), (2, 3), (5, 2)] {
                let network =
                    Network::with_layers(input_count, output_count, hidden, &mut rng).unwrap();
                for _ in 0..20 {
                    let outputs = network.evaluate(&inputs(input_count, &mut rng)).unwrap();
                    assert_eq!(outputs.len(), output_count);
                    assert!(outputs.iter().all(|o| *o > -1.0 && *o < 1.0));
                }
            }
        }
    }

    #[test]
    fn evaluate_deterministic() {
        let mut rng = rng();
        let network = Network::with_layers(4, 2, &[8, 8], &mut rng).unwrap();
        let inputs = inputs(4, &mut rng);
        let first = network.evaluate(&inputs).unwrap();
        for _ in 0..10 {
            let again = network.evaluate(&inputs).unwrap();
            assert!(first
                .iter()
                .zip(&again)
                .all(|(a, b)| a.to_bits() == b.to_bits()));
        }
    }

    #[test]
    fn evaluate_by_hand() {
        let network = Network::with_layers(2, 1, &[2], &mut rng()).unwrap();
        let x = [0.3, -0.7];
        let hidden: Vec<f64> = (0..2)
            .map(|j| {
                (x[0] * network.weight(0, j, 0) + x[1] * network.weight(0, j, 1)
                    + network.weight(0, j, 2))
                .tanh()
            })
            .collect();
        let expected = (hidden[0] * network.weight(1, 0, 0)
            + hidden[1] * network.weight(1, 0, 1)
            + network.weight(1, 0, 2))
        .tanh();
        let output = network.evaluate(&x).unwrap()[0];
        assert!((output - expected).abs() < 1e-12);
    }

    #[test]
    fn evaluate_wrong_input_length() {
        let network = Network::with_layers(3, 1, &[2], &mut rng()).unwrap();
        assert_eq!(
            network.evaluate(&[1.0, 2.0]),
            Err(ShapeError {
                expected: 3,
                found: 2
            })
        );
        assert!(network.evaluate(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn record_fitness_running_mean() {
        let mut network = Network::with_layers(1, 1, &[], &mut rng()).unwrap();
        let deviations = [0.3, 1.7, 0.0, 2.25, 0.125, 0.9];
        for (i, d) in deviations.iter().enumerate() {
            network.record_fitness(*d);
            let mean = deviations[..=i].iter().sum::<f64>() / (i + 1) as f64;
            assert!((network.fitness() - mean).abs() < 1e-12);
            assert_eq!(network.evaluation_count(), i + 1);
        }
    }

    #[test]
    fn mutate_without_deviation_copies_weights() {
        let mut rng = rng();
        let mut network = Network::with_layers(3, 2, &[4], &mut rng).unwrap();
        network.record_fitness(0.0);
        network.record_fitness(0.0);
        let child = network.mutate(&mut rng);
        assert_eq!(child.layers, network.layers);
        assert_eq!(child.evaluation_count(), 0);
        assert_eq!(child.fitness(), 0.0);
    }

    #[test]
    fn mutate_bounded_by_deviation_over_outputs() {
        let mut rng = rng();
        for output_count in 1..5 {
            let mut network = Network::with_layers(3, output_count, &[4, 3], &mut rng).unwrap();
            network.record_fitness(0.8);
            let bound = 0.8 / output_count as f64;
            let child = network.mutate(&mut rng);
            assert_eq!(child.layer_sizes(), network.layer_sizes());
            assert_eq!(child.evaluation_count(), 0);
            assert_ne!(child.layers, network.layers);
            for layer in 0..3 {
                for (c, p) in child.weights(layer).iter().zip(network.weights(layer)) {
                    assert!((c - p).abs() <= bound + 1e-12);
                }
            }
        }
    }

    #[test]
    fn mutate_leaves_parent_untouched() {
        let mut rng = rng();
        let mut network = Network::with_layers(2, 1, &[2], &mut rng).unwrap();
        network.record_fitness(1.0);
        let before = network.clone();
        let _ = network.mutate(&mut rng);
        assert_eq!(network, before);
    }

    #[test]
    fn serde_preserves_behaviour() {
        let mut rng = rng();
        let network = Network::with_layers(2, 2, &[3], &mut rng).unwrap();
        let json = serde_json::to_string(&network).unwrap();
        let restored: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.layer_sizes(), network.layer_sizes());
        let x = [0.25, -0.75];
        let (a, b) = (restored.evaluate(&x).unwrap(), network.evaluate(&x).unwrap());
        assert!(a.iter().zip(&b).all(|(a, b)| (a - b).abs() < 1e-12));
    }

    #[test]
    fn deserialize_rejects_inconsistent_shapes() {
        let network = Network::with_layers(2, 1, &[3], &mut rng()).unwrap();
        let value = serde_json::to_value(&network).unwrap();

        let mut no_layers = value.clone();
        no_layers["layer_sizes"] = serde_json::json!([]);
        no_layers["layers"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Network>(no_layers).is_err());

        let mut wrong_sizes = value.clone();
        wrong_sizes["layer_sizes"] = serde_json::json!([2, 4, 1]);
        assert!(serde_json::from_value::<Network>(wrong_sizes).is_err());

        let mut extra_size = value.clone();
        extra_size["layer_sizes"] = serde_json::json!([2, 3, 1, 1]);
        assert!(serde_json::from_value::<Network>(extra_size).is_err());

        let mut short_weights = value.clone();
        short_weights["layers"][1]["weights"]
            .as_array_mut()
            .unwrap()
            .pop();
        assert!(serde_json::from_value::<Network>(short_weights).is_err());

        assert_eq!(serde_json::from_value::<Network>(value).unwrap(), network);
    }
}
