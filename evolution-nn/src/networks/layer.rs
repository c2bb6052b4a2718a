use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fully-connected weights between two consecutive layers.
///
/// Weights are stored row-major by destination node in a single
/// buffer. Each row holds one weight per source node, followed by
/// the destination node's bias weight.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub(super) struct Layer {
    input_count: usize,
    output_count: usize,
    weights: Box<[f64]>,
}

impl Layer {
    /// Returns a layer with every weight drawn
    /// uniformly from [-1, 1].
    pub(super) fn random<R: Rng>(input_count: usize, output_count: usize, rng: &mut R) -> Layer {
        Layer {
            input_count,
            output_count,
            weights: (0..output_count * (input_count + 1))
                .map(|_| rng.gen_range(-1.0f64..=1.0))
                .collect(),
        }
    }

    /// Returns a copy of the layer with every weight shifted
    /// by a value drawn uniformly from [-scale, scale].
    pub(super) fn perturbed<R: Rng>(&self, scale: f64, rng: &mut R) -> Layer {
        Layer {
            input_count: self.input_count,
            output_count: self.output_count,
            weights: self
                .weights
                .iter()
                .map(|w| w + rng.gen_range(-1.0f64..=1.0) * scale)
                .collect(),
        }
    }

    /// Computes the layer's activations from the previous
    /// layer's, replacing the contents of `outputs`.
    pub(super) fn propagate(&self, inputs: &[f64], outputs: &mut Vec<f64>) {
        debug_assert_eq!(inputs.len(), self.input_count);
        outputs.clear();
        outputs.extend(self.weights.chunks_exact(self.input_count + 1).map(|row| {
            let (weights, bias) = row.split_at(self.input_count);
            let sum: f64 = weights.iter().zip(inputs).map(|(w, x)| w * x).sum();
            (sum + bias[0]).tanh()
        }));
    }

    /// Returns the weights into `node`, bias last.
    pub(super) fn row(&self, node: usize) -> &[f64] {
        let stride = self.input_count + 1;
        &self.weights[node * stride..(node + 1) * stride]
    }

    /// Returns whether the layer connects `input_count` nodes
    /// to `output_count` nodes with a full weight buffer.
    pub(super) fn has_shape(&self, input_count: usize, output_count: usize) -> bool {
        self.input_count == input_count
            && self.output_count == output_count
            && self.weights.len() == output_count * (input_count + 1)
    }

    pub(super) fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub(super) fn output_count(&self) -> usize {
        self.output_count
    }
}
