use evolution::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Layer widths of a feed-forward network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Number of inputs of the network.
    pub input_count: NonZeroUsize,
    /// Number of outputs of the network.
    pub output_count: NonZeroUsize,
    /// Widths of the hidden layers, from the
    /// input side to the output side.
    pub hidden_layers: Vec<NonZeroUsize>,
}

impl TopologyConfig {
    /// Checks and collects the widths of a network.
    ///
    /// # Errors
    /// Returns an error naming the first layer with zero
    /// width, where layer 0 is the input layer.
    ///
    /// # Examples
    /// ```
    /// use evolution::ConfigError;
    /// use evolution_nn::TopologyConfig;
    ///
    /// let config = TopologyConfig::new(9, 2, &[12, 8]).unwrap();
    /// assert_eq!(config.layer_sizes(), vec![9, 12, 8, 2]);
    ///
    /// assert_eq!(
    ///     TopologyConfig::new(9, 2, &[12, 0]),
    ///     Err(ConfigError::InvalidWidth { layer: 2 })
    /// );
    /// ```
    pub fn new(
        input_count: usize,
        output_count: usize,
        hidden_layers: &[usize],
    ) -> Result<TopologyConfig, ConfigError> {
        let checked = |layer: usize, width: usize| {
            NonZeroUsize::new(width).ok_or(ConfigError::InvalidWidth { layer })
        };
        Ok(TopologyConfig {
            input_count: checked(0, input_count)?,
            hidden_layers: hidden_layers
                .iter()
                .enumerate()
                .map(|(i, w)| checked(i + 1, *w))
                .collect::<Result<_, _>>()?,
            output_count: checked(hidden_layers.len() + 1, output_count)?,
        })
    }

    /// Returns the width of every layer, input first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_count)
            .chain(self.hidden_layers.iter().copied())
            .chain(std::iter::once(self.output_count))
            .map(NonZeroUsize::get)
            .collect()
    }
}
