use evolution::{ConfigError, PopulationConfig};
use evolution_nn::TopologyConfig;

use serde::{Deserialize, Serialize};

use std::error::Error;
use std::fs;
use std::path::Path;

/// Everything needed to set up a training run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub population: PopulationConfig,
    /// Widths of the hidden layers. The input and output widths
    /// follow from the population's column sets.
    pub hidden_layers: Vec<usize>,
}

impl Settings {
    /// Reads settings from a RON file. Missing fields
    /// take their default values.
    pub fn from_file(path: &Path) -> Result<Settings, Box<dyn Error>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("could not read {}: {}", path.display(), e))?;
        Ok(ron::from_str(&text)?)
    }

    /// Returns the network topology implied by these settings.
    pub fn topology(&self) -> Result<TopologyConfig, ConfigError> {
        TopologyConfig::new(
            self.population.input_columns.len(),
            self.population.output_columns.len(),
            &self.hidden_layers,
        )
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            population: PopulationConfig::default(),
            hidden_layers: vec![12, 8],
        }
    }
}
