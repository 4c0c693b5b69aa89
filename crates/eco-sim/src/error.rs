use std::path::PathBuf;

use eco_agent::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario yaml")]
    Parse(#[from] serde_yaml::Error),

    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("species `{0}` is listed twice")]
    DuplicateSpecies(String),

    #[error("water point ({x}, {z}) lies outside the world")]
    WaterOutOfBounds { x: f32, z: f32 },

    #[error("food `max` ({max}) is below `initial` ({initial})")]
    FoodCapacity { initial: usize, max: usize },

    #[error("invalid configuration for species `{species}`")]
    Species {
        species: String,
        #[source]
        source: ConfigError,
    },
}
