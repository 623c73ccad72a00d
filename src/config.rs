use crate::environment::MAX_SIZE;
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, ops::RangeBounds};

/// Simulation configuration parameters.
///
/// Parsed from TOML text and validated before use.
/// See [`Config::from_toml_str`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub init: InitConfig,
    pub output: OutputConfig,

    /// Seed of the random number generator (random if absent).
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Side length of the grid.
    pub size: usize,
    /// Infection probability.
    pub p: f64,
    /// Recovery probability.
    pub q: f64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    /// Initial number of susceptible agents.
    pub n_sus: usize,
    /// Initial number of infected agents.
    pub n_inf: usize,
    /// Initial number of recovered agents.
    pub n_recov: usize,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Number of recorded census entries (including the initial one).
    pub timesteps: usize,
}

impl Config {
    /// Parse a [`Config`] from TOML text.
    ///
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns [`SimError::Parse`] if the text cannot be deserialized and
    /// [`SimError::InvalidConfig`] if the configuration values are invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_num(self.model.size, 1..=MAX_SIZE, "grid size").map_err(SimError::InvalidConfig)?;
        check_num(self.model.p, 0.0..=1.0, "infection probability")
            .map_err(SimError::InvalidConfig)?;
        check_num(self.model.q, 0.0..=1.0, "recovery probability")
            .map_err(SimError::InvalidConfig)?;

        let max_n_agt = 10_000_000;
        check_num(self.init.n_sus, 0..=max_n_agt, "initial number of susceptible agents")
            .map_err(SimError::InvalidConfig)?;
        check_num(self.init.n_inf, 0..=max_n_agt, "initial number of infected agents")
            .map_err(SimError::InvalidConfig)?;
        check_num(self.init.n_recov, 0..=max_n_agt, "initial number of recovered agents")
            .map_err(SimError::InvalidConfig)?;

        check_num(self.output.timesteps, 1..=10_000_000, "number of timesteps")
            .map_err(SimError::InvalidConfig)?;

        Ok(())
    }
}

pub(crate) fn check_num<T, R>(num: T, range: R, name: &str) -> std::result::Result<(), String>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        return Err(format!(
            "invalid {name}: number must be in the range {range:?}, but is {num:?}"
        ));
    }
    Ok(())
}
