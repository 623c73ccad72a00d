use crate::model::Location;
use thiserror::Error;

/// Errors raised by the simulation.
///
/// Every error is terminal for the call that produced it and is raised before
/// any state is mutated.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("location {location:?} is outside the {size}x{size} grid")]
    InvalidLocation { location: Location, size: usize },

    #[error("failed to deserialize config")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
