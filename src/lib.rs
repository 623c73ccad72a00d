//! Stochastic agent-based SIR epidemic model on a bounded square grid.
//!
//! Agents move randomly between neighbouring cells, infect susceptible agents
//! sharing their cell and recover with fixed probabilities.

mod census;
mod config;
mod engine;
mod environment;
mod error;
mod model;

pub use census::{Census, History};
pub use config::{Config, InitConfig, ModelConfig, OutputConfig};
pub use engine::Engine;
pub use environment::{Environment, MAX_SIZE};
pub use error::{Result, SimError};
pub use model::{Agent, Location, Status};
