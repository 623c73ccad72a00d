use crate::census::History;
use crate::config::Config;
use crate::environment::Environment;
use crate::error::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Simulation engine.
///
/// Holds the configuration and a populated environment, and runs the
/// simulation the configuration describes.
pub struct Engine {
    cfg: Config,
    env: Environment<ChaCha12Rng>,
}

impl Engine {
    /// Create a new `Engine` with the given configuration and a random initial state.
    ///
    /// The generator is seeded from `cfg.seed` when present.
    pub fn generate_initial_condition(cfg: Config) -> Result<Self> {
        cfg.validate()?;

        let rng = match cfg.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_rng(&mut rand::rng()),
        };

        let mut env = Environment::new(cfg.model.size, cfg.model.p, cfg.model.q, rng)?;
        env.populate_all(cfg.init.n_sus, cfg.init.n_inf, cfg.init.n_recov)?;

        Ok(Self { cfg, env })
    }

    pub fn cfg(&self) -> &Config {
        &self.cfg
    }

    pub fn env(&self) -> &Environment<ChaCha12Rng> {
        &self.env
    }

    /// Perform the simulation and return the census of every step.
    pub fn perform_simulation(&mut self) -> Result<History> {
        log::info!(
            "simulating {} agents on a {1}x{1} grid for {2} timesteps",
            self.env.n_agents(),
            self.cfg.model.size,
            self.cfg.output.timesteps
        );
        self.env.run_simulation(self.cfg.output.timesteps)
    }
}
