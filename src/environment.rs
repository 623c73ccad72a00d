use crate::census::{Census, History};
use crate::config::check_num;
use crate::error::{Result, SimError};
use crate::model::{Agent, Location, Status};
use rand::Rng;
use rand_distr::{Bernoulli, Distribution, Uniform};

/// Largest supported grid side length.
pub const MAX_SIZE: usize = 10_000;

/// Square grid of cells holding the agents of the simulation.
///
/// Owns the infection probability `p`, the recovery probability `q` and the
/// random number generator, and advances the whole population one step at a
/// time.
pub struct Environment<R> {
    size: usize,
    p: f64,
    q: f64,
    grid: Vec<Vec<Agent>>,
    rng: R,
}

impl<R: Rng> Environment<R> {
    /// Create an empty `size x size` environment.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidConfig`] if `size` is not in `1..=MAX_SIZE`
    /// or if `p` or `q` are not probabilities.
    pub fn new(size: usize, p: f64, q: f64, rng: R) -> Result<Self> {
        check_num(size, 1..=MAX_SIZE, "grid size").map_err(SimError::InvalidConfig)?;
        check_num(p, 0.0..=1.0, "infection probability").map_err(SimError::InvalidConfig)?;
        check_num(q, 0.0..=1.0, "recovery probability").map_err(SimError::InvalidConfig)?;

        Ok(Self {
            size,
            p,
            q,
            grid: empty_grid(size),
            rng,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    /// Iterate over every agent, cell by cell.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.grid.iter().flatten()
    }

    pub fn n_agents(&self) -> usize {
        self.grid.iter().map(Vec::len).sum()
    }

    /// Agents currently in the cell at `location`.
    pub fn cell(&self, location: Location) -> Result<&[Agent]> {
        let i_cell = cell_index(self.size, location)?;
        Ok(&self.grid[i_cell])
    }

    /// Place an agent in the cell given by its location.
    pub fn insert(&mut self, agent: Agent) -> Result<()> {
        let i_cell = cell_index(self.size, agent.location())?;
        self.grid[i_cell].push(agent);
        Ok(())
    }

    /// Clear the grid and scatter the initial population.
    ///
    /// Agents of each status are placed at independent uniformly random
    /// cells, so several agents may share a cell.
    pub fn populate_all(&mut self, n_sus: usize, n_inf: usize, n_recov: usize) -> Result<()> {
        self.grid = empty_grid(self.size);

        self.populate(n_sus, Status::Susceptible)?;
        self.populate(n_inf, Status::Infected)?;
        self.populate(n_recov, Status::Recovered)?;

        log::debug!(
            "populated {0}x{0} grid with {n_sus} S, {n_inf} I and {n_recov} R agents",
            self.size
        );
        Ok(())
    }

    /// Scatter `n` agents with the given status at random cells.
    pub fn populate(&mut self, n: usize, status: Status) -> Result<()> {
        let coord_dist =
            Uniform::new(0, self.size).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        for _ in 0..n {
            let x = coord_dist.sample(&mut self.rng);
            let y = coord_dist.sample(&mut self.rng);
            self.insert(Agent::new(status, (x, y)))?;
        }
        Ok(())
    }

    /// Run the simulation and collect the census of every step.
    ///
    /// Entry `0` is the census before any step is performed, and entries
    /// `1..timesteps` are the census after each of the `timesteps - 1` steps.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidArgument`] if `timesteps` is zero.
    pub fn run_simulation(&mut self, timesteps: usize) -> Result<History> {
        check_num(timesteps, 1.., "number of timesteps").map_err(SimError::InvalidArgument)?;

        let mut history = History::new();
        history.insert(0, self.population_status());

        let steps_per_report = (timesteps / 10).max(1);
        for i_step in 1..timesteps {
            let census = self.one_step()?;
            history.insert(i_step, census);

            if i_step % steps_per_report == 0 || i_step == timesteps - 1 {
                let progress = 100.0 * (i_step + 1) as f64 / timesteps as f64;
                log::info!("completed {progress:06.2}%");
            }
        }

        Ok(history)
    }

    /// Perform a single step: move, transmit, recover and count.
    pub fn one_step(&mut self) -> Result<Census> {
        self.move_agents()?;
        self.check_transmissions(self.p)?;
        self.check_recoveries(self.q)?;

        let census = self.population_status();
        log::debug!("{census:?}");
        Ok(census)
    }

    /// Move every agent and rebuild the grid from the new locations.
    ///
    /// All destinations are drawn and checked before the grid is touched.
    pub fn move_agents(&mut self) -> Result<()> {
        let size = self.size;
        let mut moves = Vec::with_capacity(self.n_agents());
        for agt in self.grid.iter().flatten() {
            let location = agt.next_location(size, &mut self.rng);
            moves.push((location, cell_index(size, location)?));
        }

        let mut next_grid = empty_grid(size);
        let agents = self.grid.iter_mut().flat_map(|cell| cell.drain(..));
        for (mut agt, (location, i_cell)) in agents.zip(moves) {
            agt.set_location(location);
            next_grid[i_cell].push(agt);
        }
        self.grid = next_grid;
        Ok(())
    }

    /// Infect each susceptible agent sharing a cell with an infected agent
    /// with probability `p`.
    pub fn check_transmissions(&mut self, p: f64) -> Result<()> {
        let inf_dist = Bernoulli::new(p).map_err(|_| {
            SimError::InvalidArgument(format!("infection probability must be in [0, 1], but is {p}"))
        })?;

        for cell in &mut self.grid {
            if count(cell)[Status::Infected] == 0 {
                continue;
            }
            // Agents infected in this pass are no longer susceptible.
            for agt in cell
                .iter_mut()
                .filter(|agt| agt.status() == Status::Susceptible)
            {
                if inf_dist.sample(&mut self.rng) {
                    agt.infect();
                    log::trace!("agent at {:?} infected", agt.location());
                }
            }
        }
        Ok(())
    }

    /// Recover each infected agent with probability `q`.
    ///
    /// Agents infected during the current step skip the draw and become
    /// eligible from the next step on.
    pub fn check_recoveries(&mut self, q: f64) -> Result<()> {
        let rec_dist = Bernoulli::new(q).map_err(|_| {
            SimError::InvalidArgument(format!("recovery probability must be in [0, 1], but is {q}"))
        })?;

        for agt in self
            .grid
            .iter_mut()
            .flatten()
            .filter(|agt| agt.status() == Status::Infected)
        {
            if agt.recently_infected() {
                agt.clear_recent_infection();
            } else if rec_dist.sample(&mut self.rng) {
                agt.recover();
                log::trace!("agent at {:?} recovered", agt.location());
            }
        }
        Ok(())
    }

    /// Census of the cell at `location`.
    pub fn cell_status(&self, location: Location) -> Result<Census> {
        Ok(count(self.cell(location)?))
    }

    /// Census of the whole population.
    pub fn population_status(&self) -> Census {
        let mut census = Census::new();
        for cell in &self.grid {
            census += count(cell);
        }
        census
    }
}

fn empty_grid(size: usize) -> Vec<Vec<Agent>> {
    let mut grid = Vec::new();
    grid.resize_with(size * size, Vec::new);
    grid
}

fn cell_index(size: usize, location: Location) -> Result<usize> {
    let (x, y) = location;
    if x >= size || y >= size {
        return Err(SimError::InvalidLocation { location, size });
    }
    Ok(x * size + y)
}

fn count(cell: &[Agent]) -> Census {
    cell.iter().map(Agent::status).collect()
}
