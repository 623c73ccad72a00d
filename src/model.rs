use rand::Rng;
use serde::{Deserialize, Serialize};

/// Grid coordinates `(x, y)`.
pub type Location = (usize, usize);

/// Epidemic state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Susceptible,
    Infected,
    Recovered,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Susceptible, Status::Infected, Status::Recovered];

    pub fn index(self) -> usize {
        match self {
            Status::Susceptible => 0,
            Status::Infected => 1,
            Status::Recovered => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Stay,
    Up,
    Down,
    Right,
    Left,
}

const STEPS: [Step; 5] = [Step::Stay, Step::Up, Step::Down, Step::Right, Step::Left];

/// Agent of the simulation.
///
/// Each agent has a status, a location on the grid and a flag marking that it
/// was infected during the current step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    status: Status,
    location: Location,
    recently_infected: bool,
}

impl Agent {
    pub fn new(status: Status, location: Location) -> Self {
        Self {
            status,
            location,
            recently_infected: false,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn recently_infected(&self) -> bool {
        self.recently_infected
    }

    /// Move the agent one step inside a `boundary x boundary` grid.
    ///
    /// Draws uniformly among staying and the four axis moves. A move that
    /// would leave `[0, boundary)` is discarded and all five options are
    /// drawn again, so staying is more likely at edges and corners.
    pub fn move_within<R: Rng>(&mut self, boundary: usize, rng: &mut R) -> Location {
        self.location = self.next_location(boundary, rng);
        self.location
    }

    /// Draw the location [`Agent::move_within`] would move to, without moving.
    pub fn next_location<R: Rng>(&self, boundary: usize, rng: &mut R) -> Location {
        let (x, y) = self.location;
        loop {
            let next = match STEPS[rng.random_range(0..STEPS.len())] {
                Step::Stay => Some((x, y)),
                Step::Up => (y + 1 < boundary).then(|| (x, y + 1)),
                Step::Down => y.checked_sub(1).map(|y| (x, y)),
                Step::Right => (x + 1 < boundary).then(|| (x + 1, y)),
                Step::Left => x.checked_sub(1).map(|x| (x, y)),
            };
            if let Some(location) = next {
                return location;
            }
        }
    }

    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub(crate) fn infect(&mut self) {
        self.status = Status::Infected;
        self.recently_infected = true;
    }

    pub(crate) fn recover(&mut self) {
        self.status = Status::Recovered;
    }

    pub(crate) fn clear_recent_infection(&mut self) {
        self.recently_infected = false;
    }
}
