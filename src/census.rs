use crate::model::Status;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    ops::{AddAssign, Index},
};

/// Number of agents in each status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    counts: [usize; 3],
}

/// Census of every recorded step, keyed by step index.
pub type History = BTreeMap<usize, Census>;

impl Census {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, status: Status) {
        self.counts[status.index()] += 1;
    }

    pub fn get(&self, status: Status) -> usize {
        self.counts[status.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl Index<Status> for Census {
    type Output = usize;

    fn index(&self, status: Status) -> &usize {
        &self.counts[status.index()]
    }
}

impl AddAssign for Census {
    fn add_assign(&mut self, other: Self) {
        for (count, other_count) in self.counts.iter_mut().zip(other.counts) {
            *count += other_count;
        }
    }
}

impl FromIterator<Status> for Census {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        let mut census = Census::new();
        for status in iter {
            census.add(status);
        }
        census
    }
}
