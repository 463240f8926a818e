pub mod optimizer;

use serde::{Deserialize, Serialize};

use crate::types::Player;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl Formation {
    pub const fn new(defenders: usize, midfielders: usize, forwards: usize) -> Self {
        Self {
            defenders,
            midfielders,
            forwards,
        }
    }

    /// Starting slots including the implicit goalkeeper.
    pub fn slots(&self) -> usize {
        1 + self.defenders + self.midfielders + self.forwards
    }

    pub fn label(&self) -> String {
        format!("{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}

/// Catalogue order doubles as the tie-break: when two templates score the
/// same, the earlier entry wins.
pub const FORMATION_CATALOGUE: [Formation; 10] = [
    Formation::new(4, 4, 2),
    Formation::new(4, 3, 3),
    Formation::new(3, 4, 3),
    Formation::new(5, 3, 2),
    Formation::new(3, 5, 2),
    Formation::new(5, 4, 1),
    Formation::new(4, 5, 1),
    Formation::new(3, 6, 1),
    Formation::new(5, 2, 3),
    Formation::new(4, 2, 4),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupResult {
    pub goalkeeper: Option<Player>,
    pub defenders: Vec<Player>,
    pub midfielders: Vec<Player>,
    pub forwards: Vec<Player>,
    pub formation: Formation,
    pub reserves: Vec<Player>,
    pub total_score: f64,
    pub average_score: f64,
    pub complete: bool,
    pub missing_goalkeeper: bool,
}

impl LineupResult {
    pub fn starters(&self) -> Vec<&Player> {
        self.goalkeeper
            .iter()
            .chain(self.defenders.iter())
            .chain(self.midfielders.iter())
            .chain(self.forwards.iter())
            .collect()
    }

    pub fn starter_count(&self) -> usize {
        usize::from(self.goalkeeper.is_some())
            + self.defenders.len()
            + self.midfielders.len()
            + self.forwards.len()
    }
}
