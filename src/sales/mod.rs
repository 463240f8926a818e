pub mod analyzer;
pub mod rules;

use serde::{Deserialize, Serialize};

use crate::types::Player;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SalePriority {
    Low,
    Medium,
    High,
}

impl SalePriority {
    /// Explicit ordinal so priority comparisons never rely on string order.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Monotone raise: a fired rule can never lower an earlier one.
    pub fn raise_to(&mut self, other: SalePriority) {
        if other.rank() > self.rank() {
            *self = other;
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineupImpact {
    Minimal,
    Moderate,
    Significant,
}

impl LineupImpact {
    pub fn rank(self) -> u8 {
        match self {
            Self::Minimal => 0,
            Self::Moderate => 1,
            Self::Significant => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleRecommendation {
    pub player: Player,
    pub reasons: Vec<String>,
    pub priority: SalePriority,
    pub expected_value: i64,
    pub lineup_impact: LineupImpact,
}
