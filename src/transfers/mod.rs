pub mod recommender;
pub mod replacements;
pub mod signals;

use serde::{Deserialize, Serialize};

use crate::types::MarketListing;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransferPriority {
    Essential,
    Recommended,
    Optional,
}

impl TransferPriority {
    pub fn rank(self) -> u8 {
        match self {
            Self::Essential => 0,
            Self::Recommended => 1,
            Self::Optional => 2,
        }
    }
}

/// One scoring driver, carrying its 0-10 impact so the presenter can rank
/// the reasons without recomputing anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferReason {
    pub message: String,
    pub impact: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecommendation {
    pub listing: MarketListing,
    pub score: f64,
    pub reasons: Vec<TransferReason>,
    pub risk: RiskLevel,
    pub priority: TransferPriority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementSuggestion {
    pub listing: MarketListing,
    pub performance_gain: f64,
    pub budget_savings: i64,
    pub improvement: f64,
}
