use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Unknown,
}

impl Position {
    /// The four lineup lines; `Unknown` is excluded from line-based math.
    pub const LINES: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "gk",
            Self::Defender => "def",
            Self::Midfielder => "mid",
            Self::Forward => "fwd",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Goalkeeper => "GK",
            Self::Defender => "DEF",
            Self::Midfielder => "MID",
            Self::Forward => "FWD",
            Self::Unknown => "?",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown position: {0}")]
pub struct PositionParseError(pub String);

impl FromStr for Position {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "gk" | "goalkeeper" | "keeper" | "por" | "portero" | "1" => Ok(Self::Goalkeeper),
            "def" | "defender" | "defence" | "defense" | "df" | "d" | "2" => Ok(Self::Defender),
            "mid" | "midfielder" | "midfield" | "mf" | "m" | "3" => Ok(Self::Midfielder),
            "fwd" | "forward" | "striker" | "st" | "del" | "f" | "4" => Ok(Self::Forward),
            _ => Err(PositionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Available,
    Injured,
    Doubtful,
    Suspended,
    BuildingFitness,
}

impl PlayerStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// True for statuses that trigger the unavailability sale rule; a
    /// doubtful player is lineup-excluded but not a forced sale candidate.
    pub fn is_sidelined(&self) -> bool {
        matches!(self, Self::Injured | Self::Suspended | Self::BuildingFitness)
    }
}

impl Display for PlayerStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Available => "available",
            Self::Injured => "injured",
            Self::Doubtful => "doubtful",
            Self::Suspended => "suspended",
            Self::BuildingFitness => "building fitness",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown player status: {0}")]
pub struct StatusParseError(pub String);

impl FromStr for PlayerStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "available" | "ok" | "fit" | "active" => Ok(Self::Available),
            "injured" | "injury" | "out" => Ok(Self::Injured),
            "doubtful" | "questionable" | "doubt" => Ok(Self::Doubtful),
            "suspended" | "banned" | "ban" | "sanctioned" => Ok(Self::Suspended),
            "building_fitness" | "buildingfitness" | "returning" | "recovering" => {
                Ok(Self::BuildingFitness)
            }
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AveragePoints,
    TotalPoints,
}

impl Metric {
    pub fn value_of(&self, player: &Player) -> f64 {
        match self {
            Self::AveragePoints => player.average_points,
            Self::TotalPoints => f64::from(player.total_points),
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::AveragePoints => "average_points",
            Self::TotalPoints => "total_points",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown metric: {0}")]
pub struct MetricParseError(pub String);

impl FromStr for Metric {
    type Err = MetricParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "average_points" | "average" | "avg" => Ok(Self::AveragePoints),
            "total_points" | "total" | "points" => Ok(Self::TotalPoints),
            _ => Err(MetricParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SaleGoal {
    BalanceBudget,
    MaximizeProfit,
    KeepBest,
}

impl Display for SaleGoal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::BalanceBudget => "balance_budget",
            Self::MaximizeProfit => "maximize_profit",
            Self::KeepBest => "keep_best",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown sale goal: {0}")]
pub struct GoalParseError(pub String);

impl FromStr for SaleGoal {
    type Err = GoalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "balance_budget" | "balance" | "budget" => Ok(Self::BalanceBudget),
            "maximize_profit" | "profit" => Ok(Self::MaximizeProfit),
            "keep_best" | "best" => Ok(Self::KeepBest),
            _ => Err(GoalParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub average_points: f64,
    pub total_points: i32,
    pub market_value: i64,
    pub value_trend: i64,
    pub status: PlayerStatus,
    pub owned: bool,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            average_points: 0.0,
            total_points: 0,
            market_value: 0,
            value_trend: 0,
            status: PlayerStatus::Available,
            owned: true,
        }
    }

    pub fn with_points(mut self, average: f64, total: i32) -> Self {
        self.average_points = average;
        self.total_points = total;
        self
    }

    pub fn with_value(mut self, market_value: i64, trend: i64) -> Self {
        self.market_value = market_value;
        self.value_trend = trend;
        self
    }

    pub fn with_status(mut self, status: PlayerStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_owned(mut self, owned: bool) -> Self {
        self.owned = owned;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketListing {
    pub player: Player,
    pub asking_price: i64,
    pub expiry: DateTime<Utc>,
    pub offer_count: u32,
    pub seller_id: Option<String>,
}

impl MarketListing {
    pub fn new(player: Player, asking_price: i64) -> Self {
        Self {
            player,
            asking_price,
            expiry: Utc::now(),
            offer_count: 0,
            seller_id: None,
        }
    }

    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn with_offers(mut self, offer_count: u32) -> Self {
        self.offer_count = offer_count;
        self
    }

    pub fn with_seller(mut self, seller_id: impl Into<String>) -> Self {
        self.seller_id = Some(seller_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Budget {
    pub current: i64,
}

impl Budget {
    pub fn new(current: i64) -> Self {
        Self { current }
    }

    /// Absolute deficit when the budget is in the red.
    pub fn deficit(&self) -> Option<i64> {
        if self.current < 0 {
            Some(-self.current)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub league_id: String,
    pub fetched_at: DateTime<Utc>,
    pub budget: Budget,
    pub roster: Vec<Player>,
    pub market: Vec<MarketListing>,
    #[serde(default)]
    pub teams: BTreeMap<String, String>,
}

impl LeagueSnapshot {
    /// Hash of the analysis-relevant content. `fetched_at` is excluded so a
    /// re-fetch of identical data keeps the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_string(&(&self.budget, &self.roster, &self.market))
            .unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parses_position_synonyms() {
        assert_eq!(Position::from_str("GK").expect("gk"), Position::Goalkeeper);
        assert_eq!(
            Position::from_str("Striker").expect("striker"),
            Position::Forward
        );
        assert_eq!(Position::from_str("2").expect("code 2"), Position::Defender);
        assert!(Position::from_str("libero").is_err());
    }

    #[test]
    fn sidelined_excludes_doubtful() {
        assert!(PlayerStatus::Injured.is_sidelined());
        assert!(PlayerStatus::BuildingFitness.is_sidelined());
        assert!(!PlayerStatus::Doubtful.is_sidelined());
        assert!(!PlayerStatus::Doubtful.is_available());
    }

    #[test]
    fn fingerprint_tracks_content_not_capture_time() {
        let player = Player::new("p1", "One", Position::Defender).with_value(1_000_000, 0);
        let mut snapshot = LeagueSnapshot {
            league_id: "league-1".to_string(),
            fetched_at: Utc::now(),
            budget: Budget::new(500_000),
            roster: vec![player],
            market: Vec::new(),
            teams: BTreeMap::new(),
        };
        let first = snapshot.fingerprint();
        snapshot.fetched_at = Utc::now();
        assert_eq!(first, snapshot.fingerprint());
        snapshot.budget = Budget::new(-500_000);
        assert_ne!(first, snapshot.fingerprint());
    }
}
