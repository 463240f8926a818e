use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::lineup::optimizer::optimize_lineup;
use crate::lineup::LineupResult;
use crate::sales::analyzer::analyze_sales;
use crate::sales::SaleRecommendation;
use crate::transfers::recommender::recommend_transfers;
use crate::transfers::replacements::find_replacements;
use crate::transfers::{ReplacementSuggestion, TransferRecommendation};
use crate::types::{Budget, LeagueSnapshot, Metric, SaleGoal};

/// A sale recommendation paired with its ranked market substitutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleAdvice {
    #[serde(flatten)]
    pub recommendation: SaleRecommendation,
    pub replacements: Vec<ReplacementSuggestion>,
}

/// Everything the presenter needs for one snapshot, self-describing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadReport {
    pub league_id: String,
    pub generated_at: DateTime<Utc>,
    pub budget: Budget,
    pub lineup: LineupResult,
    pub sales: Vec<SaleAdvice>,
    pub transfers: Vec<TransferRecommendation>,
}

pub fn sales_advice(
    snapshot: &LeagueSnapshot,
    metric: Metric,
    goal: SaleGoal,
    config: &Config,
) -> Vec<SaleAdvice> {
    analyze_sales(&snapshot.roster, goal, snapshot.budget, metric, &config.sales)
        .into_iter()
        .map(|recommendation| {
            let replacements = find_replacements(
                &recommendation.player,
                recommendation.expected_value,
                &snapshot.market,
                &snapshot.roster,
                snapshot.budget,
                metric,
                &config.replacements,
            )
            .into_iter()
            .take(config.replacements.max_suggestions)
            .collect();
            SaleAdvice {
                recommendation,
                replacements,
            }
        })
        .collect()
}

pub fn build_report(
    snapshot: &LeagueSnapshot,
    metric: Metric,
    goal: SaleGoal,
    config: &Config,
) -> SquadReport {
    SquadReport {
        league_id: snapshot.league_id.clone(),
        generated_at: Utc::now(),
        budget: snapshot.budget,
        lineup: optimize_lineup(&snapshot.roster, metric),
        sales: sales_advice(snapshot, metric, goal, config),
        transfers: recommend_transfers(
            &snapshot.market,
            &snapshot.roster,
            snapshot.budget,
            &config.transfers,
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::types::{MarketListing, Player, PlayerStatus, Position};

    use super::*;

    fn snapshot() -> LeagueSnapshot {
        let mut roster = vec![Player::new("gk1", "Keeper", Position::Goalkeeper)
            .with_points(5.0, 150)];
        for i in 0..4 {
            roster.push(
                Player::new(format!("d{i}"), "Back", Position::Defender)
                    .with_points(5.0 - i as f64, 120)
                    .with_value(2_000_000, 0),
            );
        }
        for i in 0..3 {
            roster.push(
                Player::new(format!("m{i}"), "Mid", Position::Midfielder)
                    .with_points(6.0, 180)
                    .with_value(4_000_000, 0),
            );
        }
        roster.push(
            Player::new("f1", "Striker", Position::Forward)
                .with_points(7.0, 210)
                .with_status(PlayerStatus::Injured)
                .with_value(8_000_000, 0),
        );

        let market = vec![
            MarketListing::new(
                Player::new("x1", "New Nine", Position::Forward)
                    .with_points(6.5, 190)
                    .with_owned(false),
                5_000_000,
            ),
            MarketListing::new(
                Player::new("x2", "Spare Back", Position::Defender)
                    .with_points(4.5, 130)
                    .with_owned(false),
                1_500_000,
            ),
        ];

        LeagueSnapshot {
            league_id: "league-1".to_string(),
            fetched_at: Utc::now(),
            budget: Budget::new(1_000_000),
            roster,
            market,
            teams: BTreeMap::new(),
        }
    }

    #[test]
    fn report_carries_all_three_outputs() {
        let config = Config::default();
        let report = build_report(
            &snapshot(),
            Metric::AveragePoints,
            SaleGoal::KeepBest,
            &config,
        );
        assert_eq!(report.league_id, "league-1");
        assert!(report.lineup.starter_count() > 0);
        assert!(!report.transfers.is_empty());
        // The injured striker must be a sale candidate with same-position
        // replacements attached.
        let striker = report
            .sales
            .iter()
            .find(|s| s.recommendation.player.id == "f1")
            .expect("striker flagged");
        assert!(!striker.replacements.is_empty());
        for suggestion in &striker.replacements {
            assert_eq!(suggestion.listing.player.position, Position::Forward);
        }
    }

    #[test]
    fn replacements_skip_roster_players_relisted_on_the_market() {
        let mut fixture = snapshot();
        // Our own striker also appears as a market listing; decoded listings
        // always carry owned = false.
        fixture.roster.push(
            Player::new("f2", "Second Nine", Position::Forward)
                .with_points(6.0, 170)
                .with_value(5_000_000, 0),
        );
        fixture.market.push(MarketListing::new(
            Player::new("f2", "Second Nine", Position::Forward)
                .with_points(6.0, 170)
                .with_owned(false),
            4_500_000,
        ));

        let config = Config::default();
        let report = build_report(
            &fixture,
            Metric::AveragePoints,
            SaleGoal::KeepBest,
            &config,
        );
        for advice in &report.sales {
            for suggestion in &advice.replacements {
                assert_ne!(suggestion.listing.player.id, "f2");
            }
        }
    }

    #[test]
    fn empty_snapshot_produces_an_empty_report() {
        let empty = LeagueSnapshot {
            league_id: "empty".to_string(),
            fetched_at: Utc::now(),
            budget: Budget::new(0),
            roster: Vec::new(),
            market: Vec::new(),
            teams: BTreeMap::new(),
        };
        let config = Config::default();
        let report = build_report(&empty, Metric::TotalPoints, SaleGoal::BalanceBudget, &config);
        assert!(report.sales.is_empty());
        assert!(report.transfers.is_empty());
        assert!(!report.lineup.complete);
    }
}
