use std::cmp::Ordering;

use crate::config::SalesConfig;
use crate::sales::rules::{
    expected_sale_value, line_standing, team_baseline, value_per_point, RankBand, TeamBaseline,
};
use crate::sales::{LineupImpact, SalePriority, SaleRecommendation};
use crate::types::{Budget, Metric, Player, SaleGoal};

/// Scores every owned player against the sale rules. Rules run in a fixed
/// order, reasons accumulate, and priority only ever moves up, so two runs
/// over the same snapshot produce identical output.
pub fn analyze_sales(
    roster: &[Player],
    goal: SaleGoal,
    budget: Budget,
    metric: Metric,
    config: &SalesConfig,
) -> Vec<SaleRecommendation> {
    let baseline = team_baseline(roster);
    let mut recommendations: Vec<SaleRecommendation> = roster
        .iter()
        .filter(|p| p.owned)
        .filter_map(|player| evaluate_player(player, roster, goal, budget, metric, &baseline, config))
        .collect();

    recommendations.sort_by(|a, b| {
        sort_weight(a)
            .cmp(&sort_weight(b))
            .then_with(|| goal_tiebreak(goal, a, b))
    });
    recommendations
}

/// Lower is better: a high-priority, minimal-impact player is the ideal sale.
fn sort_weight(recommendation: &SaleRecommendation) -> u8 {
    (SalePriority::High.rank() - recommendation.priority.rank())
        + recommendation.lineup_impact.rank()
}

fn goal_tiebreak(goal: SaleGoal, a: &SaleRecommendation, b: &SaleRecommendation) -> Ordering {
    match goal {
        SaleGoal::BalanceBudget => b.player.market_value.cmp(&a.player.market_value),
        SaleGoal::MaximizeProfit => b.expected_value.cmp(&a.expected_value),
        SaleGoal::KeepBest => a.player.average_points.total_cmp(&b.player.average_points),
    }
}

fn evaluate_player(
    player: &Player,
    roster: &[Player],
    goal: SaleGoal,
    budget: Budget,
    metric: Metric,
    baseline: &TeamBaseline,
    config: &SalesConfig,
) -> Option<SaleRecommendation> {
    let standing = line_standing(player, roster, metric);
    let mut reasons = Vec::new();
    let mut priority = SalePriority::Low;
    let mut fired = false;

    // 1. Unavailability
    if player.status.is_sidelined() {
        reasons.push(format!("unavailable ({})", player.status));
        priority.raise_to(SalePriority::High);
        fired = true;
    }

    // 2. Positional redundancy
    let mut weakest = false;
    if let Some(standing) = standing {
        if standing.healthy > standing.required && standing.rank >= standing.required {
            reasons.push(format!(
                "redundant at {}: ranked {} of {} healthy, line needs {}",
                player.position,
                standing.rank + 1,
                standing.healthy,
                standing.required
            ));
            priority.raise_to(SalePriority::Medium);
            fired = true;
            if standing.band == RankBand::Fringe {
                weakest = true;
                reasons.push(format!("weakest option at {}", player.position));
            }
        }
    }

    // 3. Budget pressure (boundary inclusive: value == deficit/2 fires)
    if let Some(deficit) = budget.deficit() {
        if player.market_value as f64 >= deficit as f64 * config.budget_pressure_ratio {
            reasons.push(format!(
                "selling covers {:.0}% of the {deficit} deficit",
                player.market_value as f64 / deficit as f64 * 100.0
            ));
            priority.raise_to(SalePriority::High);
            fired = true;
        }
    }

    // 4. Goal-specific rule
    match goal {
        SaleGoal::BalanceBudget => {
            if let Some(cost) = value_per_point(player) {
                if baseline.value_per_point > 0.0
                    && cost > baseline.value_per_point * config.overpriced_multiplier
                {
                    reasons.push(format!(
                        "overpriced: {cost:.0} per point against a team average of {:.0}",
                        baseline.value_per_point
                    ));
                    fired = true;
                }
            }
        }
        SaleGoal::MaximizeProfit => {
            if player.value_trend > 0
                && player.value_trend as f64 >= player.market_value as f64 * config.sell_high_ratio
            {
                reasons.push(format!(
                    "value up {} since last update, sell high",
                    player.value_trend
                ));
                fired = true;
            }
        }
        SaleGoal::KeepBest => {
            if weakest {
                reasons.push("surplus to requirements at a covered position".to_string());
                fired = true;
            }
        }
    }

    // 5. Fallback performance rule, only while nothing raised the priority
    if priority == SalePriority::Low {
        if baseline.average_points > 0.0
            && player.average_points < baseline.average_points * config.performance_floor
        {
            reasons.push(format!(
                "underperforming: {:.1} average against team {:.1}",
                player.average_points, baseline.average_points
            ));
            fired = true;
        } else if player.value_trend <= -config.value_drop_alert {
            reasons.push(format!(
                "value falling ({} since last update)",
                player.value_trend
            ));
            fired = true;
        }
    }

    if !fired {
        return None;
    }

    let lineup_impact = if !player.status.is_available() {
        LineupImpact::Minimal
    } else {
        match standing.map(|s| s.band) {
            Some(RankBand::Starter) => LineupImpact::Significant,
            Some(RankBand::Rotation) => LineupImpact::Moderate,
            Some(RankBand::Fringe) | None => LineupImpact::Minimal,
        }
    };

    Some(SaleRecommendation {
        player: player.clone(),
        reasons,
        priority,
        expected_value: expected_sale_value(player, config),
        lineup_impact,
    })
}

#[cfg(test)]
mod tests {
    use crate::types::{PlayerStatus, Position};

    use super::*;

    fn config() -> SalesConfig {
        SalesConfig::default()
    }

    fn squad() -> Vec<Player> {
        vec![
            Player::new("gk1", "Keeper", Position::Goalkeeper).with_points(5.0, 150),
            Player::new("d1", "Back One", Position::Defender)
                .with_points(6.0, 180)
                .with_value(4_000_000, 0),
            Player::new("d2", "Back Two", Position::Defender)
                .with_points(5.5, 160)
                .with_value(3_500_000, 0),
            Player::new("d3", "Back Three", Position::Defender)
                .with_points(5.0, 150)
                .with_value(3_000_000, 0),
            Player::new("d4", "Back Four", Position::Defender)
                .with_points(2.0, 60)
                .with_value(1_000_000, 0),
            Player::new("m1", "Engine", Position::Midfielder)
                .with_points(7.0, 210)
                .with_value(9_000_000, 0),
            Player::new("m2", "Carrier", Position::Midfielder)
                .with_points(6.5, 200)
                .with_value(8_000_000, 0),
            Player::new("f1", "Striker", Position::Forward)
                .with_points(8.0, 240)
                .with_value(12_000_000, 0),
        ]
    }

    #[test]
    fn sidelined_player_is_high_priority_minimal_impact() {
        let mut roster = squad();
        roster[5].status = PlayerStatus::Injured;
        let recs = analyze_sales(
            &roster,
            SaleGoal::KeepBest,
            Budget::new(1_000_000),
            Metric::AveragePoints,
            &config(),
        );
        let engine = recs.iter().find(|r| r.player.id == "m1").expect("m1 flagged");
        assert_eq!(engine.priority, SalePriority::High);
        assert_eq!(engine.lineup_impact, LineupImpact::Minimal);
        assert!(engine.reasons[0].contains("unavailable"));
    }

    #[test]
    fn budget_pressure_fires_at_half_the_deficit_inclusive() {
        let mut roster = squad();
        roster[1].market_value = 300_000;
        roster[2].market_value = 250_000;
        roster[3].market_value = 249_999;
        let budget = Budget::new(-500_000);
        let recs = analyze_sales(
            &roster,
            SaleGoal::BalanceBudget,
            budget,
            Metric::AveragePoints,
            &config(),
        );

        let over = recs.iter().find(|r| r.player.id == "d1").expect("d1 flagged");
        assert_eq!(over.priority, SalePriority::High);
        let boundary = recs.iter().find(|r| r.player.id == "d2").expect("d2 flagged");
        assert_eq!(boundary.priority, SalePriority::High);
        assert!(recs
            .iter()
            .find(|r| r.player.id == "d3")
            .map(|r| r.priority != SalePriority::High)
            .unwrap_or(true));
    }

    #[test]
    fn high_priority_only_from_unavailability_or_budget_pressure() {
        let roster = squad();
        let recs = analyze_sales(
            &roster,
            SaleGoal::BalanceBudget,
            Budget::new(2_000_000),
            Metric::AveragePoints,
            &config(),
        );
        for rec in &recs {
            assert_ne!(rec.priority, SalePriority::High, "{} over-raised", rec.player.id);
        }
    }

    #[test]
    fn redundant_fringe_defender_is_flagged_weakest() {
        let roster = squad();
        let recs = analyze_sales(
            &roster,
            SaleGoal::KeepBest,
            Budget::new(0),
            Metric::AveragePoints,
            &config(),
        );
        let spare = recs.iter().find(|r| r.player.id == "d4").expect("d4 flagged");
        assert_eq!(spare.priority, SalePriority::Medium);
        assert_eq!(spare.lineup_impact, LineupImpact::Minimal);
        assert!(spare.reasons.iter().any(|r| r.contains("weakest")));
    }

    #[test]
    fn expected_value_takes_the_haircut() {
        let mut roster = squad();
        roster[7].value_trend = 2_000_000;
        let recs = analyze_sales(
            &roster,
            SaleGoal::MaximizeProfit,
            Budget::new(0),
            Metric::AveragePoints,
            &config(),
        );
        let striker = recs.iter().find(|r| r.player.id == "f1").expect("f1 flagged");
        assert_eq!(striker.expected_value, 11_400_000);
        assert!(striker.reasons.iter().any(|r| r.contains("sell high")));
    }

    #[test]
    fn analyzer_is_deterministic() {
        let mut roster = squad();
        roster[3].status = PlayerStatus::Suspended;
        let budget = Budget::new(-800_000);
        let first = analyze_sales(
            &roster,
            SaleGoal::BalanceBudget,
            budget,
            Metric::AveragePoints,
            &config(),
        );
        let second = analyze_sales(
            &roster,
            SaleGoal::BalanceBudget,
            budget,
            Metric::AveragePoints,
            &config(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn best_candidates_sort_first() {
        let mut roster = squad();
        roster[4].status = PlayerStatus::Injured;
        let recs = analyze_sales(
            &roster,
            SaleGoal::KeepBest,
            Budget::new(0),
            Metric::AveragePoints,
            &config(),
        );
        assert!(!recs.is_empty());
        assert_eq!(recs[0].player.id, "d4");
        assert_eq!(recs[0].priority, SalePriority::High);
        for pair in recs.windows(2) {
            assert!(sort_weight(&pair[0]) <= sort_weight(&pair[1]));
        }
    }
}
