use crate::config::TransfersConfig;
use crate::transfers::signals::{compute_signals, market_scale, ListingSignals, MarketScale};
use crate::transfers::{RiskLevel, TransferPriority, TransferReason, TransferRecommendation};
use crate::types::{Budget, MarketListing, Player};

/// Scores the whole market against team needs, budget, and risk. Output is
/// sorted best-first by the composite score.
pub fn recommend_transfers(
    market: &[MarketListing],
    roster: &[Player],
    budget: Budget,
    config: &TransfersConfig,
) -> Vec<TransferRecommendation> {
    let scale = market_scale(market, config);
    let mut recommendations: Vec<TransferRecommendation> = market
        .iter()
        .filter(|listing| {
            !listing.player.owned && !roster.iter().any(|p| p.id == listing.player.id)
        })
        .map(|listing| {
            let signals = compute_signals(listing, roster, config);
            score_listing(listing, &signals, &scale, budget, config)
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.listing.asking_price.cmp(&b.listing.asking_price))
    });
    recommendations
}

fn score_listing(
    listing: &MarketListing,
    signals: &ListingSignals,
    scale: &MarketScale,
    budget: Budget,
    config: &TransfersConfig,
) -> TransferRecommendation {
    let norm_points = ratio(signals.points_per_game, scale.max_points);
    let norm_value = ratio(signals.value_for_money, scale.max_value_for_money);
    let norm_projection = ratio(signals.season_projection, scale.max_projection);
    let form = (signals.form_trend + 1.0) / 2.0;
    let safety = 1.0 - signals.injury_risk;

    let performance = 0.5 * norm_points + 0.3 * norm_projection + 0.2 * form;
    let affordability = affordability(budget, listing.asking_price, config);
    let value = 0.7 * norm_value + 0.3 * affordability;

    let score = config.weight_performance * performance
        + config.weight_value * value
        + config.weight_need * signals.positional_need
        + config.weight_risk * safety;

    let mut reasons = vec![
        TransferReason {
            message: format!("{:.1} points per game", signals.points_per_game),
            impact: impact(norm_points),
        },
        TransferReason {
            message: format!("{:.2} points per million asked", signals.value_for_money),
            impact: impact(norm_value),
        },
        TransferReason {
            message: format!(
                "projects to {:.0} points over the season",
                signals.season_projection
            ),
            impact: impact(norm_projection),
        },
        TransferReason {
            message: format!(
                "squad need at {}: {:.0}%",
                listing.player.position,
                signals.positional_need * 100.0
            ),
            impact: impact(signals.positional_need),
        },
        TransferReason {
            message: form_message(signals.form_trend, listing.player.value_trend),
            impact: impact(form),
        },
        TransferReason {
            message: format!(
                "fitness outlook: {} ({:.0}% risk)",
                listing.player.status,
                signals.injury_risk * 100.0
            ),
            impact: impact(safety),
        },
    ];
    reasons.sort_by(|a, b| b.impact.total_cmp(&a.impact));

    let risk = risk_level(signals.injury_risk, config);
    let priority = priority_for(score, signals.positional_need, risk, config);

    TransferRecommendation {
        listing: listing.clone(),
        score,
        reasons,
        risk,
        priority,
    }
}

fn form_message(form_trend: f64, value_trend: i64) -> String {
    if form_trend > 0.0 {
        format!("market value rising (+{value_trend})")
    } else if form_trend < 0.0 {
        format!("market value falling ({value_trend})")
    } else {
        "market value flat".to_string()
    }
}

fn risk_level(injury_risk: f64, config: &TransfersConfig) -> RiskLevel {
    if injury_risk < config.risk_low_max {
        RiskLevel::Low
    } else if injury_risk < config.risk_medium_max {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Essential requires a genuinely thin line plus an acceptable risk profile,
/// never score alone.
fn priority_for(
    score: f64,
    need: f64,
    risk: RiskLevel,
    config: &TransfersConfig,
) -> TransferPriority {
    if need >= config.essential_need_floor
        && risk != RiskLevel::High
        && score >= config.essential_score_floor
    {
        TransferPriority::Essential
    } else if score >= config.recommended_score_floor {
        TransferPriority::Recommended
    } else {
        TransferPriority::Optional
    }
}

fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn impact(normalized: f64) -> f64 {
    (normalized.clamp(0.0, 1.0) * 100.0).round() / 10.0
}

/// Full price headroom keeps the factor at 1.0; overshooting a (possibly
/// negative) budget bleeds it toward zero.
fn affordability(budget: Budget, asking_price: i64, config: &TransfersConfig) -> f64 {
    let headroom = budget.current - asking_price;
    if headroom >= 0 {
        1.0
    } else {
        (1.0 + headroom as f64 / config.affordability_scale as f64).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{PlayerStatus, Position};

    use super::*;

    fn config() -> TransfersConfig {
        TransfersConfig::default()
    }

    fn listing(id: &str, position: Position, average: f64, price: i64) -> MarketListing {
        MarketListing::new(
            Player::new(id, id, position)
                .with_points(average, (average * 30.0) as i32)
                .with_owned(false),
            price,
        )
    }

    fn roster_without_forwards() -> Vec<Player> {
        vec![
            Player::new("gk1", "Keeper", Position::Goalkeeper).with_points(5.0, 150),
            Player::new("d1", "Back", Position::Defender).with_points(5.0, 150),
            Player::new("d2", "Back", Position::Defender).with_points(5.0, 150),
            Player::new("d3", "Back", Position::Defender).with_points(5.0, 150),
            Player::new("d4", "Back", Position::Defender).with_points(5.0, 150),
            Player::new("m1", "Mid", Position::Midfielder).with_points(5.0, 150),
            Player::new("m2", "Mid", Position::Midfielder).with_points(5.0, 150),
            Player::new("m3", "Mid", Position::Midfielder).with_points(5.0, 150),
        ]
    }

    #[test]
    fn owned_players_never_come_back_as_targets() {
        let roster = roster_without_forwards();
        let mut already_mine = listing("d1", Position::Defender, 6.0, 2_000_000);
        already_mine.player.owned = false;
        let flagged_owned = MarketListing::new(
            Player::new("x1", "Mine", Position::Forward).with_points(7.0, 210),
            3_000_000,
        );
        let market = vec![
            already_mine,
            flagged_owned,
            listing("f9", Position::Forward, 6.0, 2_000_000),
        ];
        let recs = recommend_transfers(&market, &roster, Budget::new(5_000_000), &config());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].listing.player.id, "f9");
    }

    #[test]
    fn a_thin_line_outranks_a_stocked_one_at_equal_quality() {
        let roster = roster_without_forwards();
        let market = vec![
            listing("m9", Position::Midfielder, 6.0, 2_000_000),
            listing("f9", Position::Forward, 6.0, 2_000_000),
        ];
        let recs = recommend_transfers(&market, &roster, Budget::new(5_000_000), &config());
        assert_eq!(recs[0].listing.player.id, "f9");
        assert!(recs[0].score > recs[1].score);
    }

    #[test]
    fn risk_level_follows_the_fitness_signal() {
        let roster = roster_without_forwards();
        let mut crocked = listing("f8", Position::Forward, 7.0, 2_000_000);
        crocked.player.status = PlayerStatus::Injured;
        let market = vec![listing("f9", Position::Forward, 7.0, 2_000_000), crocked];
        let recs = recommend_transfers(&market, &roster, Budget::new(5_000_000), &config());

        let fit = recs.iter().find(|r| r.listing.player.id == "f9").expect("fit");
        let hurt = recs.iter().find(|r| r.listing.player.id == "f8").expect("hurt");
        assert_eq!(fit.risk, RiskLevel::Low);
        assert_eq!(hurt.risk, RiskLevel::High);
        assert_ne!(hurt.priority, TransferPriority::Essential);
        assert!(fit.score > hurt.score);
    }

    #[test]
    fn essential_requires_need_and_tolerable_risk() {
        let roster = roster_without_forwards();
        let market = vec![listing("f9", Position::Forward, 7.0, 2_000_000)];
        let recs = recommend_transfers(&market, &roster, Budget::new(5_000_000), &config());
        assert_eq!(recs[0].priority, TransferPriority::Essential);
    }

    #[test]
    fn negative_budget_depresses_every_score() {
        let roster = roster_without_forwards();
        let market = vec![listing("f9", Position::Forward, 7.0, 4_000_000)];
        let rich = recommend_transfers(&market, &roster, Budget::new(10_000_000), &config());
        let broke = recommend_transfers(&market, &roster, Budget::new(-3_000_000), &config());
        assert!(broke[0].score < rich[0].score);
    }

    #[test]
    fn reasons_carry_bounded_impacts_sorted_descending() {
        let roster = roster_without_forwards();
        let market = vec![listing("f9", Position::Forward, 7.0, 2_000_000)];
        let recs = recommend_transfers(&market, &roster, Budget::new(5_000_000), &config());
        let reasons = &recs[0].reasons;
        assert_eq!(reasons.len(), 6);
        for reason in reasons {
            assert!((0.0..=10.0).contains(&reason.impact));
        }
        for pair in reasons.windows(2) {
            assert!(pair[0].impact >= pair[1].impact);
        }
    }

    #[test]
    fn empty_market_yields_no_recommendations() {
        let recs = recommend_transfers(&[], &roster_without_forwards(), Budget::new(0), &config());
        assert!(recs.is_empty());
    }
}
