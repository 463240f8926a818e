use crate::config::TransfersConfig;
use crate::positions::{healthy_count, minimum_required};
use crate::types::{MarketListing, Player, PlayerStatus};

const MIN_PRICE_MILLIONS: f64 = 0.1;

/// Raw per-listing signals before market normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingSignals {
    pub points_per_game: f64,
    pub value_for_money: f64,
    pub form_trend: f64,
    pub injury_risk: f64,
    pub season_projection: f64,
    pub positional_need: f64,
}

/// Market maxima used to normalize scale-dependent signals; computed once per
/// snapshot so scoring stays deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketScale {
    pub max_points: f64,
    pub max_value_for_money: f64,
    pub max_projection: f64,
}

pub fn market_scale(market: &[MarketListing], config: &TransfersConfig) -> MarketScale {
    let mut scale = MarketScale::default();
    for listing in market {
        scale.max_points = scale.max_points.max(listing.player.average_points);
        scale.max_value_for_money = scale
            .max_value_for_money
            .max(value_for_money(&listing.player, listing.asking_price));
        scale.max_projection = scale
            .max_projection
            .max(season_projection(&listing.player, config));
    }
    scale
}

pub fn compute_signals(
    listing: &MarketListing,
    roster: &[Player],
    config: &TransfersConfig,
) -> ListingSignals {
    let player = &listing.player;
    ListingSignals {
        points_per_game: player.average_points,
        value_for_money: value_for_money(player, listing.asking_price),
        form_trend: (player.value_trend as f64 / config.form_trend_reference as f64)
            .clamp(-1.0, 1.0),
        injury_risk: injury_risk(player, config),
        season_projection: season_projection(player, config),
        positional_need: positional_need(player, roster),
    }
}

/// Metric per million of asking price.
fn value_for_money(player: &Player, asking_price: i64) -> f64 {
    let millions = (asking_price as f64 / 1_000_000.0).max(MIN_PRICE_MILLIONS);
    player.average_points / millions
}

/// Linear pace extrapolation through the season length.
fn season_projection(player: &Player, config: &TransfersConfig) -> f64 {
    player.average_points * config.season_rounds as f64
}

fn injury_risk(player: &Player, config: &TransfersConfig) -> f64 {
    let base: f64 = match player.status {
        PlayerStatus::Available => 0.1,
        PlayerStatus::Doubtful => 0.45,
        PlayerStatus::BuildingFitness => 0.6,
        PlayerStatus::Suspended => 0.7,
        PlayerStatus::Injured => 0.85,
    };
    // A collapsing price usually means the market is pricing a problem in.
    let bump = if player.value_trend <= -config.collapse_trend {
        0.15
    } else {
        0.0
    };
    (base + bump).min(1.0)
}

/// Fewer healthy players at a line raises its need; capped at 1.0.
fn positional_need(player: &Player, roster: &[Player]) -> f64 {
    if !player.position.is_known() {
        return 0.0;
    }
    let required = minimum_required(player.position) as f64;
    let healthy = healthy_count(roster, player.position) as f64;
    (required / (healthy + 1.0)).min(1.0)
}

#[cfg(test)]
mod tests {
    use crate::types::Position;

    use super::*;

    fn config() -> TransfersConfig {
        TransfersConfig::default()
    }

    #[test]
    fn need_rises_as_a_line_thins_out() {
        let listing = MarketListing::new(
            Player::new("m9", "Target", Position::Midfielder)
                .with_points(6.0, 180)
                .with_owned(false),
            5_000_000,
        );
        let thin: Vec<Player> = Vec::new();
        let stocked: Vec<Player> = (0..4)
            .map(|i| Player::new(format!("m{i}"), "Own", Position::Midfielder))
            .collect();

        let starved = compute_signals(&listing, &thin, &config());
        let covered = compute_signals(&listing, &stocked, &config());
        assert!(starved.positional_need > covered.positional_need);
        assert!((starved.positional_need - 1.0).abs() < 1e-9);
        assert!((covered.positional_need - 0.4).abs() < 1e-9);
    }

    #[test]
    fn injury_risk_reflects_status_and_price_collapse() {
        let cfg = config();
        let fit = Player::new("p1", "Fit", Position::Forward).with_owned(false);
        let hurt = Player::new("p2", "Hurt", Position::Forward)
            .with_status(crate::types::PlayerStatus::Injured)
            .with_owned(false);
        let crashing = Player::new("p3", "Crash", Position::Forward)
            .with_value(4_000_000, -cfg.collapse_trend)
            .with_owned(false);

        let fit_risk = compute_signals(&MarketListing::new(fit, 1_000_000), &[], &cfg).injury_risk;
        let hurt_risk =
            compute_signals(&MarketListing::new(hurt, 1_000_000), &[], &cfg).injury_risk;
        let crash_risk =
            compute_signals(&MarketListing::new(crashing, 1_000_000), &[], &cfg).injury_risk;
        assert!(fit_risk < hurt_risk);
        assert!((crash_risk - 0.25).abs() < 1e-9);
    }

    #[test]
    fn injury_risk_caps_at_one_for_injured_and_crashing() {
        let cfg = config();
        let wreck = Player::new("p4", "Wreck", Position::Forward)
            .with_status(crate::types::PlayerStatus::Injured)
            .with_value(4_000_000, -2 * cfg.collapse_trend)
            .with_owned(false);
        let risk = compute_signals(&MarketListing::new(wreck, 1_000_000), &[], &cfg).injury_risk;
        assert!((risk - 1.0).abs() < 1e-9);
    }

    #[test]
    fn projection_is_linear_in_season_length() {
        let cfg = config();
        let player = Player::new("p1", "Pace", Position::Midfielder)
            .with_points(5.0, 150)
            .with_owned(false);
        let signals = compute_signals(&MarketListing::new(player, 2_000_000), &[], &cfg);
        assert!((signals.season_projection - 5.0 * cfg.season_rounds as f64).abs() < 1e-9);
        assert!((signals.value_for_money - 2.5).abs() < 1e-9);
    }
}
