use crate::config::SalesConfig;
use crate::positions::{healthy_line_players, minimum_required};
use crate::types::{Metric, Player};

/// Band a player falls into among the healthy players of his line, ranked by
/// the chosen metric descending. The bottom third (at least one player) is
/// the fringe band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBand {
    Starter,
    Rotation,
    Fringe,
}

#[derive(Debug, Clone, Copy)]
pub struct LineStanding {
    pub rank: usize,
    pub healthy: usize,
    pub required: usize,
    pub band: RankBand,
}

/// Standing among healthy line peers; `None` when the player is sidelined,
/// unowned, or has no recognized position.
pub fn line_standing(player: &Player, roster: &[Player], metric: Metric) -> Option<LineStanding> {
    let mut peers = healthy_line_players(roster, player.position);
    if peers.is_empty() {
        return None;
    }
    peers.sort_by(|a, b| metric.value_of(b).total_cmp(&metric.value_of(a)));
    let rank = peers.iter().position(|p| p.id == player.id)?;
    let healthy = peers.len();
    let required = minimum_required(player.position);
    Some(LineStanding {
        rank,
        healthy,
        required,
        band: band_for(rank, healthy, required),
    })
}

fn band_for(rank: usize, healthy: usize, required: usize) -> RankBand {
    if rank < required {
        return RankBand::Starter;
    }
    let fringe_size = (healthy / 3).max(1);
    if rank >= healthy.saturating_sub(fringe_size) {
        RankBand::Fringe
    } else {
        RankBand::Rotation
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TeamBaseline {
    pub average_points: f64,
    pub value_per_point: f64,
}

/// Average metric and cost-per-point across the owned squad. Players with no
/// points yet are left out of the value-per-point mean so they cannot zero it.
pub fn team_baseline(roster: &[Player]) -> TeamBaseline {
    let owned: Vec<&Player> = roster.iter().filter(|p| p.owned).collect();
    if owned.is_empty() {
        return TeamBaseline {
            average_points: 0.0,
            value_per_point: 0.0,
        };
    }
    let average_points =
        owned.iter().map(|p| p.average_points).sum::<f64>() / owned.len() as f64;
    let ratios: Vec<f64> = owned.iter().filter_map(|p| value_per_point(p)).collect();
    let value_per_point = if ratios.is_empty() {
        0.0
    } else {
        ratios.iter().sum::<f64>() / ratios.len() as f64
    };
    TeamBaseline {
        average_points,
        value_per_point,
    }
}

pub fn value_per_point(player: &Player) -> Option<f64> {
    if player.average_points > 0.0 {
        Some(player.market_value as f64 / player.average_points)
    } else {
        None
    }
}

/// Conservative haircut applied when projecting what a sale actually brings.
pub fn expected_sale_value(player: &Player, config: &SalesConfig) -> i64 {
    (player.market_value as f64 * config.expected_value_haircut).round() as i64
}
