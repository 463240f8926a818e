use std::str::FromStr;

use crate::types::{Player, Position};

/// Maps a raw position code to a line; anything unrecognized becomes the
/// `Unknown` sentinel and stays out of line-based computations.
pub fn classify(raw: &str) -> Position {
    Position::from_str(raw).unwrap_or(Position::Unknown)
}

/// Minimum healthy players a line needs before anyone there is surplus.
pub fn minimum_required(position: Position) -> usize {
    match position {
        Position::Goalkeeper => 1,
        Position::Defender => 3,
        Position::Midfielder => 2,
        Position::Forward => 1,
        Position::Unknown => 0,
    }
}

pub fn is_lineup_eligible(player: &Player) -> bool {
    player.owned && player.status.is_available() && player.position.is_known()
}

pub fn line_players<'a>(roster: &'a [Player], position: Position) -> Vec<&'a Player> {
    roster.iter().filter(|p| p.position == position).collect()
}

pub fn healthy_line_players<'a>(roster: &'a [Player], position: Position) -> Vec<&'a Player> {
    roster
        .iter()
        .filter(|p| p.position == position && is_lineup_eligible(p))
        .collect()
}

pub fn healthy_count(roster: &[Player], position: Position) -> usize {
    healthy_line_players(roster, position).len()
}
