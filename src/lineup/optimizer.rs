use std::collections::BTreeSet;

use crate::lineup::{Formation, LineupResult, FORMATION_CATALOGUE};
use crate::positions::is_lineup_eligible;
use crate::types::{Metric, Player, Position};

/// Picks the best starting eleven over the formation catalogue. Never fails:
/// when no template is feasible the result is a best-effort fill flagged
/// incomplete.
pub fn optimize_lineup(roster: &[Player], metric: Metric) -> LineupResult {
    let pool: Vec<&Player> = roster
        .iter()
        .filter(|p| p.owned && p.status.is_available())
        .collect();

    let goalkeepers = sorted_line(&pool, Position::Goalkeeper, metric);
    let defenders = sorted_line(&pool, Position::Defender, metric);
    let midfielders = sorted_line(&pool, Position::Midfielder, metric);
    let forwards = sorted_line(&pool, Position::Forward, metric);

    let mut best: Option<(Formation, f64)> = None;
    for formation in FORMATION_CATALOGUE {
        if goalkeepers.is_empty()
            || defenders.len() < formation.defenders
            || midfielders.len() < formation.midfielders
            || forwards.len() < formation.forwards
        {
            continue;
        }
        let score = metric.value_of(goalkeepers[0])
            + line_score(&defenders, formation.defenders, metric)
            + line_score(&midfielders, formation.midfielders, metric)
            + line_score(&forwards, formation.forwards, metric);
        // Strictly greater, so catalogue order breaks ties.
        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((formation, score));
        }
    }

    match best {
        Some((formation, _)) => assemble(
            formation,
            &pool,
            &goalkeepers,
            &defenders,
            &midfielders,
            &forwards,
            metric,
        ),
        None => best_effort(&pool, &goalkeepers, metric),
    }
}

fn sorted_line<'a>(pool: &[&'a Player], position: Position, metric: Metric) -> Vec<&'a Player> {
    let mut line: Vec<&Player> = pool
        .iter()
        .copied()
        .filter(|p| p.position == position && is_lineup_eligible(p))
        .collect();
    line.sort_by(|a, b| metric.value_of(b).total_cmp(&metric.value_of(a)));
    line
}

fn line_score(line: &[&Player], take: usize, metric: Metric) -> f64 {
    line.iter().take(take).map(|p| metric.value_of(p)).sum()
}

fn assemble(
    formation: Formation,
    pool: &[&Player],
    goalkeepers: &[&Player],
    defenders: &[&Player],
    midfielders: &[&Player],
    forwards: &[&Player],
    metric: Metric,
) -> LineupResult {
    let goalkeeper = goalkeepers.first().map(|p| (*p).clone());
    let defenders: Vec<Player> = defenders
        .iter()
        .take(formation.defenders)
        .map(|p| (*p).clone())
        .collect();
    let midfielders: Vec<Player> = midfielders
        .iter()
        .take(formation.midfielders)
        .map(|p| (*p).clone())
        .collect();
    let forwards: Vec<Player> = forwards
        .iter()
        .take(formation.forwards)
        .map(|p| (*p).clone())
        .collect();

    finish(
        goalkeeper,
        defenders,
        midfielders,
        forwards,
        formation,
        pool,
        metric,
        true,
    )
}

fn best_effort(pool: &[&Player], goalkeepers: &[&Player], metric: Metric) -> LineupResult {
    let goalkeeper = goalkeepers.first().map(|p| (*p).clone());
    let mut outfielders: Vec<&Player> = pool
        .iter()
        .copied()
        .filter(|p| is_lineup_eligible(p) && p.position != Position::Goalkeeper)
        .collect();
    outfielders.sort_by(|a, b| metric.value_of(b).total_cmp(&metric.value_of(a)));

    let mut defenders = Vec::new();
    let mut midfielders = Vec::new();
    let mut forwards = Vec::new();
    for player in outfielders.into_iter().take(10) {
        match player.position {
            Position::Defender => defenders.push(player.clone()),
            Position::Midfielder => midfielders.push(player.clone()),
            Position::Forward => forwards.push(player.clone()),
            Position::Goalkeeper | Position::Unknown => {}
        }
    }

    let formation = nearest_formation(defenders.len(), midfielders.len(), forwards.len());
    finish(
        goalkeeper,
        defenders,
        midfielders,
        forwards,
        formation,
        pool,
        metric,
        false,
    )
}

/// Catalogue entry closest to the actual line counts; display only.
fn nearest_formation(defenders: usize, midfielders: usize, forwards: usize) -> Formation {
    let mut nearest = FORMATION_CATALOGUE[0];
    let mut best_distance = usize::MAX;
    for formation in FORMATION_CATALOGUE {
        let distance = formation.defenders.abs_diff(defenders)
            + formation.midfielders.abs_diff(midfielders)
            + formation.forwards.abs_diff(forwards);
        if distance < best_distance {
            best_distance = distance;
            nearest = formation;
        }
    }
    nearest
}

#[allow(clippy::too_many_arguments)]
fn finish(
    goalkeeper: Option<Player>,
    defenders: Vec<Player>,
    midfielders: Vec<Player>,
    forwards: Vec<Player>,
    formation: Formation,
    pool: &[&Player],
    metric: Metric,
    complete: bool,
) -> LineupResult {
    let selected: BTreeSet<&str> = goalkeeper
        .iter()
        .chain(defenders.iter())
        .chain(midfielders.iter())
        .chain(forwards.iter())
        .map(|p| p.id.as_str())
        .collect();

    let mut reserves: Vec<Player> = pool
        .iter()
        .filter(|p| !selected.contains(p.id.as_str()))
        .map(|p| (*p).clone())
        .collect();
    reserves.sort_by(|a, b| metric.value_of(b).total_cmp(&metric.value_of(a)));

    let missing_goalkeeper = goalkeeper.is_none();
    let mut result = LineupResult {
        goalkeeper,
        defenders,
        midfielders,
        forwards,
        formation,
        reserves,
        total_score: 0.0,
        average_score: 0.0,
        complete,
        missing_goalkeeper,
    };
    let starters = result.starter_count();
    result.total_score = result.starters().iter().map(|p| metric.value_of(p)).sum();
    result.average_score = if starters > 0 {
        result.total_score / starters as f64
    } else {
        0.0
    };
    result
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::types::PlayerStatus;

    use super::*;

    fn player(id: &str, position: Position, average: f64) -> Player {
        Player::new(id, id, position).with_points(average, (average * 30.0) as i32)
    }

    fn full_roster() -> Vec<Player> {
        let mut roster = vec![player("gk1", Position::Goalkeeper, 5.0)];
        for i in 0..5 {
            roster.push(player(
                &format!("def{i}"),
                Position::Defender,
                6.0 - i as f64 * 0.5,
            ));
        }
        for i in 0..5 {
            roster.push(player(
                &format!("mid{i}"),
                Position::Midfielder,
                7.0 - i as f64 * 0.5,
            ));
        }
        for i in 0..4 {
            roster.push(player(
                &format!("fwd{i}"),
                Position::Forward,
                8.0 - i as f64,
            ));
        }
        roster
    }

    #[test]
    fn fills_exact_slot_count_without_duplicates() {
        let result = optimize_lineup(&full_roster(), Metric::AveragePoints);
        assert!(result.complete);
        assert_eq!(result.starter_count(), result.formation.slots());
        let ids: BTreeSet<&str> = result.starters().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), result.starter_count());
    }

    #[test]
    fn chosen_formation_beats_every_feasible_alternative() {
        let roster = full_roster();
        let metric = Metric::AveragePoints;
        let result = optimize_lineup(&roster, metric);

        let pool: Vec<&Player> = roster.iter().collect();
        let defenders = sorted_line(&pool, Position::Defender, metric);
        let midfielders = sorted_line(&pool, Position::Midfielder, metric);
        let forwards = sorted_line(&pool, Position::Forward, metric);
        let goalkeeper = sorted_line(&pool, Position::Goalkeeper, metric)[0];

        for formation in FORMATION_CATALOGUE {
            if defenders.len() < formation.defenders
                || midfielders.len() < formation.midfielders
                || forwards.len() < formation.forwards
            {
                continue;
            }
            let score = Metric::AveragePoints.value_of(goalkeeper)
                + line_score(&defenders, formation.defenders, metric)
                + line_score(&midfielders, formation.midfielders, metric)
                + line_score(&forwards, formation.forwards, metric);
            assert!(result.total_score >= score - 1e-9);
        }
    }

    #[test]
    fn never_starts_an_unavailable_player() {
        let mut roster = full_roster();
        roster[1].status = PlayerStatus::Injured;
        roster[6].status = PlayerStatus::Doubtful;
        let result = optimize_lineup(&roster, Metric::AveragePoints);
        for starter in result.starters() {
            assert!(starter.status.is_available(), "{} started", starter.id);
        }
    }

    #[test]
    fn shorthanded_roster_falls_back_instead_of_failing() {
        // 1 GK, 5 DEF, 2 MID, 1 FWD: no full template fits, but a best-effort
        // nine-man side must still come back.
        let mut roster = vec![player("gk1", Position::Goalkeeper, 5.0)];
        for i in 0..5 {
            roster.push(player(&format!("def{i}"), Position::Defender, 5.0));
        }
        roster.push(player("mid0", Position::Midfielder, 6.0));
        roster.push(player("mid1", Position::Midfielder, 5.5));
        roster.push(player("fwd0", Position::Forward, 7.0));

        let result = optimize_lineup(&roster, Metric::AveragePoints);
        assert!(!result.complete);
        assert!(!result.missing_goalkeeper);
        assert_eq!(result.starter_count(), 9);
        assert_eq!(result.midfielders.len(), 2);
        assert_eq!(result.forwards.len(), 1);
    }

    #[test]
    fn missing_goalkeeper_is_flagged_not_fatal() {
        let roster: Vec<Player> = full_roster()
            .into_iter()
            .filter(|p| p.position != Position::Goalkeeper)
            .collect();
        let result = optimize_lineup(&roster, Metric::AveragePoints);
        assert!(result.missing_goalkeeper);
        assert!(result.goalkeeper.is_none());
        assert!(!result.complete);
    }

    #[test]
    fn empty_pool_yields_empty_incomplete_result() {
        let result = optimize_lineup(&[], Metric::TotalPoints);
        assert!(!result.complete);
        assert_eq!(result.starter_count(), 0);
        assert_eq!(result.formation, FORMATION_CATALOGUE[0]);
        assert!(result.reserves.is_empty());
        assert_eq!(result.total_score, 0.0);
    }

    #[test]
    fn reserves_hold_everyone_not_selected_sorted_by_metric() {
        let result = optimize_lineup(&full_roster(), Metric::AveragePoints);
        assert_eq!(result.starter_count() + result.reserves.len(), 15);
        for pair in result.reserves.windows(2) {
            assert!(pair[0].average_points >= pair[1].average_points);
        }
    }
}
