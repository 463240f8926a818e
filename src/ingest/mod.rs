pub mod fields;
pub mod snapshot;

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::ingest::fields::{
    array_from_keys, integer_from_paths, object_get_case_insensitive, string_from_paths,
    timestamp_from_paths,
};
use crate::ingest::snapshot::{parse_listing, parse_player};
use crate::types::{Budget, LeagueSnapshot};

pub const LEAGUE_ID_KEYS: &[&str] = &["league_id", "leagueId", "league", "id"];
pub const BUDGET_KEYS: &[&str] = &["budget.current", "budget", "current_budget", "money", "balance"];
pub const FETCHED_AT_KEYS: &[&str] = &["fetched_at", "captured_at", "timestamp"];
pub const ROSTER_KEYS: &[&str] = &["roster", "players", "squad", "team_players"];
pub const MARKET_KEYS: &[&str] = &["market", "listings", "transfer_market", "sales"];
pub const TEAMS_KEYS: &[&str] = &["teams", "team_names", "managers"];

/// Counts of entities rejected at the door for missing required fields.
/// Never fatal; callers log the totals.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IngestReport {
    pub dropped_players: usize,
    pub dropped_listings: usize,
}

impl IngestReport {
    pub fn dropped_total(&self) -> usize {
        self.dropped_players + self.dropped_listings
    }
}

/// Normalizes a raw league payload into the canonical snapshot. Empty roster
/// or market arrays are valid states, not errors.
pub fn parse_snapshot(raw: &Value) -> Result<(LeagueSnapshot, IngestReport)> {
    let object = raw
        .as_object()
        .ok_or_else(|| anyhow!("snapshot root must be a JSON object"))?;

    let mut report = IngestReport::default();
    let mut roster = Vec::new();
    if let Some(entries) = array_from_keys(raw, ROSTER_KEYS) {
        for entry in entries {
            match entry.as_object().and_then(|o| parse_player(o, true)) {
                Some(player) => roster.push(player),
                None => report.dropped_players += 1,
            }
        }
    }

    let mut market = Vec::new();
    if let Some(entries) = array_from_keys(raw, MARKET_KEYS) {
        for entry in entries {
            match entry.as_object().and_then(parse_listing) {
                Some(listing) => market.push(listing),
                None => report.dropped_listings += 1,
            }
        }
    }

    let mut teams = BTreeMap::new();
    for key in TEAMS_KEYS {
        if let Some(mapping) = object_get_case_insensitive(object, key).and_then(Value::as_object) {
            for (team_id, name) in mapping {
                if let Some(name) = name.as_str() {
                    teams.insert(team_id.clone(), name.to_string());
                }
            }
            break;
        }
    }

    let snapshot = LeagueSnapshot {
        league_id: string_from_paths(object, LEAGUE_ID_KEYS)
            .unwrap_or_else(|| "default".to_string()),
        fetched_at: timestamp_from_paths(object, FETCHED_AT_KEYS).unwrap_or_else(Utc::now),
        budget: Budget::new(integer_from_paths(object, BUDGET_KEYS).unwrap_or(0)),
        roster,
        market,
        teams,
    };
    Ok((snapshot, report))
}
