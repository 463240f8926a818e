use std::collections::BTreeMap;

use crate::types::LeagueSnapshot;

/// Injected team-name lookup. Components take this by reference instead of
/// consulting any shared mutable registry, so tests can swap in fixtures.
pub trait TeamDirectory {
    fn team_name(&self, team_id: &str) -> Option<&str>;

    fn display_name<'a>(&'a self, team_id: &'a str) -> &'a str {
        self.team_name(team_id).unwrap_or(team_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticTeamDirectory {
    names: BTreeMap<String, String>,
}

impl StaticTeamDirectory {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self { names }
    }

    pub fn from_snapshot(snapshot: &LeagueSnapshot) -> Self {
        Self::new(snapshot.teams.clone())
    }
}

impl TeamDirectory for StaticTeamDirectory {
    fn team_name(&self, team_id: &str) -> Option<&str> {
        self.names.get(team_id).map(String::as_str)
    }
}
