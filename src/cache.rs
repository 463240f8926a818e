use std::collections::HashMap;

use crate::report::SquadReport;

/// Caller-owned advice cache, keyed by league. The engine itself never
/// caches; holders of this struct decide its lifetime. A stored report is
/// valid only while the snapshot fingerprint it was built from matches.
#[derive(Debug, Default)]
pub struct AdviceCache {
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: String,
    report: SquadReport,
}

impl AdviceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, league_id: &str, fingerprint: &str) -> Option<&SquadReport> {
        self.entries
            .get(league_id)
            .filter(|entry| entry.fingerprint == fingerprint)
            .map(|entry| &entry.report)
    }

    /// Last-result-wins: a newer snapshot simply overwrites the entry.
    pub fn store(&mut self, league_id: &str, fingerprint: &str, report: SquadReport) {
        self.entries.insert(
            league_id.to_string(),
            CacheEntry {
                fingerprint: fingerprint.to_string(),
                report,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
