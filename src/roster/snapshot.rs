// Per-league roster snapshot types and the resolved output set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identity::resolver::ForeignMeta;

// ---------------------------------------------------------------------------
// Provider and raw entries
// ---------------------------------------------------------------------------

/// Which ID space a league's raw roster entries are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Sleeper-style leagues: entries already carry native IDs.
    Native,
    /// ESPN-style leagues: entries carry foreign IDs plus best-effort
    /// name/team metadata.
    Foreign,
}

/// One occupied roster slot as fetched, before any resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RosterEntry {
    Native {
        native_id: String,
    },
    Foreign {
        foreign_id: String,
        #[serde(default)]
        full_name: Option<String>,
        #[serde(default)]
        team: Option<String>,
    },
}

impl RosterEntry {
    /// The fallback metadata for a foreign entry, if any of it is present.
    pub fn foreign_meta(&self) -> Option<ForeignMeta> {
        match self {
            RosterEntry::Native { .. } => None,
            RosterEntry::Foreign {
                full_name, team, ..
            } => Some(ForeignMeta {
                full_name: full_name.clone(),
                team: team.clone(),
            }),
        }
    }
}

/// The occupied roster slots of one league at one fetch moment.
///
/// Constructed fresh on each refresh and never mutated; the next fetch
/// supersedes it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueRosterSnapshot {
    pub provider: Provider,
    pub entries: Vec<RosterEntry>,
}

// ---------------------------------------------------------------------------
// Resolved output
// ---------------------------------------------------------------------------

/// The aggregated output of roster resolution for one or more leagues.
///
/// Every ID in `native_ids` was either directly observed (native-sourced
/// league) or successfully resolved. Unresolved foreign entries are dropped
/// from `native_ids`, but every observed foreign ID is retained in
/// `foreign_ids` for cross-checking and diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRosterSet {
    pub native_ids: HashSet<String>,
    pub foreign_ids: HashSet<String>,
}

impl ResolvedRosterSet {
    pub fn is_rostered(&self, native_id: &str) -> bool {
        self.native_ids.contains(native_id)
    }

    /// Set-union merge of another league's resolved set into this one.
    pub fn merge(&mut self, other: ResolvedRosterSet) {
        self.native_ids.extend(other.native_ids);
        self.foreign_ids.extend(other.foreign_ids);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
