// Two-tier resolution of foreign (ESPN-space) player IDs to native
// (Sleeper-space) IDs.
//
// Tier 1 consults a precomputed mapping table (the canonicalizer). Tier 2
// falls back to an exact match on (normalized name, team) over the player
// universe. A miss is a normal outcome, not an error.

use std::collections::HashMap;

use tracing::debug;

use super::normalize::normalize;
use crate::player::PlayerUniverse;

// ---------------------------------------------------------------------------
// Canonicalizer trait
// ---------------------------------------------------------------------------

/// Precomputed foreign-to-native ID mapping table.
///
/// Returns `None` when no mapping exists. Upstream tables historically echoed
/// the input back on a miss; that sentinel convention is confined to
/// [`EchoTableCanonicalizer`] so resolution logic never compares IDs for
/// equality to detect absence.
pub trait Canonicalizer {
    fn canonical_native_id(&self, foreign_id: &str) -> Option<String>;
}

/// HashMap-backed canonicalizer for tests and static deployments.
#[derive(Debug, Default, Clone)]
pub struct StaticMapping {
    map: HashMap<String, String>,
}

impl StaticMapping {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn insert(&mut self, foreign_id: impl Into<String>, native_id: impl Into<String>) {
        self.map.insert(foreign_id.into(), native_id.into());
    }
}

impl Canonicalizer for StaticMapping {
    fn canonical_native_id(&self, foreign_id: &str) -> Option<String> {
        self.map.get(foreign_id).cloned()
    }
}

/// Adapter around a legacy echo-style table: such tables answer every query,
/// echoing the foreign ID back verbatim when unmapped. An answer equal to the
/// query is therefore a miss. (A real native ID that happens to equal the
/// foreign ID would be misread as a miss; that known risk lives here and
/// nowhere else.)
pub struct EchoTableCanonicalizer<F>
where
    F: Fn(&str) -> String,
{
    lookup: F,
}

impl<F> EchoTableCanonicalizer<F>
where
    F: Fn(&str) -> String,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<F> Canonicalizer for EchoTableCanonicalizer<F>
where
    F: Fn(&str) -> String,
{
    fn canonical_native_id(&self, foreign_id: &str) -> Option<String> {
        let answer = (self.lookup)(foreign_id);
        if answer == foreign_id {
            None
        } else {
            Some(answer)
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Best-effort name/team metadata attached to a foreign roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignMeta {
    pub full_name: Option<String>,
    pub team: Option<String>,
}

/// Outcome of one resolution attempt. The tier is retained so the aggregator
/// can report canonical-hit vs fallback-hit vs miss counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Direct mapping-table hit.
    Canonical(String),
    /// Name+team scan hit after a mapping-table miss.
    Fallback(String),
    Miss,
}

impl Resolution {
    pub fn native_id(&self) -> Option<&str> {
        match self {
            Resolution::Canonical(id) | Resolution::Fallback(id) => Some(id),
            Resolution::Miss => None,
        }
    }
}

// ---------------------------------------------------------------------------
// IdentityResolver
// ---------------------------------------------------------------------------

/// Resolves foreign player IDs to native IDs via the canonicalizer, falling
/// back to a deterministic name+team scan of the player universe.
pub struct IdentityResolver<'a> {
    canonicalizer: &'a dyn Canonicalizer,
    universe: &'a PlayerUniverse,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(canonicalizer: &'a dyn Canonicalizer, universe: &'a PlayerUniverse) -> Self {
        Self {
            canonicalizer,
            universe,
        }
    }

    /// Resolve one foreign ID. The direct table always wins; the fallback
    /// scan runs only on a table miss and only when the metadata carries both
    /// a name and a team (missing either disables the fallback for this entry
    /// without failing it).
    pub fn resolve(&self, foreign_id: &str, meta: Option<&ForeignMeta>) -> Resolution {
        if let Some(native_id) = self.canonicalizer.canonical_native_id(foreign_id) {
            debug!("canonical hit: foreign {} -> native {}", foreign_id, native_id);
            return Resolution::Canonical(native_id);
        }

        let Some(meta) = meta else {
            return Resolution::Miss;
        };
        let (Some(name), Some(team)) = (meta.full_name.as_deref(), meta.team.as_deref()) else {
            return Resolution::Miss;
        };

        let wanted_name = normalize(name);
        // Universe iteration is sorted by native ID, so first-match-wins is
        // deterministic even for duplicate (name, team) pairs.
        for player in self.universe.iter() {
            let Some(player_team) = player.team.as_deref() else {
                continue;
            };
            if player_team.eq_ignore_ascii_case(team) && normalize(&player.full_name) == wanted_name
            {
                debug!(
                    "fallback hit: foreign {} -> native {}",
                    foreign_id, player.native_id
                );
                return Resolution::Fallback(player.native_id.clone());
            }
        }

        debug!("resolution miss for foreign {}", foreign_id);
        Resolution::Miss
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
