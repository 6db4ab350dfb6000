// Player data model and the read-only player universe lookup.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Football positions used for availability filtering and ordering.
///
/// `Flex` is the catch-all for unrecognized or multi-eligible designations and
/// always sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DEF,
    Flex,
}

impl Position {
    /// Parse a provider position string, case-insensitively.
    ///
    /// Unrecognized strings map to `Flex` rather than failing; providers ship
    /// a long tail of slot labels (IDP, SUPER_FLEX, ...) that all rank last
    /// for our purposes.
    pub fn from_provider_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "QB" => Position::QB,
            "RB" => Position::RB,
            "WR" => Position::WR,
            "TE" => Position::TE,
            "K" => Position::K,
            "DEF" | "DST" | "D/ST" => Position::DEF,
            _ => Position::Flex,
        }
    }

    /// Total order used for availability sorting: QB < RB < WR < TE < K < DEF,
    /// with `Flex` last.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::QB => 0,
            Position::RB => 1,
            Position::WR => 2,
            Position::TE => 3,
            Position::K => 4,
            Position::DEF => 5,
            Position::Flex => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DEF => "DEF",
            Position::Flex => "FLEX",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PlayerIdentity
// ---------------------------------------------------------------------------

/// One real-world athlete, keyed by the native provider's ID.
///
/// `native_id` is the only identifier guaranteed unique. `foreign_id` is
/// best-effort: absent for players the other provider has never carried,
/// occasionally duplicated or recycled by that provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub native_id: String,
    #[serde(default)]
    pub foreign_id: Option<String>,
    pub full_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub position: Position,
    /// 2-3 letter NFL team code; `None` for free agents.
    #[serde(default)]
    pub team: Option<String>,
}

// ---------------------------------------------------------------------------
// PlayerUniverse
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("duplicate native ID in player universe: {native_id}")]
    DuplicateNativeId { native_id: String },
}

/// Read-only lookup over the full current player directory.
///
/// Players are held sorted ascending by `native_id` so that every scan over
/// the universe (notably the resolver's name+team fallback) iterates in a
/// stable, deterministic order.
#[derive(Debug, Clone)]
pub struct PlayerUniverse {
    players: Vec<PlayerIdentity>,
    by_native_id: HashMap<String, usize>,
}

impl PlayerUniverse {
    /// Build a universe from an arbitrary-order player list.
    ///
    /// Sorts by native ID and rejects duplicates; the directory loader is
    /// expected to have deduplicated upstream, so a collision here is a data
    /// fault worth surfacing, not something to silently last-write-win.
    pub fn new(mut players: Vec<PlayerIdentity>) -> Result<Self, UniverseError> {
        players.sort_by(|a, b| a.native_id.cmp(&b.native_id));

        let mut by_native_id = HashMap::with_capacity(players.len());
        for (idx, p) in players.iter().enumerate() {
            if by_native_id.insert(p.native_id.clone(), idx).is_some() {
                return Err(UniverseError::DuplicateNativeId {
                    native_id: p.native_id.clone(),
                });
            }
        }

        Ok(Self {
            players,
            by_native_id,
        })
    }

    pub fn get(&self, native_id: &str) -> Option<&PlayerIdentity> {
        self.by_native_id.get(native_id).map(|&i| &self.players[i])
    }

    /// Iterate all players in ascending native-ID order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerIdentity> {
        self.players.iter()
    }

    /// All players, sorted ascending by native ID.
    pub fn players(&self) -> &[PlayerIdentity] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
