// Roster aggregation: per-snapshot resolution into native-ID space, and the
// concurrent per-league fan-out that unions every tracked league into one
// rostered-anywhere set.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, warn};

use super::snapshot::{LeagueRosterSnapshot, Provider, ResolvedRosterSet, RosterEntry};
use crate::identity::resolver::{IdentityResolver, Resolution};

// ---------------------------------------------------------------------------
// League reference and fetch collaborator
// ---------------------------------------------------------------------------

/// A tracked league, as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueRef {
    pub provider: Provider,
    pub league_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl LeagueRef {
    /// Human-readable label for logs.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.league_id)
    }
}

/// External per-league roster fetch. Implementations own all transport
/// concerns; errors they return are absorbed by the fan-out, never
/// propagated past it.
#[async_trait]
pub trait RosterFetcher: Send + Sync {
    async fn fetch_roster(&self, league: &LeagueRef) -> anyhow::Result<LeagueRosterSnapshot>;
}

// ---------------------------------------------------------------------------
// RosterAggregator
// ---------------------------------------------------------------------------

/// Turns one league's raw roster snapshot into a [`ResolvedRosterSet`].
pub struct RosterAggregator<'a> {
    resolver: IdentityResolver<'a>,
}

impl<'a> RosterAggregator<'a> {
    pub fn new(resolver: IdentityResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Aggregate one snapshot. Native-provider snapshots collect IDs directly
    /// and never invoke the resolver; foreign-provider snapshots resolve
    /// every entry, keeping observed foreign IDs even on a miss.
    pub fn aggregate(&self, snapshot: &LeagueRosterSnapshot) -> ResolvedRosterSet {
        let mut out = ResolvedRosterSet::default();

        match snapshot.provider {
            Provider::Native => {
                for entry in &snapshot.entries {
                    match entry {
                        RosterEntry::Native { native_id } => {
                            out.native_ids.insert(native_id.clone());
                        }
                        RosterEntry::Foreign { foreign_id, .. } => {
                            // A foreign-shaped entry inside a native snapshot
                            // is a provider-data anomaly; record it for audit
                            // without attempting resolution.
                            warn!("foreign entry {} in native snapshot, skipping", foreign_id);
                            out.foreign_ids.insert(foreign_id.clone());
                        }
                    }
                }
            }
            Provider::Foreign => {
                let mut canonical = 0usize;
                let mut fallback = 0usize;
                let mut misses = 0usize;

                for entry in &snapshot.entries {
                    match entry {
                        RosterEntry::Foreign { foreign_id, .. } => {
                            out.foreign_ids.insert(foreign_id.clone());
                            let meta = entry.foreign_meta();
                            match self.resolver.resolve(foreign_id, meta.as_ref()) {
                                Resolution::Canonical(id) => {
                                    canonical += 1;
                                    out.native_ids.insert(id);
                                }
                                Resolution::Fallback(id) => {
                                    fallback += 1;
                                    out.native_ids.insert(id);
                                }
                                Resolution::Miss => misses += 1,
                            }
                        }
                        RosterEntry::Native { native_id } => {
                            // Already in native space; take it as-is.
                            out.native_ids.insert(native_id.clone());
                        }
                    }
                }

                debug!(
                    "foreign roster resolved: {} canonical, {} fallback, {} misses",
                    canonical, fallback, misses
                );
            }
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Cross-league fan-out
// ---------------------------------------------------------------------------

/// Fetch and aggregate every tracked league concurrently, merging the results
/// by set union.
///
/// Failure isolation: a league whose fetch errors or exceeds `fetch_timeout`
/// contributes an empty set and a warning. One league's outage must never
/// block computing availability against the others.
pub async fn aggregate_all(
    fetcher: &dyn RosterFetcher,
    aggregator: &RosterAggregator<'_>,
    leagues: &[LeagueRef],
    fetch_timeout: Duration,
) -> ResolvedRosterSet {
    let fetches = leagues.iter().map(|league| async move {
        match timeout(fetch_timeout, fetcher.fetch_roster(league)).await {
            Ok(Ok(snapshot)) => aggregator.aggregate(&snapshot),
            Ok(Err(e)) => {
                warn!(
                    "roster fetch for league {} failed, treating as empty: {}",
                    league.label(),
                    e
                );
                ResolvedRosterSet::default()
            }
            Err(_) => {
                warn!(
                    "roster fetch for league {} timed out, treating as empty",
                    league.label()
                );
                ResolvedRosterSet::default()
            }
        }
    });

    let mut merged = ResolvedRosterSet::default();
    for set in future::join_all(fetches).await {
        merged.merge(set);
    }
    merged
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
