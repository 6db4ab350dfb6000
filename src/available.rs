// Available-player derivation: the complement of the player universe minus
// the rostered-anywhere set, plus projection-based ranking for pickup
// recommendations.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::player::{PlayerIdentity, PlayerUniverse, Position};
use crate::roster::snapshot::ResolvedRosterSet;

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Players in the universe not rostered in any tracked league, optionally
/// filtered to one position, sorted by (position priority, full name)
/// ascending.
pub fn compute_available(
    universe: &PlayerUniverse,
    rostered: &ResolvedRosterSet,
    position_filter: Option<Position>,
) -> Vec<PlayerIdentity> {
    let mut available: Vec<PlayerIdentity> = universe
        .iter()
        .filter(|p| position_filter.map_or(true, |want| p.position == want))
        .filter(|p| !rostered.is_rostered(&p.native_id))
        .cloned()
        .collect();

    available.sort_by(|a, b| {
        a.position
            .sort_order()
            .cmp(&b.position.sort_order())
            .then_with(|| a.full_name.cmp(&b.full_name))
    });

    available
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Which precomputed projected-points field to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFormat {
    FullPpr,
    HalfPpr,
    Standard,
}

impl ScoringFormat {
    /// Parse a provider/config scoring label. Unrecognized labels default to
    /// full-PPR with a warning rather than failing the call.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "ppr" | "full_ppr" | "full-ppr" | "full" => ScoringFormat::FullPpr,
            "half_ppr" | "half-ppr" | "half" | "0.5ppr" => ScoringFormat::HalfPpr,
            "standard" | "std" | "non_ppr" => ScoringFormat::Standard,
            other => {
                warn!("unrecognized scoring format '{}', defaulting to full PPR", other);
                ScoringFormat::FullPpr
            }
        }
    }
}

/// Projected points for one player across the three scoring formats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoints {
    pub ppr: f64,
    pub half_ppr: f64,
    pub standard: f64,
}

impl ProjectionPoints {
    pub fn points_for(&self, format: ScoringFormat) -> f64 {
        match format {
            ScoringFormat::FullPpr => self.ppr,
            ScoringFormat::HalfPpr => self.half_ppr,
            ScoringFormat::Standard => self.standard,
        }
    }
}

/// External weekly-projections lookup.
#[async_trait]
pub trait ProjectionsSource: Send + Sync {
    async fn fetch_projections(
        &self,
        week: u8,
        year: u16,
    ) -> anyhow::Result<HashMap<String, ProjectionPoints>>;
}

/// Degrade-to-empty wrapper around a projections fetch: a failed fetch yields
/// an empty map (ranking then returns nothing) instead of propagating.
pub async fn projections_or_empty(
    source: &dyn ProjectionsSource,
    week: u8,
    year: u16,
) -> HashMap<String, ProjectionPoints> {
    match source.fetch_projections(week, year).await {
        Ok(map) => map,
        Err(e) => {
            warn!(
                "projections fetch for week {} of {} failed, ranking will be empty: {}",
                week, year, e
            );
            HashMap::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Rank available players by projected points, descending, truncated to
/// `limit`.
///
/// Players absent from the projections map are excluded outright; absence of
/// a projection is not the same as a projection of zero. Ties order by native
/// ID ascending so output is reproducible.
pub fn rank_by_projection(
    available: &[PlayerIdentity],
    projections: &HashMap<String, ProjectionPoints>,
    format: ScoringFormat,
    limit: usize,
) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = available
        .iter()
        .filter_map(|p| {
            projections
                .get(&p.native_id)
                .map(|pts| (p.native_id.clone(), pts.points_for(format)))
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(limit);
    ranked
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn player(native_id: &str, name: &str, pos: Position, team: Option<&str>) -> PlayerIdentity {
        PlayerIdentity {
            native_id: native_id.to_string(),
            foreign_id: None,
            full_name: name.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            position: pos,
            team: team.map(|t| t.to_string()),
        }
    }

    fn rostered(native_ids: &[&str]) -> ResolvedRosterSet {
        let mut set = ResolvedRosterSet::default();
        for id in native_ids {
            set.native_ids.insert(id.to_string());
        }
        set
    }

    fn qb_rb_universe() -> PlayerUniverse {
        PlayerUniverse::new(vec![
            player("A", "Allen, QB A", Position::QB, Some("BUF")),
            player("B", "Barkley, QB B", Position::QB, Some("BUF")),
            player("C", "Chase, RB C", Position::RB, Some("MIA")),
        ])
        .unwrap()
    }

    #[test]
    fn rostered_players_excluded_and_filter_applied() {
        let out = compute_available(&qb_rb_universe(), &rostered(&["A"]), Some(Position::QB));
        let ids: Vec<&str> = out.iter().map(|p| p.native_id.as_str()).collect();
        assert_eq!(ids, vec!["B"]);
    }

    #[test]
    fn no_filter_returns_all_unrostered() {
        let out = compute_available(&qb_rb_universe(), &rostered(&["A"]), None);
        let ids: Vec<&str> = out.iter().map(|p| p.native_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[test]
    fn membership_matches_complement_exactly() {
        let uni = qb_rb_universe();
        let set = rostered(&["B"]);
        let out = compute_available(&uni, &set, None);
        for p in uni.iter() {
            let in_output = out.iter().any(|q| q.native_id == p.native_id);
            assert_eq!(in_output, !set.is_rostered(&p.native_id));
        }
    }

    #[test]
    fn sorted_by_position_priority_then_name() {
        let uni = PlayerUniverse::new(vec![
            player("1", "Zeke", Position::RB, None),
            player("2", "Aaron", Position::RB, None),
            player("3", "Kicker", Position::K, None),
            player("4", "Quincy", Position::QB, None),
            player("5", "Unknown Slot", Position::Flex, None),
        ])
        .unwrap();

        let out = compute_available(&uni, &ResolvedRosterSet::default(), None);
        let names: Vec<&str> = out.iter().map(|p| p.full_name.as_str()).collect();
        assert_eq!(names, vec!["Quincy", "Aaron", "Zeke", "Kicker", "Unknown Slot"]);
    }

    #[test]
    fn scoring_format_labels() {
        assert_eq!(ScoringFormat::from_label("PPR"), ScoringFormat::FullPpr);
        assert_eq!(ScoringFormat::from_label("half_ppr"), ScoringFormat::HalfPpr);
        assert_eq!(ScoringFormat::from_label("Standard"), ScoringFormat::Standard);
    }

    #[test]
    fn unrecognized_scoring_format_defaults_to_full_ppr() {
        assert_eq!(ScoringFormat::from_label("superflex-dynasty"), ScoringFormat::FullPpr);
        assert_eq!(ScoringFormat::from_label(""), ScoringFormat::FullPpr);
    }

    fn pts(ppr: f64, half: f64, std: f64) -> ProjectionPoints {
        ProjectionPoints {
            ppr,
            half_ppr: half,
            standard: std,
        }
    }

    #[test]
    fn rank_by_projection_sorts_desc_and_truncates() {
        let available = vec![
            player("n1", "Ten", Position::WR, None),
            player("n2", "TwentyTwo", Position::WR, None),
            player("n3", "Seven", Position::WR, None),
        ];
        let mut projections = HashMap::new();
        projections.insert("n1".to_string(), pts(10.5, 9.0, 8.0));
        projections.insert("n2".to_string(), pts(22.0, 20.0, 18.0));
        projections.insert("n3".to_string(), pts(7.0, 6.0, 5.0));

        let ranked = rank_by_projection(&available, &projections, ScoringFormat::FullPpr, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], ("n2".to_string(), 22.0));
        assert_eq!(ranked[1], ("n1".to_string(), 10.5));
    }

    #[test]
    fn players_without_projection_excluded_not_zero_filled() {
        let available = vec![
            player("n1", "Projected", Position::WR, None),
            player("n2", "Unprojected", Position::WR, None),
        ];
        let mut projections = HashMap::new();
        projections.insert("n1".to_string(), pts(1.0, 1.0, 1.0));

        let ranked = rank_by_projection(&available, &projections, ScoringFormat::FullPpr, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, "n1");
    }

    #[test]
    fn format_selects_point_field() {
        let available = vec![player("n1", "One", Position::WR, None)];
        let mut projections = HashMap::new();
        projections.insert("n1".to_string(), pts(10.0, 8.5, 7.0));

        let half = rank_by_projection(&available, &projections, ScoringFormat::HalfPpr, 1);
        assert_eq!(half[0].1, 8.5);
        let std = rank_by_projection(&available, &projections, ScoringFormat::Standard, 1);
        assert_eq!(std[0].1, 7.0);
    }

    #[test]
    fn ties_order_by_native_id() {
        let available = vec![
            player("n2", "B", Position::WR, None),
            player("n1", "A", Position::WR, None),
        ];
        let mut projections = HashMap::new();
        projections.insert("n1".to_string(), pts(5.0, 5.0, 5.0));
        projections.insert("n2".to_string(), pts(5.0, 5.0, 5.0));

        let ranked = rank_by_projection(&available, &projections, ScoringFormat::FullPpr, 10);
        assert_eq!(ranked[0].0, "n1");
        assert_eq!(ranked[1].0, "n2");
    }

    // -- Degrade-to-empty projections --

    struct FailingSource;

    #[async_trait]
    impl ProjectionsSource for FailingSource {
        async fn fetch_projections(
            &self,
            _week: u8,
            _year: u16,
        ) -> anyhow::Result<HashMap<String, ProjectionPoints>> {
            anyhow::bail!("projections service down")
        }
    }

    #[tokio::test]
    async fn failed_projections_fetch_degrades_to_empty() {
        let map = projections_or_empty(&FailingSource, 3, 2025).await;
        assert!(map.is_empty());
    }
}
