use serde::{Deserialize, Serialize};

use crate::scoring::domain::{CompositeScore, ScoreBasis, Track};
use crate::scoring::profile::ScoringProfile;

/// Best rank an above-table score may claim.
pub const OPTIMISTIC_RANK_FLOOR: u32 = 100;

/// One historical (score, rank) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankAnchor {
    pub score: f64,
    pub rank: u32,
}

impl RankAnchor {
    pub const fn new(score: f64, rank: u32) -> Self {
        Self { score, rank }
    }
}

/// Anchors sorted by strictly increasing score with non-increasing, positive ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RankAnchor>", into = "Vec<RankAnchor>")]
pub struct RankTable {
    anchors: Vec<RankAnchor>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankTableError {
    #[error("rank table has no anchors")]
    Empty,
    #[error("anchor {index} has a non-finite score")]
    NonFiniteScore { index: usize },
    #[error("anchor {index} has rank 0; ranks start at 1")]
    ZeroRank { index: usize },
    #[error("anchor {index} score {score} does not increase past {previous}")]
    UnsortedScore { index: usize, score: f64, previous: f64 },
    #[error("anchor {index} rank {rank} is worse than the lower-score rank {previous}")]
    RankIncreases { index: usize, rank: u32, previous: u32 },
}

impl RankTable {
    pub fn new(anchors: Vec<RankAnchor>) -> Result<Self, RankTableError> {
        if anchors.is_empty() {
            return Err(RankTableError::Empty);
        }

        for (index, anchor) in anchors.iter().enumerate() {
            if !anchor.score.is_finite() {
                return Err(RankTableError::NonFiniteScore { index });
            }
            if anchor.rank == 0 {
                return Err(RankTableError::ZeroRank { index });
            }
        }

        for (offset, pair) in anchors.windows(2).enumerate() {
            let (previous, current) = (pair[0], pair[1]);
            let index = offset + 1;
            if current.score <= previous.score {
                return Err(RankTableError::UnsortedScore {
                    index,
                    score: current.score,
                    previous: previous.score,
                });
            }
            if current.rank > previous.rank {
                return Err(RankTableError::RankIncreases {
                    index,
                    rank: current.rank,
                    previous: previous.rank,
                });
            }
        }

        Ok(Self { anchors })
    }

    /// Seeded tables are checked by the profile tests instead of at runtime.
    pub(crate) fn from_sorted(anchors: &[(f64, u32)]) -> Self {
        Self {
            anchors: anchors
                .iter()
                .map(|(score, rank)| RankAnchor::new(*score, *rank))
                .collect(),
        }
    }

    pub fn anchors(&self) -> &[RankAnchor] {
        &self.anchors
    }

    /// Piecewise-linear rank estimate; never fails.
    ///
    /// Scores at or below the first anchor take its rank, scores above the last anchor take
    /// half its rank (but never better than [`OPTIMISTIC_RANK_FLOOR`]), and scores in between
    /// interpolate linearly between the bracketing anchors, rounding half away from zero.
    pub fn estimate(&self, score: f64) -> u32 {
        let (Some(first), Some(last)) = (self.anchors.first(), self.anchors.last()) else {
            return OPTIMISTIC_RANK_FLOOR;
        };

        if score.is_nan() || score <= first.score {
            return first.rank;
        }
        if score > last.score {
            return (last.rank / 2).max(OPTIMISTIC_RANK_FLOOR);
        }

        for pair in self.anchors.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if score <= hi.score {
                let ratio = (score - lo.score) / (hi.score - lo.score);
                let lo_rank = f64::from(lo.rank);
                let hi_rank = f64::from(hi.rank);
                return (lo_rank - ratio * (lo_rank - hi_rank)).round() as u32;
            }
        }

        last.rank
    }
}

impl TryFrom<Vec<RankAnchor>> for RankTable {
    type Error = RankTableError;

    fn try_from(value: Vec<RankAnchor>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RankTable> for Vec<RankAnchor> {
    fn from(value: RankTable) -> Self {
        value.anchors
    }
}

/// Rank for a track's weighted placement score.
pub fn estimate_rank(profile: &ScoringProfile, track: Track, placement_score: f64) -> u32 {
    profile.tracks.get(track).ranks.estimate(placement_score)
}

/// Rank against the table matching how the composite was produced.
pub fn rank_for(profile: &ScoringProfile, composite: &CompositeScore) -> u32 {
    let table = match composite.basis {
        ScoreBasis::FirstStageOnly => &profile.first_stage_ranks,
        ScoreBasis::TrackWeighted => &profile.tracks.get(composite.track).ranks,
    };
    table.estimate(composite.placement_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RankTable {
        RankTable::new(vec![
            RankAnchor::new(200.0, 1_000_000),
            RankAnchor::new(300.0, 250_000),
            RankAnchor::new(400.0, 50_000),
            RankAnchor::new(500.0, 500),
        ])
        .expect("valid table")
    }

    #[test]
    fn below_table_scores_take_the_worst_rank() {
        assert_eq!(table().estimate(120.0), 1_000_000);
        assert_eq!(table().estimate(200.0), 1_000_000);
        assert_eq!(table().estimate(f64::NAN), 1_000_000);
    }

    #[test]
    fn above_table_scores_halve_the_best_rank_with_floor() {
        assert_eq!(table().estimate(520.0), 250);

        let elite = RankTable::new(vec![
            RankAnchor::new(400.0, 5_000),
            RankAnchor::new(500.0, 150),
        ])
        .expect("valid table");
        assert_eq!(elite.estimate(560.0), OPTIMISTIC_RANK_FLOOR);
    }

    #[test]
    fn anchors_return_their_exact_rank() {
        let table = table();
        for anchor in table.anchors() {
            assert_eq!(table.estimate(anchor.score), anchor.rank);
        }
    }

    #[test]
    fn interpolates_linearly_between_anchors() {
        assert_eq!(table().estimate(250.0), 625_000);
        assert_eq!(table().estimate(350.0), 150_000);
        // 400 + 0.25 * 100 => 50_000 - 0.25 * 49_500
        assert_eq!(table().estimate(425.0), 37_625);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let table = RankTable::new(vec![RankAnchor::new(0.0, 11), RankAnchor::new(4.0, 10)])
            .expect("valid table");
        // 11 - 0.5 = 10.5 rounds up to 11
        assert_eq!(table.estimate(2.0), 11);
    }

    #[test]
    fn rejects_unsorted_or_inverted_tables() {
        assert_eq!(RankTable::new(Vec::new()), Err(RankTableError::Empty));
        assert!(matches!(
            RankTable::new(vec![RankAnchor::new(300.0, 10), RankAnchor::new(200.0, 5)]),
            Err(RankTableError::UnsortedScore { index: 1, .. })
        ));
        assert!(matches!(
            RankTable::new(vec![RankAnchor::new(200.0, 10), RankAnchor::new(300.0, 50)]),
            Err(RankTableError::RankIncreases { index: 1, .. })
        ));
        assert!(matches!(
            RankTable::new(vec![RankAnchor::new(200.0, 0)]),
            Err(RankTableError::ZeroRank { index: 0 })
        ));
    }

    #[test]
    fn deserialization_validates_anchors() {
        let parsed: Result<RankTable, _> =
            serde_json::from_str(r#"[{"score": 300.0, "rank": 5}, {"score": 200.0, "rank": 9}]"#);
        assert!(parsed.is_err());

        let parsed: RankTable =
            serde_json::from_str(r#"[{"score": 200.0, "rank": 9}, {"score": 300.0, "rank": 5}]"#)
                .expect("sorted table parses");
        assert_eq!(parsed.anchors().len(), 2);
    }
}
