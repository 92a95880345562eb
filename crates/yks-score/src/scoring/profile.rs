use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::domain::{FirstStageSubject, SecondStageSubject, Track};
use super::engine::rank::RankTable;

/// Coefficients, weights, and rank tables driving every score estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    pub first_stage: FirstStageProfile,
    /// Multiplier applied to the diploma score before it joins the placement score.
    pub diploma_factor: f64,
    /// Used when no second-stage answers were supplied.
    pub first_stage_ranks: RankTable,
    pub tracks: TrackProfiles,
}

/// Track-independent first-stage scoring constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstStageProfile {
    pub base_offset: f64,
    pub scaling: f64,
    pub coefficients: BTreeMap<FirstStageSubject, f64>,
}

impl FirstStageProfile {
    pub fn coefficient(&self, subject: FirstStageSubject) -> f64 {
        self.coefficients.get(&subject).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackProfile {
    pub base_offset: f64,
    pub first_stage_weight: f64,
    pub second_stage_weight: f64,
    pub second_stage_multiplier: f64,
    /// Subjects missing from the map do not count towards this track.
    pub coefficients: BTreeMap<SecondStageSubject, f64>,
    pub ranks: RankTable,
}

impl TrackProfile {
    pub fn coefficient(&self, subject: SecondStageSubject) -> f64 {
        self.coefficients.get(&subject).copied().unwrap_or(0.0)
    }
}

/// One profile per [`Track`], addressed by the enum rather than by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackProfiles {
    pub equal_weight: TrackProfile,
    pub quantitative: TrackProfile,
    pub verbal: TrackProfile,
}

impl TrackProfiles {
    pub fn get(&self, track: Track) -> &TrackProfile {
        match track {
            Track::EqualWeight => &self.equal_weight,
            Track::Quantitative => &self.quantitative,
            Track::Verbal => &self.verbal,
        }
    }
}

impl ScoringProfile {
    /// 2024 coefficients and rank anchors, built once per process.
    pub fn standard() -> &'static ScoringProfile {
        static STANDARD: OnceLock<ScoringProfile> = OnceLock::new();
        STANDARD.get_or_init(standard_profile)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let file = std::fs::File::open(path)?;
        let profile: ScoringProfile = serde_json::from_reader(std::io::BufReader::new(file))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ProfileError> {
        let profile: ScoringProfile = serde_json::from_str(raw)?;
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<(), ProfileError> {
        let mut constants = vec![
            ("first_stage.base_offset", self.first_stage.base_offset),
            ("first_stage.scaling", self.first_stage.scaling),
            ("diploma_factor", self.diploma_factor),
        ];
        for track in Track::ALL {
            let profile = self.tracks.get(track);
            constants.push((track.key(), profile.base_offset));
            constants.push((track.key(), profile.first_stage_weight));
            constants.push((track.key(), profile.second_stage_weight));
            constants.push((track.key(), profile.second_stage_multiplier));
            constants.extend(profile.coefficients.values().map(|value| (track.key(), *value)));
        }
        constants.extend(
            self.first_stage
                .coefficients
                .values()
                .map(|value| ("first_stage.coefficients", *value)),
        );

        match constants.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((field, _)) => Err(ProfileError::NonFinite(field)),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
pub enum ProfileError {
    Io(std::io::Error),
    Json(serde_json::Error),
    NonFinite(&'static str),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::Io(err) => write!(f, "failed to read scoring profile: {}", err),
            ProfileError::Json(err) => write!(f, "invalid scoring profile: {}", err),
            ProfileError::NonFinite(field) => {
                write!(f, "scoring profile field '{}' must be a finite number", field)
            }
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProfileError::Io(err) => Some(err),
            ProfileError::Json(err) => Some(err),
            ProfileError::NonFinite(_) => None,
        }
    }
}

impl From<std::io::Error> for ProfileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

const FIRST_STAGE_BASE_OFFSET: f64 = 100.0;
const FIRST_STAGE_SCALING: f64 = 1.0;
const DIPLOMA_FACTOR: f64 = 0.6;

// Second-stage results enter at 100 points weighted 0.6, hence the 60 point track offset.
const TRACK_BASE_OFFSET: f64 = 60.0;
const FIRST_STAGE_WEIGHT: f64 = 0.4;
const SECOND_STAGE_WEIGHT: f64 = 0.6;

fn standard_profile() -> ScoringProfile {
    use SecondStageSubject::*;

    ScoringProfile {
        first_stage: FirstStageProfile {
            base_offset: FIRST_STAGE_BASE_OFFSET,
            scaling: FIRST_STAGE_SCALING,
            coefficients: BTreeMap::from([
                (FirstStageSubject::Turkish, 3.87),
                (FirstStageSubject::SocialSciences, 3.48),
                (FirstStageSubject::BasicMathematics, 3.56),
                (FirstStageSubject::Science, 3.07),
            ]),
        },
        diploma_factor: DIPLOMA_FACTOR,
        first_stage_ranks: RankTable::from_sorted(&[
            (200.0, 2_300_000),
            (250.0, 1_500_000),
            (300.0, 700_000),
            (350.0, 300_000),
            (382.221, 251_993),
            (400.0, 100_000),
            (450.0, 20_000),
            (500.0, 1_000),
        ]),
        tracks: TrackProfiles {
            equal_weight: track_profile(
                &[
                    (Mathematics, 3.55),
                    (Literature, 3.07),
                    (History1, 2.91),
                    (Geography1, 3.12),
                ],
                &[
                    (200.0, 900_000),
                    (250.0, 500_000),
                    (300.0, 250_000),
                    (350.0, 120_000),
                    (365.295, 89_033),
                    (370.0, 85_000),
                    (400.0, 50_000),
                    (430.0, 20_000),
                    (450.0, 10_000),
                    (470.0, 3_000),
                    (500.0, 300),
                ],
            ),
            quantitative: track_profile(
                &[
                    (Mathematics, 3.55),
                    (Physics, 2.85),
                    (Chemistry, 3.07),
                    (Biology, 2.80),
                ],
                &[
                    (200.0, 1_000_000),
                    (250.0, 600_000),
                    (288.389, 306_803),
                    (300.0, 250_000),
                    (350.0, 120_000),
                    (370.0, 85_000),
                    (400.0, 50_000),
                    (430.0, 25_000),
                    (450.0, 15_000),
                    (470.0, 5_000),
                    (500.0, 500),
                ],
            ),
            verbal: track_profile(
                &[
                    (Literature, 3.07),
                    (History1, 2.91),
                    (Geography1, 3.12),
                    (History2, 2.77),
                    (Geography2, 2.41),
                    (Philosophy, 2.92),
                    (Religion, 3.33),
                ],
                &[
                    (200.0, 700_000),
                    (250.0, 400_000),
                    (300.0, 200_000),
                    (339.442, 178_973),
                    (350.0, 100_000),
                    (370.0, 55_000),
                    (400.0, 30_000),
                    (430.0, 15_000),
                    (450.0, 7_000),
                    (470.0, 2_000),
                    (500.0, 200),
                ],
            ),
        },
    }
}

fn track_profile(coefficients: &[(SecondStageSubject, f64)], anchors: &[(f64, u32)]) -> TrackProfile {
    TrackProfile {
        base_offset: TRACK_BASE_OFFSET,
        first_stage_weight: FIRST_STAGE_WEIGHT,
        second_stage_weight: SECOND_STAGE_WEIGHT,
        second_stage_multiplier: 1.0,
        coefficients: coefficients.iter().copied().collect(),
        ranks: RankTable::from_sorted(anchors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rank_tables_satisfy_table_invariants() {
        let profile = ScoringProfile::standard();
        RankTable::new(profile.first_stage_ranks.anchors().to_vec())
            .expect("first-stage table is sorted");
        for track in Track::ALL {
            RankTable::new(profile.tracks.get(track).ranks.anchors().to_vec())
                .unwrap_or_else(|err| panic!("{track} table invalid: {err}"));
        }
    }

    #[test]
    fn standard_profile_is_shared() {
        assert!(std::ptr::eq(ScoringProfile::standard(), ScoringProfile::standard()));
    }

    #[test]
    fn irrelevant_subjects_weigh_nothing() {
        let profile = ScoringProfile::standard();
        assert_eq!(
            profile.tracks.quantitative.coefficient(SecondStageSubject::Literature),
            0.0
        );
        assert_eq!(
            profile.tracks.verbal.coefficient(SecondStageSubject::Mathematics),
            0.0
        );
        assert_eq!(
            profile.tracks.equal_weight.coefficient(SecondStageSubject::Mathematics),
            3.55
        );
    }

    #[test]
    fn json_round_trip_preserves_profile() {
        let profile = ScoringProfile::standard();
        let raw = serde_json::to_string(profile).expect("profile serializes");
        let parsed = ScoringProfile::from_json_str(&raw).expect("profile parses");
        assert_eq!(&parsed, profile);
    }

    #[test]
    fn json_profiles_reject_non_monotone_tables() {
        let mut value = serde_json::to_value(ScoringProfile::standard()).expect("serializes");
        value["tracks"]["verbal"]["ranks"][1]["rank"] = serde_json::json!(9_000_000);
        let raw = value.to_string();

        match ScoringProfile::from_json_str(&raw) {
            Err(ProfileError::Json(err)) => assert!(err.to_string().contains("rank")),
            other => panic!("expected table validation failure, got {other:?}"),
        }
    }
}
