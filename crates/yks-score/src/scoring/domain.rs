use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::engine::net::compute_net;

/// Shared surface of first- and second-stage subjects so answer maps can be validated generically.
pub trait ExamSubject: Copy + Ord + fmt::Debug {
    fn key(self) -> &'static str;
    fn label(self) -> &'static str;
    fn question_count(self) -> u32;
}

/// Sections of the common first-stage exam (TYT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstStageSubject {
    Turkish,
    SocialSciences,
    BasicMathematics,
    Science,
}

impl FirstStageSubject {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Turkish,
            Self::SocialSciences,
            Self::BasicMathematics,
            Self::Science,
        ]
    }
}

impl ExamSubject for FirstStageSubject {
    fn key(self) -> &'static str {
        match self {
            Self::Turkish => "turkish",
            Self::SocialSciences => "social_sciences",
            Self::BasicMathematics => "basic_mathematics",
            Self::Science => "science",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Turkish => "Türkçe",
            Self::SocialSciences => "Sosyal Bilimler",
            Self::BasicMathematics => "Temel Matematik",
            Self::Science => "Fen Bilimleri",
        }
    }

    fn question_count(self) -> u32 {
        match self {
            Self::Turkish | Self::BasicMathematics => 40,
            Self::SocialSciences | Self::Science => 20,
        }
    }
}

impl FromStr for FirstStageSubject {
    type Err = UnknownSubject;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|subject| subject.key() == normalized)
            .ok_or_else(|| UnknownSubject(value.to_string()))
    }
}

/// Sections of the track-specific second-stage exam (AYT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondStageSubject {
    Mathematics,
    Physics,
    Chemistry,
    Biology,
    Literature,
    #[serde(rename = "history_1")]
    History1,
    #[serde(rename = "geography_1")]
    Geography1,
    #[serde(rename = "history_2")]
    History2,
    #[serde(rename = "geography_2")]
    Geography2,
    Philosophy,
    Religion,
}

impl SecondStageSubject {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::Mathematics,
            Self::Physics,
            Self::Chemistry,
            Self::Biology,
            Self::Literature,
            Self::History1,
            Self::Geography1,
            Self::History2,
            Self::Geography2,
            Self::Philosophy,
            Self::Religion,
        ]
    }
}

impl ExamSubject for SecondStageSubject {
    fn key(self) -> &'static str {
        match self {
            Self::Mathematics => "mathematics",
            Self::Physics => "physics",
            Self::Chemistry => "chemistry",
            Self::Biology => "biology",
            Self::Literature => "literature",
            Self::History1 => "history_1",
            Self::Geography1 => "geography_1",
            Self::History2 => "history_2",
            Self::Geography2 => "geography_2",
            Self::Philosophy => "philosophy",
            Self::Religion => "religion",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Mathematics => "Matematik",
            Self::Physics => "Fizik",
            Self::Chemistry => "Kimya",
            Self::Biology => "Biyoloji",
            Self::Literature => "Türk Dili ve Edebiyatı",
            Self::History1 => "Tarih-1",
            Self::Geography1 => "Coğrafya-1",
            Self::History2 => "Tarih-2",
            Self::Geography2 => "Coğrafya-2",
            Self::Philosophy => "Felsefe Grubu",
            Self::Religion => "Din Kültürü",
        }
    }

    fn question_count(self) -> u32 {
        match self {
            Self::Mathematics => 40,
            Self::Literature => 24,
            Self::Physics => 14,
            Self::Chemistry | Self::Biology => 13,
            Self::Philosophy => 12,
            Self::History2 | Self::Geography2 => 11,
            Self::History1 => 10,
            Self::Geography1 | Self::Religion => 6,
        }
    }
}

impl FromStr for SecondStageSubject {
    type Err = UnknownSubject;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|subject| subject.key() == normalized)
            .ok_or_else(|| UnknownSubject(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subject '{0}'")]
pub struct UnknownSubject(pub String);

/// Raw answer counts for one exam section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerCount {
    pub correct: u32,
    pub incorrect: u32,
    /// Collected for display only; never part of the net.
    #[serde(default)]
    pub unanswered: u32,
}

impl AnswerCount {
    pub const fn new(correct: u32, incorrect: u32) -> Self {
        Self {
            correct,
            incorrect,
            unanswered: 0,
        }
    }

    pub const fn with_unanswered(mut self, unanswered: u32) -> Self {
        self.unanswered = unanswered;
        self
    }

    pub fn answered_total(&self) -> u32 {
        self.correct
            .saturating_add(self.incorrect)
            .saturating_add(self.unanswered)
    }

    pub fn net(&self) -> f64 {
        compute_net(self.correct, self.incorrect)
    }
}

/// Parses `correct/incorrect` or `correct/incorrect/unanswered`.
impl FromStr for AnswerCount {
    type Err = InvalidAnswerCount;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value
            .split('/')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| InvalidAnswerCount(value.to_string()))?;

        match parts.as_slice() {
            [correct, incorrect] => Ok(Self::new(*correct, *incorrect)),
            [correct, incorrect, unanswered] => {
                Ok(Self::new(*correct, *incorrect).with_unanswered(*unanswered))
            }
            _ => Err(InvalidAnswerCount(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a correct/incorrect[/unanswered] triple")]
pub struct InvalidAnswerCount(pub String);

pub type FirstStageAnswers = BTreeMap<FirstStageSubject, AnswerCount>;
pub type SecondStageAnswers = BTreeMap<SecondStageSubject, AnswerCount>;

/// Scoring profile a placement score is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    EqualWeight,
    Quantitative,
    Verbal,
}

impl Track {
    pub const ALL: [Track; 3] = [Track::EqualWeight, Track::Quantitative, Track::Verbal];

    pub const fn key(self) -> &'static str {
        match self {
            Self::EqualWeight => "equal_weight",
            Self::Quantitative => "quantitative",
            Self::Verbal => "verbal",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::EqualWeight => "EA",
            Self::Quantitative => "SAY",
            Self::Verbal => "SÖZ",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Track {
    type Err = UnknownTrack;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "equal_weight" | "ea" => Ok(Self::EqualWeight),
            "quantitative" | "say" => Ok(Self::Quantitative),
            "verbal" | "soz" | "söz" => Ok(Self::Verbal),
            _ => Err(UnknownTrack(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown track '{0}' (expected equal_weight, quantitative, verbal, or all)")]
pub struct UnknownTrack(pub String);

/// Either one track or every track at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TrackSelection {
    Single(Track),
    #[default]
    All,
}

impl TrackSelection {
    pub fn tracks(self) -> Vec<Track> {
        match self {
            Self::Single(track) => vec![track],
            Self::All => Track::ALL.to_vec(),
        }
    }
}

impl FromStr for TrackSelection {
    type Err = UnknownTrack;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "all" | "hepsi" => Ok(Self::All),
            other => other.parse().map(Self::Single),
        }
    }
}

impl TryFrom<String> for TrackSelection {
    type Error = UnknownTrack;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TrackSelection> for String {
    fn from(value: TrackSelection) -> Self {
        match value {
            TrackSelection::Single(track) => track.key().to_string(),
            TrackSelection::All => "all".to_string(),
        }
    }
}

/// Whether a composite score used the track weighting or fell back to first-stage data only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    FirstStageOnly,
    TrackWeighted,
}

/// Scores produced for one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub track: Track,
    pub basis: ScoreBasis,
    pub first_stage_score: f64,
    pub second_stage_score: f64,
    /// Composite before the diploma contribution.
    pub raw_score: f64,
    pub placement_score: f64,
}

/// Per-subject nets, shared by every track of one estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetBreakdown {
    pub first_stage: BTreeMap<FirstStageSubject, f64>,
    pub second_stage: BTreeMap<SecondStageSubject, f64>,
}

impl NetBreakdown {
    pub fn from_answers(first_stage: &FirstStageAnswers, second_stage: &SecondStageAnswers) -> Self {
        Self {
            first_stage: first_stage
                .iter()
                .map(|(subject, answers)| (*subject, answers.net()))
                .collect(),
            second_stage: second_stage
                .iter()
                .map(|(subject, answers)| (*subject, answers.net()))
                .collect(),
        }
    }

    pub fn first_stage_total(&self) -> f64 {
        self.first_stage.values().sum()
    }

    pub fn second_stage_total(&self) -> f64 {
        self.second_stage.values().sum()
    }
}
