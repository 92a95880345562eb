use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::UserId;
use crate::scoring::{AnswerCount, ExamSubject, FirstStageSubject, SecondStageSubject};

/// Months a practice-exam record stays visible after it was created.
pub const RECORD_RETENTION_MONTHS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStage {
    FirstStage,
    SecondStage,
}

impl ExamStage {
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstStage => "first_stage",
            Self::SecondStage => "second_stage",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstStage => "TYT",
            Self::SecondStage => "AYT",
        }
    }
}

impl FromStr for ExamStage {
    type Err = UnknownRecordSubject;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "first_stage" | "tyt" => Ok(Self::FirstStage),
            "second_stage" | "ayt" => Ok(Self::SecondStage),
            other => Err(UnknownRecordSubject::Stage(other.to_string())),
        }
    }
}

/// Subject a net record belongs to, qualified by its exam stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "stage", content = "subject", rename_all = "snake_case")]
pub enum RecordSubject {
    FirstStage(FirstStageSubject),
    SecondStage(SecondStageSubject),
}

impl RecordSubject {
    pub fn parse(stage: &str, subject: &str) -> Result<Self, UnknownRecordSubject> {
        let unknown = || UnknownRecordSubject::Subject(subject.trim().to_string());
        match stage.parse::<ExamStage>()? {
            ExamStage::FirstStage => subject
                .parse()
                .map(Self::FirstStage)
                .map_err(|_| unknown()),
            ExamStage::SecondStage => subject
                .parse()
                .map(Self::SecondStage)
                .map_err(|_| unknown()),
        }
    }

    pub fn stage(self) -> ExamStage {
        match self {
            Self::FirstStage(_) => ExamStage::FirstStage,
            Self::SecondStage(_) => ExamStage::SecondStage,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::FirstStage(subject) => subject.key(),
            Self::SecondStage(subject) => subject.key(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FirstStage(subject) => subject.label(),
            Self::SecondStage(subject) => subject.label(),
        }
    }

    pub fn question_count(self) -> u32 {
        match self {
            Self::FirstStage(subject) => subject.question_count(),
            Self::SecondStage(subject) => subject.question_count(),
        }
    }
}

impl fmt::Display for RecordSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.stage().label(), self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownRecordSubject {
    #[error("unknown exam stage '{0}' (expected TYT or AYT)")]
    Stage(String),
    #[error("unknown subject '{0}' for the given stage")]
    Subject(String),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One subject's result from a practice exam, as entered by the student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetRecordSubmission {
    pub subject: RecordSubject,
    pub exam_name: String,
    pub taken_on: NaiveDate,
    pub answers: AnswerCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetRecord {
    pub id: RecordId,
    pub user_id: UserId,
    pub subject: RecordSubject,
    pub exam_name: String,
    pub taken_on: NaiveDate,
    pub answers: AnswerCount,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NetRecord {
    pub fn net(&self) -> f64 {
        self.answers.net()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub(crate) fn expiry_for(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at
        .checked_add_months(Months::new(RECORD_RETENTION_MONTHS))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
