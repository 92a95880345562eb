use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerCount, ExamSubject, FirstStageAnswers, SecondStageAnswers};

/// Validation errors raised before a sheet reaches the estimator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SheetViolation {
    #[error("{subject} has {answered} answers but only {limit} questions")]
    TooManyAnswers {
        subject: &'static str,
        answered: u32,
        limit: u32,
    },
    #[error("diploma score must be between {min} and {max} (found {found})")]
    DiplomaOutOfRange { found: f64, min: f64, max: f64 },
}

/// Answer sheet as received from a form or API client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheetSubmission {
    #[serde(default)]
    pub first_stage: FirstStageAnswers,
    #[serde(default)]
    pub second_stage: SecondStageAnswers,
    #[serde(default)]
    pub diploma: Option<f64>,
}

/// Sheet that passed [`SheetGuard`] validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub first_stage: FirstStageAnswers,
    pub second_stage: SecondStageAnswers,
    pub diploma: Option<f64>,
}

const DEFAULT_DIPLOMA_MIN: f64 = 50.0;
const DEFAULT_DIPLOMA_MAX: f64 = 100.0;

/// Accepted diploma bounds.
#[derive(Debug, Clone)]
pub struct DiplomaPolicy {
    min: f64,
    max: f64,
}

impl DiplomaPolicy {
    pub fn new(min: f64, max: f64) -> Self {
        if min.is_finite() && max.is_finite() && min <= max {
            Self { min, max }
        } else {
            Self::default()
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl Default for DiplomaPolicy {
    fn default() -> Self {
        Self {
            min: DEFAULT_DIPLOMA_MIN,
            max: DEFAULT_DIPLOMA_MAX,
        }
    }
}

/// Guard responsible for producing [`ScoreSheet`] instances.
#[derive(Debug, Clone, Default)]
pub struct SheetGuard {
    diploma: DiplomaPolicy,
}

impl SheetGuard {
    pub fn with_policy(diploma: DiplomaPolicy) -> Self {
        Self { diploma }
    }

    pub fn sheet_from_submission(
        &self,
        submission: ScoreSheetSubmission,
    ) -> Result<ScoreSheet, SheetViolation> {
        check_answers(&submission.first_stage)?;
        check_answers(&submission.second_stage)?;

        // A zero diploma is how blank form fields arrive.
        let diploma = submission.diploma.filter(|value| *value != 0.0);
        if let Some(found) = diploma {
            let (min, max) = self.diploma.bounds();
            if !(min..=max).contains(&found) {
                return Err(SheetViolation::DiplomaOutOfRange { found, min, max });
            }
        }

        Ok(ScoreSheet {
            first_stage: submission.first_stage,
            second_stage: submission.second_stage,
            diploma,
        })
    }
}

pub(crate) fn check_answers<S: ExamSubject>(
    answers: &BTreeMap<S, AnswerCount>,
) -> Result<(), SheetViolation> {
    for (subject, counts) in answers {
        check_answer_count(*subject, counts)?;
    }
    Ok(())
}

pub(crate) fn check_answer_count<S: ExamSubject>(
    subject: S,
    counts: &AnswerCount,
) -> Result<(), SheetViolation> {
    let limit = subject.question_count();
    let answered = counts.answered_total();
    if answered > limit {
        return Err(SheetViolation::TooManyAnswers {
            subject: subject.key(),
            answered,
            limit,
        });
    }
    Ok(())
}
