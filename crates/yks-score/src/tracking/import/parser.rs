use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::NetImportError;
use crate::scoring::AnswerCount;
use crate::tracking::domain::{NetRecordSubmission, RecordSubject};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

pub(crate) fn parse_submissions<R: Read>(
    reader: R,
) -> Result<Vec<NetRecordSubmission>, NetImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut submissions = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let row: NetRow = record.deserialize(Some(&headers))?;
        submissions.push(row.into_submission(line)?);
    }

    Ok(submissions)
}

#[derive(Debug, Deserialize)]
struct NetRow {
    #[serde(rename = "Exam")]
    exam: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Stage")]
    stage: String,
    #[serde(rename = "Subject")]
    subject: String,
    #[serde(rename = "Correct")]
    correct: u32,
    #[serde(rename = "Incorrect")]
    incorrect: u32,
    #[serde(rename = "Unanswered", default, deserialize_with = "empty_as_zero")]
    unanswered: u32,
}

impl NetRow {
    fn into_submission(self, line: u64) -> Result<NetRecordSubmission, NetImportError> {
        let subject = RecordSubject::parse(&self.stage, &self.subject).map_err(|err| {
            NetImportError::Row {
                line,
                reason: err.to_string(),
            }
        })?;
        let taken_on = parse_exam_date(&self.date).ok_or_else(|| NetImportError::Row {
            line,
            reason: format!("unrecognised date '{}'", self.date),
        })?;

        Ok(NetRecordSubmission {
            subject,
            exam_name: self.exam,
            taken_on,
            answers: AnswerCount::new(self.correct, self.incorrect).with_unanswered(self.unanswered),
        })
    }
}

fn empty_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(0),
        Some(value) => value.parse().map_err(serde::de::Error::custom),
    }
}

/// Accepts ISO dates and the day-first dotted form used on Turkish exam reports.
pub fn parse_exam_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
