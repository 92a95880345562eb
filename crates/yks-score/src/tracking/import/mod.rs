mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::NetRecordSubmission;

pub use parser::parse_exam_date;

#[derive(Debug)]
pub enum NetImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, reason: String },
}

impl std::fmt::Display for NetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetImportError::Io(err) => write!(f, "failed to read net export: {}", err),
            NetImportError::Csv(err) => write!(f, "invalid net CSV data: {}", err),
            NetImportError::Row { line, reason } => {
                write!(f, "invalid net record on line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for NetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetImportError::Io(err) => Some(err),
            NetImportError::Csv(err) => Some(err),
            NetImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for NetImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for NetImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads `Exam,Date,Stage,Subject,Correct,Incorrect[,Unanswered]` exports into submissions.
pub struct NetRecordImporter;

impl NetRecordImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<NetRecordSubmission>, NetImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<NetRecordSubmission>, NetImportError> {
        parser::parse_submissions(reader)
    }
}
