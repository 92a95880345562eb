use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{NetRecord, RecordId, RecordSubject};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetPoint {
    pub record_id: RecordId,
    pub exam_name: String,
    pub taken_on: NaiveDate,
    pub net: f64,
}

/// Net history of one subject, oldest exam first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProgress {
    pub subject: RecordSubject,
    pub label: String,
    pub points: Vec<NetPoint>,
    pub latest_net: f64,
    pub best_net: f64,
    pub average_net: f64,
}

/// Group records per subject and build each subject's chart series.
pub fn summarize(records: &[NetRecord]) -> Vec<SubjectProgress> {
    let mut grouped: BTreeMap<RecordSubject, Vec<NetPoint>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.subject).or_default().push(NetPoint {
            record_id: record.id.clone(),
            exam_name: record.exam_name.clone(),
            taken_on: record.taken_on,
            net: record.net(),
        });
    }

    grouped
        .into_iter()
        .filter_map(|(subject, mut points)| {
            points.sort_by(|a, b| {
                a.taken_on
                    .cmp(&b.taken_on)
                    .then_with(|| a.exam_name.cmp(&b.exam_name))
            });
            let latest_net = points.last()?.net;
            let best_net = points.iter().map(|point| point.net).fold(0.0, f64::max);
            let average_net =
                points.iter().map(|point| point.net).sum::<f64>() / points.len() as f64;

            Some(SubjectProgress {
                subject,
                label: subject.to_string(),
                points,
                latest_net,
                best_net,
                average_net,
            })
        })
        .collect()
}
