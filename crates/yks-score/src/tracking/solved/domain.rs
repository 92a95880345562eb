use std::fmt;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::UserId;
use crate::scoring::{compute_net, AnswerCount};

/// Turkey's offset from UTC, in seconds.
pub const TURKEY_UTC_OFFSET_SECONDS: i32 = 3 * 3600;
/// Local hour at which a new study day begins.
pub const STUDY_DAY_START_HOUR: u32 = 4;

const MAX_UTC_OFFSET_SECONDS: i32 = 18 * 3600;

/// Study days run from a local start hour to the same hour on the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyDay {
    utc_offset_seconds: i32,
    start_hour: u32,
}

impl StudyDay {
    /// `None` when the offset exceeds ±18h or the hour is not a valid hour of the day.
    pub fn new(utc_offset_seconds: i32, start_hour: u32) -> Option<Self> {
        if utc_offset_seconds.abs() > MAX_UTC_OFFSET_SECONDS || start_hour > 23 {
            return None;
        }
        Some(Self {
            utc_offset_seconds,
            start_hour,
        })
    }

    /// Instant at which the study day containing `now` began.
    pub fn start_of(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let offset = Duration::seconds(i64::from(self.utc_offset_seconds));
        let start = Duration::hours(i64::from(self.start_hour));

        let local = now.naive_utc() + offset;
        let day = (local - start).date();
        let local_start = day.and_time(NaiveTime::default()) + start;
        Utc.from_utc_datetime(&(local_start - offset))
    }
}

impl Default for StudyDay {
    fn default() -> Self {
        Self {
            utc_offset_seconds: TURKEY_UTC_OFFSET_SECONDS,
            start_hour: STUDY_DAY_START_HOUR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SolvedEntryId(pub String);

impl fmt::Display for SolvedEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Questions solved on one topic, as entered by the student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedSubmission {
    pub subject: String,
    pub topic: String,
    pub answers: AnswerCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedEntry {
    pub id: SolvedEntryId,
    pub user_id: UserId,
    pub subject: String,
    pub topic: String,
    pub answers: AnswerCount,
    pub solved_at: DateTime<Utc>,
}

/// Running counts over one or more solved entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolvedCounts {
    pub correct: u32,
    pub incorrect: u32,
    pub empty: u32,
    pub total: u32,
    pub net: f64,
}

impl SolvedCounts {
    pub fn from_answers(answers: &AnswerCount) -> Self {
        let mut counts = Self::default();
        counts.add(answers);
        counts
    }

    /// The net is taken over the summed counts, not summed per entry.
    pub fn add(&mut self, answers: &AnswerCount) {
        self.correct = self.correct.saturating_add(answers.correct);
        self.incorrect = self.incorrect.saturating_add(answers.incorrect);
        self.empty = self.empty.saturating_add(answers.unanswered);
        self.total = self.total.saturating_add(answers.answered_total());
        self.net = compute_net(self.correct, self.incorrect);
    }

    fn absorb(&mut self, other: &SolvedCounts) {
        self.add(&AnswerCount::new(other.correct, other.incorrect).with_unanswered(other.empty));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSolved {
    pub topic: String,
    pub entry_id: SolvedEntryId,
    pub solved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub counts: SolvedCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSolved {
    pub subject: String,
    pub label: String,
    pub topics: Vec<TopicSolved>,
    pub totals: SolvedCounts,
}

impl SubjectSolved {
    pub(crate) fn new(subject: String, label: String, topics: Vec<TopicSolved>) -> Self {
        let mut totals = SolvedCounts::default();
        for topic in &topics {
            totals.absorb(&topic.counts);
        }
        Self {
            subject,
            label,
            topics,
            totals,
        }
    }
}

/// What a student solved since the current study day began.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub day_started_at: DateTime<Utc>,
    pub subjects: Vec<SubjectSolved>,
    pub totals: SolvedCounts,
}

impl DailySummary {
    pub(crate) fn new(day_started_at: DateTime<Utc>, subjects: Vec<SubjectSolved>) -> Self {
        let mut totals = SolvedCounts::default();
        for subject in &subjects {
            totals.absorb(&subject.totals);
        }
        Self {
            day_started_at,
            subjects,
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, minute, second)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn study_day_starts_at_four_local_time() {
        let day = StudyDay::default();
        // 03:59:59 in Istanbul still belongs to the previous study day.
        assert_eq!(day.start_of(utc(10, 0, 59, 59)), utc(9, 1, 0, 0));
        assert_eq!(day.start_of(utc(10, 1, 0, 0)), utc(10, 1, 0, 0));
        assert_eq!(day.start_of(utc(10, 20, 30, 0)), utc(10, 1, 0, 0));
        // 23:30 UTC is 02:30 the next local day, still before the cutoff.
        assert_eq!(day.start_of(utc(10, 23, 30, 0)), utc(10, 1, 0, 0));
    }

    #[test]
    fn study_day_rejects_impossible_settings() {
        assert!(StudyDay::new(19 * 3600, 4).is_none());
        assert!(StudyDay::new(0, 24).is_none());
        let utc_midnight = StudyDay::new(0, 0).expect("valid study day");
        assert_eq!(utc_midnight.start_of(utc(10, 0, 0, 0)), utc(10, 0, 0, 0));
    }

    #[test]
    fn counts_take_the_net_over_summed_answers() {
        let mut counts = SolvedCounts::from_answers(&AnswerCount::new(2, 8).with_unanswered(1));
        assert_eq!(counts.net, 0.0);
        counts.add(&AnswerCount::new(10, 0));
        assert_eq!(counts.total, 21);
        assert_eq!(counts.empty, 1);
        assert_eq!(counts.net, 10.0);
    }
}
