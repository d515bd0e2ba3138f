//! Personal-record detection and the PR-attempt readiness gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::RecordsConfig;
use crate::session::types::{PrModality, Session};
use crate::signals::insights::PersonalizationInsights;

const EPSILON: f64 = 1e-9;

/// Best observed value for an (exercise, modality) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub exercise: String,
    pub modality: PrModality,
    pub value: f64,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub round_index: Option<u32>,
    pub achieved_at: DateTime<Utc>,
}

type RecordKey = (String, PrModality);

fn key(exercise: &str, modality: PrModality) -> RecordKey {
    (exercise.to_lowercase(), modality)
}

/// Records keyed by (exercise, modality). Serialized as a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PersonalRecord>", into = "Vec<PersonalRecord>")]
pub struct PersonalRecordBook {
    records: BTreeMap<RecordKey, PersonalRecord>,
}

impl From<Vec<PersonalRecord>> for PersonalRecordBook {
    fn from(records: Vec<PersonalRecord>) -> Self {
        let mut book = Self::default();
        for record in records {
            let better = book
                .get(&record.exercise, record.modality)
                .map_or(true, |existing| record.value > existing.value);
            if better {
                book.insert(record);
            }
        }
        book
    }
}

impl From<PersonalRecordBook> for Vec<PersonalRecord> {
    fn from(book: PersonalRecordBook) -> Self {
        book.records.into_values().collect()
    }
}

impl PersonalRecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for an exercise (case-insensitive) and modality.
    pub fn get(&self, exercise: &str, modality: PrModality) -> Option<&PersonalRecord> {
        self.records.get(&key(exercise, modality))
    }

    /// Insert or overwrite a record.
    pub fn insert(&mut self, record: PersonalRecord) {
        self.records.insert(key(&record.exercise, record.modality), record);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonalRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Store every new record from a detection.
    pub fn apply(&mut self, detection: &PrDetection) {
        for new in &detection.new_records {
            self.insert(new.record.clone());
        }
    }
}

/// A value that beat (or set) a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub record: PersonalRecord,
    /// `None` for a first qualifying value
    pub previous_value: Option<f64>,
}

/// A value close to, but not above, the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMiss {
    pub exercise: String,
    pub modality: PrModality,
    pub value: f64,
    pub record_value: f64,
}

/// Outcome of comparing one session against the record book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrDetection {
    pub new_records: Vec<NewRecord>,
    pub near_misses: Vec<NearMiss>,
}

impl PrDetection {
    pub fn is_empty(&self) -> bool {
        self.new_records.is_empty() && self.near_misses.is_empty()
    }
}

/// Whether the engine may schedule a PR attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrReadiness {
    pub ready: bool,
    pub hours_since_last: Option<f64>,
    /// Failed conditions, empty when ready
    pub blockers: Vec<String>,
}

/// Compares sessions to records and gates PR attempts.
#[derive(Debug, Clone, Default)]
pub struct RecordDetector {
    config: RecordsConfig,
}

impl RecordDetector {
    pub fn new(config: RecordsConfig) -> Self {
        Self { config }
    }

    /// Detect new records and near misses in one session.
    ///
    /// Each (exercise, modality) contributes only its best value.
    pub fn detect(&self, session: &Session, book: &PersonalRecordBook) -> PrDetection {
        let mut best: BTreeMap<RecordKey, (String, f64, u32)> = BTreeMap::new();
        for round in &session.rounds {
            let Some((modality, value)) = round.record_value() else {
                continue;
            };
            let entry = best
                .entry(key(&round.exercise, modality))
                .or_insert_with(|| (round.exercise.clone(), value, round.index));
            if value > entry.1 {
                *entry = (round.exercise.clone(), value, round.index);
            }
        }

        let mut detection = PrDetection::default();
        for ((_, modality), (exercise, value, round_index)) in best {
            match book.get(&exercise, modality) {
                Some(existing) if value > existing.value + EPSILON => {
                    detection.new_records.push(NewRecord {
                        record: self.record(session, &exercise, modality, value, round_index),
                        previous_value: Some(existing.value),
                    });
                }
                Some(existing) if value + EPSILON >= existing.value * self.config.near_miss_ratio => {
                    detection.near_misses.push(NearMiss {
                        exercise,
                        modality,
                        value,
                        record_value: existing.value,
                    });
                }
                Some(_) => {}
                None => {
                    detection.new_records.push(NewRecord {
                        record: self.record(session, &exercise, modality, value, round_index),
                        previous_value: None,
                    });
                }
            }
        }

        if !detection.is_empty() {
            tracing::info!(
                "Session {}: {} new records, {} near misses",
                session.id,
                detection.new_records.len(),
                detection.near_misses.len()
            );
        }
        detection
    }

    fn record(
        &self,
        session: &Session,
        exercise: &str,
        modality: PrModality,
        value: f64,
        round_index: u32,
    ) -> PersonalRecord {
        PersonalRecord {
            exercise: exercise.to_string(),
            modality,
            value,
            session_id: Some(session.id),
            round_index: Some(round_index),
            achieved_at: session.created_at,
        }
    }

    /// Readiness gate for scheduling a PR attempt.
    pub fn readiness(&self, insights: &PersonalizationInsights, now: DateTime<Utc>) -> PrReadiness {
        let hours_since_last = insights.hours_since_last_session(now);
        let mut blockers = Vec::new();

        if let Some(hours) = hours_since_last {
            if hours < self.config.min_rest_hours {
                blockers.push(format!("only {:.0}h since last session", hours));
            }
        }
        if insights.fatigue_trend >= self.config.max_fatigue {
            blockers.push(format!("fatigue trend {:.2}", insights.fatigue_trend));
        }
        if insights.skip_rate >= self.config.max_skip_rate {
            blockers.push(format!("skip rate {:.0}%", insights.skip_rate * 100.0));
        }
        if insights.average_rpe > self.config.max_rpe {
            blockers.push(format!("average RPE {:.1}", insights.average_rpe));
        }

        PrReadiness {
            ready: blockers.is_empty(),
            hours_since_last,
            blockers,
        }
    }

    /// Whether a recent best is within the opportunity threshold of the record.
    pub fn is_close(&self, recent_best: f64, record: &PersonalRecord) -> bool {
        record.value > 0.0 && recent_best + EPSILON >= record.value * self.config.close_ratio
    }

    pub fn first_attempt_index(&self) -> u32 {
        self.config.first_attempt_index
    }
}

/// Best value per (exercise, modality) across sessions, keyed by lowercase name.
pub fn recent_bests(sessions: &[&Session]) -> BTreeMap<(String, PrModality), f64> {
    let mut bests: BTreeMap<(String, PrModality), f64> = BTreeMap::new();
    for round in sessions.iter().flat_map(|s| s.rounds.iter()) {
        if let Some((modality, value)) = round.record_value() {
            let entry = bests.entry(key(&round.exercise, modality)).or_insert(value);
            *entry = entry.max(value);
        }
    }
    bests
}
