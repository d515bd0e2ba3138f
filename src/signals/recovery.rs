//! Per-muscle-group recovery decay.
//!
//! Records store when a muscle was last worked and how hard; the recovery
//! score itself is recomputed from elapsed time on every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::types::MuscleGroup;
use crate::config::RecoveryConfig;
use crate::session::types::Session;

/// Last time a muscle group was worked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryRecord {
    pub muscle_group: MuscleGroup,
    pub last_worked: DateTime<Utc>,
    /// Intensity of that session (0-1)
    pub intensity: f64,
}

/// A record with its recovery score at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryStatus {
    #[serde(flatten)]
    pub record: RecoveryRecord,
    pub recovery: f64,
}

/// Intensity of a session from RPE, difficulty and completion.
pub fn workout_intensity(session: &Session, config: &RecoveryConfig) -> f64 {
    let rpe = session.rpe().unwrap_or(3.0);
    let rpe_component = ((rpe - 1.0) / 4.0).clamp(0.0, 1.0);
    let difficulty_component = config.difficulty_intensity.get(session.difficulty);
    let completion = session.completion_rate();

    (rpe_component * config.rpe_weight
        + difficulty_component * config.difficulty_weight
        + completion * config.completion_weight)
        .clamp(0.0, 1.0)
}

/// Recovery state for every muscle group seen in history.
#[derive(Debug, Clone, Default)]
pub struct RecoveryModel {
    config: RecoveryConfig,
    records: BTreeMap<MuscleGroup, RecoveryRecord>,
}

impl RecoveryModel {
    pub fn new(config: RecoveryConfig) -> Self {
        Self {
            config,
            records: BTreeMap::new(),
        }
    }

    /// Build records from session history.
    pub fn from_sessions(sessions: &[Session], config: RecoveryConfig) -> Self {
        let mut model = Self::new(config);
        for session in sessions {
            model.record_session(session);
        }
        model
    }

    /// Fold one session into the records.
    ///
    /// A muscle's record only moves forward in time.
    pub fn record_session(&mut self, session: &Session) {
        let intensity = workout_intensity(session, &self.config);
        for round in session.rounds.iter().filter(|r| !r.skipped) {
            let newer = self
                .records
                .get(&round.muscle_group)
                .map_or(true, |existing| session.created_at > existing.last_worked);
            if newer {
                self.records.insert(
                    round.muscle_group,
                    RecoveryRecord {
                        muscle_group: round.muscle_group,
                        last_worked: session.created_at,
                        intensity,
                    },
                );
            }
        }
    }

    /// Insert a stored record directly.
    pub fn insert(&mut self, record: RecoveryRecord) {
        self.records.insert(record.muscle_group, record);
    }

    pub fn records(&self) -> impl Iterator<Item = &RecoveryRecord> {
        self.records.values()
    }

    pub fn base_hours(&self, group: MuscleGroup) -> f64 {
        if group.is_conditioning_group() {
            self.config.conditioning_base_hours
        } else if group.is_major_strength_group() {
            self.config.major_base_hours
        } else {
            self.config.default_base_hours
        }
    }

    /// Recovery in `[0, 1]` after `hours` for a session of `intensity`.
    pub fn recovery_after(&self, group: MuscleGroup, hours: f64, intensity: f64) -> f64 {
        let multiplier = self.config.intensity_floor + intensity.clamp(0.0, 1.0) * self.config.intensity_span;
        let needed = self.base_hours(group) * multiplier;
        if needed <= 0.0 {
            return 1.0;
        }
        (hours.max(0.0) / needed).clamp(0.0, 1.0)
    }

    /// Current recovery for a muscle group; 1.0 when never worked.
    pub fn recovery(&self, group: MuscleGroup, now: DateTime<Utc>) -> f64 {
        match self.records.get(&group) {
            Some(record) => {
                let hours = (now - record.last_worked).num_seconds().max(0) as f64 / 3600.0;
                self.recovery_after(group, hours, record.intensity)
            }
            None => 1.0,
        }
    }

    /// Stored records with their recovery at `now`.
    pub fn statuses(&self, now: DateTime<Utc>) -> Vec<RecoveryStatus> {
        self.records
            .values()
            .map(|record| RecoveryStatus {
                record: *record,
                recovery: self.recovery(record.muscle_group, now),
            })
            .collect()
    }

    /// Recovery for every recorded muscle group.
    pub fn snapshot(&self, now: DateTime<Utc>) -> BTreeMap<MuscleGroup, f64> {
        self.records
            .keys()
            .map(|group| (*group, self.recovery(*group, now)))
            .collect()
    }
}
