//! Completed session records.
//!
//! Sessions are immutable once created; the caller owns their storage and
//! hands the engine a snapshot of recent history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::types::{DifficultyTier, MuscleGroup};
use crate::generation::framework::Framework;

/// Unit of a round's target quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityUnit {
    #[default]
    Reps,
    Seconds,
}

impl QuantityUnit {
    pub fn label(&self) -> &'static str {
        match self {
            QuantityUnit::Reps => "reps",
            QuantityUnit::Seconds => "sec",
        }
    }
}

/// How a personal record is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrModality {
    Reps,
    Time,
    Load,
}

impl PrModality {
    pub fn label(&self) -> &'static str {
        match self {
            PrModality::Reps => "Reps",
            PrModality::Time => "Time",
            PrModality::Load => "Load",
        }
    }
}

impl std::fmt::Display for PrModality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One interval within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based minute/interval index
    pub index: u32,
    /// Exercise name
    pub exercise: String,
    /// Target muscle group
    pub muscle_group: MuscleGroup,
    /// Exercise difficulty
    pub difficulty: DifficultyTier,
    /// Target reps or seconds (at least 1)
    pub target: u32,
    /// Unit of `target` and `actual`
    #[serde(default)]
    pub unit: QuantityUnit,
    /// Reported reps or seconds
    #[serde(default)]
    pub actual: Option<u32>,
    /// Whether the round was skipped
    #[serde(default)]
    pub skipped: bool,
    /// Load used, if any
    #[serde(default)]
    pub load: Option<f64>,
    /// Marked as a deliberate PR attempt
    #[serde(default)]
    pub pr_attempt: Option<PrModality>,
}

impl Round {
    /// Create a planned round with no results.
    pub fn planned(
        index: u32,
        exercise: impl Into<String>,
        muscle_group: MuscleGroup,
        difficulty: DifficultyTier,
        target: u32,
        unit: QuantityUnit,
    ) -> Self {
        Self {
            index,
            exercise: exercise.into(),
            muscle_group,
            difficulty,
            target: target.max(1),
            unit,
            actual: None,
            skipped: false,
            load: None,
            pr_attempt: None,
        }
    }

    /// Record the achieved quantity.
    pub fn with_actual(mut self, actual: u32) -> Self {
        self.actual = Some(actual);
        self
    }

    /// Mark the round as skipped.
    pub fn skip(mut self) -> Self {
        self.skipped = true;
        self
    }

    /// Record the load used.
    pub fn with_load(mut self, load: f64) -> Self {
        self.load = Some(load);
        self
    }

    /// Actual/target ratio capped at `cap`.
    ///
    /// `None` for skipped rounds and rounds without a reported actual.
    pub fn hit_rate(&self, cap: f64) -> Option<f64> {
        if self.skipped {
            return None;
        }
        self.actual
            .map(|actual| (actual as f64 / self.target.max(1) as f64).min(cap))
    }

    /// Modality and value for record keeping: load, then time, then reps.
    pub fn record_value(&self) -> Option<(PrModality, f64)> {
        if self.skipped {
            return None;
        }
        if let Some(load) = self.load.filter(|l| *l > 0.0) {
            return Some((PrModality::Load, load));
        }
        let actual = self.actual.filter(|a| *a > 0)? as f64;
        match self.unit {
            QuantityUnit::Seconds => Some((PrModality::Time, actual)),
            QuantityUnit::Reps => Some((PrModality::Reps, actual)),
        }
    }
}

/// A completed (or abandoned) workout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Framework used
    pub framework: Framework,
    /// Planned duration in minutes
    pub duration_minutes: u32,
    /// Difficulty tag
    pub difficulty: DifficultyTier,
    /// Focus label
    #[serde(default)]
    pub focus: String,
    /// Reported perceived exertion (1-5)
    #[serde(default)]
    pub perceived_exertion: Option<u8>,
    /// Whether the session was finished
    #[serde(default)]
    pub completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Rounds in generation order
    #[serde(default)]
    pub rounds: Vec<Round>,
}

impl Session {
    /// Create an empty session.
    pub fn new(framework: Framework, difficulty: DifficultyTier, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            framework,
            duration_minutes: 0,
            difficulty,
            focus: String::new(),
            perceived_exertion: None,
            completed: false,
            created_at,
            rounds: Vec::new(),
        }
    }

    /// Set the rounds, renumbering them 1-based in order.
    pub fn with_rounds(mut self, rounds: Vec<Round>) -> Self {
        self.rounds = rounds
            .into_iter()
            .enumerate()
            .map(|(i, mut round)| {
                round.index = i as u32 + 1;
                round
            })
            .collect();
        self
    }

    /// Set the reported exertion (clamped to 1-5).
    pub fn with_exertion(mut self, rpe: u8) -> Self {
        self.perceived_exertion = Some(rpe.clamp(1, 5));
        self
    }

    /// Mark the session as completed.
    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Set the planned duration.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Reported exertion clamped into 1-5.
    pub fn rpe(&self) -> Option<f64> {
        self.perceived_exertion.map(|r| r.clamp(1, 5) as f64)
    }

    pub fn skipped_rounds(&self) -> usize {
        self.rounds.iter().filter(|r| r.skipped).count()
    }

    /// Share of rounds finished.
    ///
    /// Skipped rounds never count. In an abandoned session only rounds with
    /// a reported result count.
    pub fn completion_rate(&self) -> f64 {
        if self.rounds.is_empty() {
            return if self.completed { 1.0 } else { 0.0 };
        }
        let finished = self
            .rounds
            .iter()
            .filter(|r| !r.skipped && (self.completed || r.actual.is_some() || r.load.is_some()))
            .count();
        finished as f64 / self.rounds.len() as f64
    }

    /// Mean hit-rate over rounds with a sample.
    pub fn average_hit_rate(&self, cap: f64) -> Option<f64> {
        mean(self.rounds.iter().filter_map(|r| r.hit_rate(cap)))
    }
}

/// Up to `limit` sessions, newest first.
pub fn most_recent(sessions: &[Session], limit: usize) -> Vec<&Session> {
    let mut sorted: Vec<&Session> = sessions.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Arithmetic mean, `None` when empty.
pub fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
