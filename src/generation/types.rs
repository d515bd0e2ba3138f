//! Generation request and workout output types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::framework::Framework;
use crate::catalog::types::{DifficultyTier, MuscleGroup};
use crate::session::types::{PrModality, QuantityUnit, Round, Session};

/// Inclusive duration bounds in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: u32,
    pub max: u32,
}

impl DurationRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Overlap of two ranges, `None` when disjoint.
    pub fn intersect(&self, other: &DurationRange) -> Option<DurationRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(DurationRange { min, max })
    }

    pub fn clamp(&self, minutes: u32) -> u32 {
        minutes.clamp(self.min, self.max.max(self.min))
    }

    pub fn contains(&self, minutes: u32) -> bool {
        (self.min..=self.max).contains(&minutes)
    }
}

/// Self-reported energy for today's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl EnergyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            EnergyLevel::Low => "Low",
            EnergyLevel::Moderate => "Moderate",
            EnergyLevel::High => "High",
        }
    }
}

/// What the user asked for today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionIntent {
    /// Free text scanned for keyword nudges
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub energy: EnergyLevel,
    /// Explicit focus label
    #[serde(default)]
    pub focus: Option<String>,
}

impl SessionIntent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_energy(mut self, energy: EnergyLevel) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }
}

/// Input to [`super::engine::WorkoutGenerator::generate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Framework to build; chosen from preferences when absent
    #[serde(default)]
    pub framework: Option<Framework>,
    #[serde(default)]
    pub intent: SessionIntent,
    /// Caller-imposed duration bounds
    #[serde(default)]
    pub duration_range: Option<DurationRange>,
    /// Progressive-overload bumps keyed by exercise name
    #[serde(default)]
    pub overloads: BTreeMap<String, OverloadBump>,
    /// Reference time for recovery and streak decay
    #[serde(default = "Utc::now")]
    pub now: DateTime<Utc>,
}

impl GenerationRequest {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            framework: None,
            intent: SessionIntent::default(),
            duration_range: None,
            overloads: BTreeMap::new(),
            now,
        }
    }

    pub fn with_framework(mut self, framework: Framework) -> Self {
        self.framework = Some(framework);
        self
    }

    pub fn with_intent(mut self, intent: SessionIntent) -> Self {
        self.intent = intent;
        self
    }

    pub fn with_duration_range(mut self, min: u32, max: u32) -> Self {
        self.duration_range = Some(DurationRange::new(min, max));
        self
    }

    pub fn with_overloads(mut self, overloads: BTreeMap<String, OverloadBump>) -> Self {
        self.overloads = overloads;
        self
    }

    /// Overload bump for an exercise (name matched case-insensitively).
    pub fn overload(&self, exercise: &str) -> Option<OverloadBump> {
        self.overloads.get(exercise).copied().or_else(|| {
            self.overloads
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(exercise))
                .map(|(_, bump)| *bump)
        })
    }
}

/// Relative target growth for an exercise that keeps overperforming.
///
/// Applied to the fully planned target, so framework scaling, intensity,
/// energy and streak easing only ever act on the tier base once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverloadBump {
    pub unit: QuantityUnit,
    /// Recommended target over the previous target
    pub factor: f64,
}

impl OverloadBump {
    /// Raise a planned quantity by the factor, by at least one unit.
    pub fn apply(&self, planned: u32) -> u32 {
        let scaled = (planned as f64 * self.factor.max(1.0)).round() as u32;
        scaled.max(planned + 1)
    }
}

/// One planned interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRound {
    /// 1-based interval index
    pub index: u32,
    pub exercise: String,
    pub muscle_group: MuscleGroup,
    pub difficulty: DifficultyTier,
    /// Target reps or seconds (at least 1)
    pub target: u32,
    pub unit: QuantityUnit,
    /// Work window in seconds, when timed
    pub work_seconds: Option<u32>,
    /// Rest after the work window, when timed
    pub rest_seconds: Option<u32>,
    /// 1-based circuit round for repeated circuits
    pub circuit_round: Option<u32>,
    pub alternates_sides: bool,
    /// Marked as a deliberate PR attempt
    pub pr_attempt: Option<PrModality>,
}

/// Why the engine decided what it did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rationale {
    pub framework: String,
    pub intensity: String,
    pub exercise_selection: String,
}

/// A generated workout plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub framework: Framework,
    pub duration_minutes: u32,
    pub difficulty: DifficultyTier,
    pub focus: String,
    pub rounds: Vec<WorkoutRound>,
    /// Rounds per muscle group
    pub muscle_load: BTreeMap<MuscleGroup, u32>,
    pub rationale: Rationale,
    pub generated_at: DateTime<Utc>,
}

impl Workout {
    /// Distinct exercises in first-use order.
    pub fn exercise_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for round in &self.rounds {
            if !names.contains(&round.exercise.as_str()) {
                names.push(&round.exercise);
            }
        }
        names
    }

    pub fn pr_attempts(&self) -> impl Iterator<Item = &WorkoutRound> {
        self.rounds.iter().filter(|r| r.pr_attempt.is_some())
    }

    /// Session skeleton with planned targets and no results.
    pub fn to_session(&self) -> Session {
        let rounds = self
            .rounds
            .iter()
            .map(|planned| {
                let mut round = Round::planned(
                    planned.index,
                    planned.exercise.clone(),
                    planned.muscle_group,
                    planned.difficulty,
                    planned.target,
                    planned.unit,
                );
                round.pr_attempt = planned.pr_attempt;
                round
            })
            .collect();

        let mut session = Session::new(self.framework, self.difficulty, self.generated_at)
            .with_duration(self.duration_minutes)
            .with_rounds(rounds);
        session.id = self.id;
        session.focus = self.focus.clone();
        session
    }
}

/// Count rounds per muscle group.
pub fn muscle_load(rounds: &[WorkoutRound]) -> BTreeMap<MuscleGroup, u32> {
    let mut load = BTreeMap::new();
    for round in rounds {
        *load.entry(round.muscle_group).or_insert(0) += 1;
    }
    load
}
