//! User training profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::goals::{Goal, GoalWeights};
use crate::catalog::types::{DifficultyTier, Equipment};

/// Skill score assigned at onboarding when nothing else is known.
pub const DEFAULT_SKILL_SCORE: f64 = 40.0;

/// A user's profile as supplied by the caller.
///
/// Missing equipment or goal fields are treated as "no preference". The
/// skill score is clamped and the tier label re-derived on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoredProfile")]
pub struct Profile {
    /// Unique identifier
    pub id: Uuid,
    /// Continuous ability estimate (0-100)
    pub skill_score: f64,
    /// Tier label derived from the skill score
    pub fitness_tier: DifficultyTier,
    /// Owned equipment (bodyweight is implied)
    pub equipment: BTreeSet<Equipment>,
    /// Primary training goal
    pub primary_goal: Option<Goal>,
    /// Additional goals
    pub secondary_goals: Vec<Goal>,
    /// Free-text focus from older profiles
    pub legacy_focus: Option<String>,
    /// Profile creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Stored form of a [`Profile`]. Any stored tier label is ignored.
#[derive(Deserialize)]
struct StoredProfile {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    #[serde(default = "default_skill_score")]
    skill_score: f64,
    #[serde(default)]
    equipment: BTreeSet<Equipment>,
    #[serde(default)]
    primary_goal: Option<Goal>,
    #[serde(default)]
    secondary_goals: Vec<Goal>,
    #[serde(default)]
    legacy_focus: Option<String>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

fn default_skill_score() -> f64 {
    DEFAULT_SKILL_SCORE
}

impl From<StoredProfile> for Profile {
    fn from(stored: StoredProfile) -> Self {
        let mut profile = Self {
            id: stored.id,
            skill_score: DEFAULT_SKILL_SCORE,
            fitness_tier: DifficultyTier::from_skill_score(DEFAULT_SKILL_SCORE),
            equipment: stored.equipment,
            primary_goal: stored.primary_goal,
            secondary_goals: stored.secondary_goals,
            legacy_focus: stored.legacy_focus,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        };
        profile.normalize_skill_score(stored.skill_score);
        profile
    }
}

impl Default for Profile {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            skill_score: DEFAULT_SKILL_SCORE,
            fitness_tier: DifficultyTier::from_skill_score(DEFAULT_SKILL_SCORE),
            equipment: BTreeSet::new(),
            primary_goal: None,
            secondary_goals: Vec::new(),
            legacy_focus: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Profile {
    /// Create a profile with a skill score and primary goal.
    pub fn new(skill_score: f64, primary_goal: Option<Goal>) -> Self {
        let mut profile = Self {
            primary_goal,
            ..Default::default()
        };
        profile.set_skill_score(skill_score);
        profile
    }

    /// Set owned equipment.
    pub fn with_equipment(mut self, equipment: &[Equipment]) -> Self {
        self.equipment = equipment.iter().copied().collect();
        self
    }

    /// Set secondary goals.
    pub fn with_secondary_goals(mut self, goals: &[Goal]) -> Self {
        self.secondary_goals = goals.to_vec();
        self
    }

    /// Update the skill score (clamped to 0-100) and its tier label.
    pub fn set_skill_score(&mut self, score: f64) {
        self.normalize_skill_score(score);
        self.updated_at = Utc::now();
    }

    fn normalize_skill_score(&mut self, score: f64) {
        let score = if score.is_finite() { score } else { DEFAULT_SKILL_SCORE };
        self.skill_score = score.clamp(0.0, 100.0);
        self.fitness_tier = DifficultyTier::from_skill_score(self.skill_score);
    }

    /// Difficulty tier resolved from the current skill score.
    pub fn difficulty(&self) -> DifficultyTier {
        DifficultyTier::from_skill_score(self.skill_score.clamp(0.0, 100.0))
    }

    /// Sum-normalized goal weights.
    pub fn goal_weights(&self) -> GoalWeights {
        GoalWeights::derive(self.primary_goal, &self.secondary_goals)
    }

    /// Count of owned items other than bodyweight.
    pub fn equipment_items(&self) -> usize {
        self.equipment
            .iter()
            .filter(|e| **e != Equipment::Bodyweight)
            .count()
    }
}
