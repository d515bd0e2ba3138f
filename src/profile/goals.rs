//! Training goal definitions.
//!
//! Goals drive the category bias used for exercise scoring, an optional
//! preferred duration range, and the framework the goal naturally implies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::types::CategoryVector;
use crate::generation::framework::Framework;
use crate::generation::types::DurationRange;

/// A user's training goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    CardioEndurance,
    Strength,
    FatLoss,
    Power,
    Mobility,
    GeneralFitness,
}

impl Goal {
    pub fn label(&self) -> &'static str {
        match self {
            Goal::CardioEndurance => "Cardio Endurance",
            Goal::Strength => "Strength",
            Goal::FatLoss => "Fat Loss",
            Goal::Power => "Power",
            Goal::Mobility => "Mobility",
            Goal::GeneralFitness => "General Fitness",
        }
    }

    /// Category bias `{compound, cardio, plyometric, mobility}`.
    pub fn category_bias(&self) -> CategoryVector {
        match self {
            Goal::CardioEndurance => CategoryVector::new(0.15, 0.5, 0.25, 0.1),
            Goal::Strength => CategoryVector::new(0.6, 0.05, 0.15, 0.2),
            Goal::FatLoss => CategoryVector::new(0.3, 0.4, 0.25, 0.05),
            Goal::Power => CategoryVector::new(0.35, 0.1, 0.5, 0.05),
            Goal::Mobility => CategoryVector::new(0.1, 0.1, 0.0, 0.8),
            Goal::GeneralFitness => CategoryVector::new(0.3, 0.3, 0.2, 0.2),
        }
    }

    /// Preferred fixed-minute session length.
    pub fn preferred_duration(&self) -> Option<DurationRange> {
        match self {
            Goal::CardioEndurance => Some(DurationRange::new(15, 25)),
            Goal::Strength => Some(DurationRange::new(10, 20)),
            Goal::FatLoss => Some(DurationRange::new(15, 30)),
            Goal::Power => Some(DurationRange::new(8, 16)),
            Goal::Mobility => Some(DurationRange::new(10, 20)),
            Goal::GeneralFitness => None,
        }
    }

    /// Framework this goal is best served by.
    pub fn implied_framework(&self) -> Framework {
        match self {
            Goal::CardioEndurance => Framework::WorkRest,
            Goal::FatLoss => Framework::RepeatedCircuit,
            Goal::Mobility => Framework::CountdownCircuit,
            Goal::Strength | Goal::Power | Goal::GeneralFitness => Framework::FixedMinute,
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Normalized goal weights (sum to 1 when non-empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalWeights(BTreeMap<Goal, f64>);

impl GoalWeights {
    /// Primary share when secondary goals exist.
    pub const PRIMARY_SHARE: f64 = 0.6;

    /// Derive weights from a primary goal and secondary goals.
    ///
    /// Duplicates and repeats of the primary goal are ignored.
    pub fn derive(primary: Option<Goal>, secondary: &[Goal]) -> Self {
        let mut extras: Vec<Goal> = Vec::new();
        for goal in secondary {
            if Some(*goal) != primary && !extras.contains(goal) {
                extras.push(*goal);
            }
        }

        let mut weights = BTreeMap::new();
        match primary {
            Some(goal) if extras.is_empty() => {
                weights.insert(goal, 1.0);
            }
            Some(goal) => {
                weights.insert(goal, Self::PRIMARY_SHARE);
                let share = (1.0 - Self::PRIMARY_SHARE) / extras.len() as f64;
                for extra in extras {
                    weights.insert(extra, share);
                }
            }
            None => {
                if !extras.is_empty() {
                    let share = 1.0 / extras.len() as f64;
                    for extra in extras {
                        weights.insert(extra, share);
                    }
                }
            }
        }

        Self(weights).normalized()
    }

    /// Rescale so weights sum to 1.
    pub fn normalized(self) -> Self {
        let total: f64 = self.0.values().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return Self::default();
        }
        Self(
            self.0
                .into_iter()
                .filter(|(_, w)| *w > 0.0)
                .map(|(g, w)| (g, w / total))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, goal: Goal) -> f64 {
        self.0.get(&goal).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Goal, f64)> + '_ {
        self.0.iter().map(|(g, w)| (*g, *w))
    }

    /// Weighted blend of goal biases; neutral when there are no goals.
    pub fn blended_bias(&self) -> CategoryVector {
        if self.is_empty() {
            return CategoryVector::neutral();
        }
        self.iter()
            .fold(CategoryVector::default(), |acc, (goal, weight)| {
                acc.plus(&goal.category_bias().scaled(weight))
            })
    }
}
