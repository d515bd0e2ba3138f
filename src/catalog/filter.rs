//! Eligibility filtering by equipment and difficulty.

use rand::Rng;
use std::collections::BTreeSet;

use super::library::ExerciseCatalog;
use super::types::{available_equipment, DifficultyTier, Equipment, ExerciseDefinition};

/// Eligibility predicates for one generation call.
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    tier: DifficultyTier,
    available: BTreeSet<Equipment>,
    stretch_probability: f64,
}

impl EligibilityFilter {
    /// Create a filter for a tier and the user's owned equipment.
    pub fn new(tier: DifficultyTier, owned: &BTreeSet<Equipment>, stretch_probability: f64) -> Self {
        Self {
            tier,
            available: available_equipment(owned),
            stretch_probability: stretch_probability.clamp(0.0, 1.0),
        }
    }

    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    /// Equipment check only.
    pub fn has_equipment(&self, exercise: &ExerciseDefinition) -> bool {
        exercise.equipment_satisfied(&self.available)
    }

    /// Difficulty check. Beginners are stretched into intermediate moves at random.
    pub fn admits_difficulty<R: Rng + ?Sized>(&self, exercise: &ExerciseDefinition, rng: &mut R) -> bool {
        if exercise.difficulty <= self.tier {
            return true;
        }
        self.tier == DifficultyTier::Beginner
            && exercise.difficulty == DifficultyTier::Intermediate
            && rng.gen_bool(self.stretch_probability)
    }

    /// Apply both predicates, preserving catalog order.
    pub fn apply<'a, R: Rng + ?Sized>(
        &self,
        catalog: &'a ExerciseCatalog,
        rng: &mut R,
    ) -> Vec<&'a ExerciseDefinition> {
        catalog
            .exercises()
            .iter()
            .filter(|e| self.has_equipment(e))
            .filter(|e| self.admits_difficulty(e, rng))
            .collect()
    }
}
