//! Built-in exercise library.
//!
//! The catalog shape and lookup live here. Deployments normally load their own
//! exercise list from JSON; the built-in set keeps the engine usable out of the box.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::types::{
    DifficultyTier, Equipment, ExerciseDefinition, MuscleGroup, TierTargets,
};
use crate::error::{EngineError, EngineResult};

/// Immutable collection of exercise definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseCatalog {
    exercises: Vec<ExerciseDefinition>,
}

impl ExerciseCatalog {
    /// Create a catalog from definitions.
    pub fn new(exercises: Vec<ExerciseDefinition>) -> Self {
        Self { exercises }
    }

    /// Parse a catalog from a JSON array of definitions.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let exercises: Vec<ExerciseDefinition> = serde_json::from_str(json)?;
        Ok(Self { exercises })
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// All definitions in catalog order.
    pub fn exercises(&self) -> &[ExerciseDefinition] {
        &self.exercises
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Look up a definition by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&ExerciseDefinition> {
        self.exercises
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Definitions targeting a muscle group.
    pub fn by_muscle_group(&self, group: MuscleGroup) -> Vec<&ExerciseDefinition> {
        self.exercises
            .iter()
            .filter(|e| e.muscle_group == group)
            .collect()
    }

    /// The built-in exercise set.
    pub fn builtin() -> Self {
        Self::new(builtin_exercises())
    }
}

fn builtin_exercises() -> Vec<ExerciseDefinition> {
    use DifficultyTier::{Advanced, Beginner, Intermediate};
    use Equipment::*;
    use MuscleGroup as M;

    vec![
        // Bodyweight conditioning
        ExerciseDefinition::new("Jumping Jacks", M::Cardio, Beginner, TierTargets::new(25, 35, 45))
            .with_categories(false, true, false, false),
        ExerciseDefinition::new("High Knees", M::Cardio, Beginner, TierTargets::new(20, 30, 40))
            .with_categories(false, true, false, false),
        ExerciseDefinition::new("Mountain Climbers", M::Core, Beginner, TierTargets::new(20, 30, 40))
            .with_categories(true, true, false, false)
            .per_side(),
        ExerciseDefinition::new("Burpees", M::FullBody, Intermediate, TierTargets::new(6, 10, 14))
            .with_categories(true, true, true, false),
        ExerciseDefinition::new("Squat Jumps", M::Legs, Intermediate, TierTargets::new(8, 12, 16))
            .with_categories(false, true, true, false),
        ExerciseDefinition::new("Skater Hops", M::Legs, Intermediate, TierTargets::new(12, 16, 24))
            .with_categories(false, true, true, false)
            .per_side(),
        ExerciseDefinition::new("Tuck Jumps", M::Legs, Advanced, TierTargets::new(6, 8, 12))
            .with_categories(false, true, true, false),
        ExerciseDefinition::new("Sprawls", M::FullBody, Advanced, TierTargets::new(8, 10, 14))
            .with_categories(true, true, true, false),
        // Bodyweight strength
        ExerciseDefinition::new("Air Squats", M::Legs, Beginner, TierTargets::new(12, 18, 25))
            .with_categories(true, false, false, false),
        ExerciseDefinition::new("Reverse Lunges", M::Legs, Beginner, TierTargets::new(10, 14, 20))
            .with_categories(true, false, false, false)
            .per_side(),
        ExerciseDefinition::new("Glute Bridges", M::Glutes, Beginner, TierTargets::new(12, 16, 20))
            .with_categories(false, false, false, true),
        ExerciseDefinition::new("Push-ups", M::Chest, Beginner, TierTargets::new(8, 14, 20))
            .with_categories(true, false, false, false),
        ExerciseDefinition::new("Pike Push-ups", M::Shoulders, Intermediate, TierTargets::new(6, 10, 14))
            .with_categories(true, false, false, false),
        ExerciseDefinition::new("Plank", M::Core, Beginner, TierTargets::new(20, 35, 50))
            .with_categories(false, false, false, false)
            .hold(),
        ExerciseDefinition::new("Side Plank", M::Core, Intermediate, TierTargets::new(15, 25, 40))
            .with_categories(false, false, false, false)
            .hold()
            .per_side(),
        ExerciseDefinition::new("Hollow Hold", M::Core, Intermediate, TierTargets::new(15, 25, 40))
            .with_categories(false, false, false, false)
            .hold(),
        ExerciseDefinition::new("Wall Sit", M::Legs, Beginner, TierTargets::new(20, 35, 50))
            .hold(),
        ExerciseDefinition::new("Pistol Squats", M::Legs, Advanced, TierTargets::new(3, 5, 8))
            .with_categories(true, false, false, false)
            .per_side(),
        ExerciseDefinition::new("Handstand Push-ups", M::Shoulders, Advanced, TierTargets::new(3, 5, 8))
            .with_categories(true, false, false, false),
        // Mobility
        ExerciseDefinition::new("World's Greatest Stretch", M::FullBody, Beginner, TierTargets::new(4, 6, 8))
            .with_categories(false, false, false, true)
            .per_side(),
        ExerciseDefinition::new("Cat-Cow", M::Back, Beginner, TierTargets::new(8, 10, 12))
            .with_categories(false, false, false, true),
        ExerciseDefinition::new("Deep Squat Hold", M::Legs, Beginner, TierTargets::new(20, 30, 45))
            .with_categories(false, false, false, true)
            .hold(),
        ExerciseDefinition::new("Inchworms", M::FullBody, Beginner, TierTargets::new(5, 7, 10))
            .with_categories(false, false, false, true),
        // Equipment
        ExerciseDefinition::new("Dumbbell Thrusters", M::FullBody, Intermediate, TierTargets::new(8, 10, 14))
            .with_equipment(&[Dumbbells])
            .with_categories(true, true, false, false),
        ExerciseDefinition::new("Dumbbell Rows", M::Back, Beginner, TierTargets::new(8, 12, 15))
            .with_equipment(&[Dumbbells])
            .with_categories(true, false, false, false)
            .per_side(),
        ExerciseDefinition::new("Dumbbell Bench Press", M::Chest, Intermediate, TierTargets::new(8, 10, 12))
            .with_equipment(&[Dumbbells, Bench])
            .with_categories(true, false, false, false),
        ExerciseDefinition::new("Dumbbell Curls", M::Arms, Beginner, TierTargets::new(10, 12, 15))
            .with_equipment(&[Dumbbells]),
        ExerciseDefinition::new("Kettlebell Swings", M::Glutes, Intermediate, TierTargets::new(12, 15, 20))
            .with_equipment(&[Kettlebell])
            .with_categories(true, true, false, false),
        ExerciseDefinition::new("Goblet Squats", M::Legs, Beginner, TierTargets::new(10, 12, 15))
            .with_equipment(&[Kettlebell])
            .with_categories(true, false, false, false),
        ExerciseDefinition::new("Kettlebell Snatches", M::FullBody, Advanced, TierTargets::new(6, 8, 12))
            .with_equipment(&[Kettlebell])
            .with_categories(true, true, true, false)
            .per_side(),
        ExerciseDefinition::new("Barbell Deadlifts", M::Back, Intermediate, TierTargets::new(5, 8, 10))
            .with_equipment(&[Barbell])
            .with_categories(true, false, false, false),
        ExerciseDefinition::new("Barbell Front Squats", M::Legs, Advanced, TierTargets::new(5, 6, 8))
            .with_equipment(&[Barbell])
            .with_categories(true, false, false, false),
        ExerciseDefinition::new("Pull-ups", M::Back, Intermediate, TierTargets::new(3, 6, 10))
            .with_equipment(&[PullUpBar])
            .with_categories(true, false, false, false),
        ExerciseDefinition::new("Hanging Knee Raises", M::Core, Intermediate, TierTargets::new(6, 10, 14))
            .with_equipment(&[PullUpBar]),
        ExerciseDefinition::new("Band Pull-aparts", M::Shoulders, Beginner, TierTargets::new(12, 15, 20))
            .with_equipment(&[ResistanceBand])
            .with_categories(false, false, false, true),
        ExerciseDefinition::new("Double-unders", M::Cardio, Advanced, TierTargets::new(15, 30, 50))
            .with_equipment(&[JumpRope])
            .with_categories(false, true, true, false),
        ExerciseDefinition::new("Single-unders", M::Cardio, Beginner, TierTargets::new(40, 60, 80))
            .with_equipment(&[JumpRope])
            .with_categories(false, true, false, false),
        ExerciseDefinition::new("Box Jumps", M::Legs, Intermediate, TierTargets::new(6, 10, 14))
            .with_equipment(&[PlyoBox])
            .with_categories(false, true, true, false),
        ExerciseDefinition::new("Medicine Ball Slams", M::FullBody, Intermediate, TierTargets::new(10, 12, 16))
            .with_equipment(&[MedicineBall])
            .with_categories(true, true, true, false),
    ]
}
