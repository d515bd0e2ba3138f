//! Exercise catalog and eligibility filtering.

pub mod filter;
pub mod library;
pub mod types;

pub use filter::EligibilityFilter;
pub use library::ExerciseCatalog;
pub use types::{
    available_equipment, CategoryVector, DifficultyTier, Equipment, ExerciseDefinition,
    MuscleGroup, TierTargets,
};
