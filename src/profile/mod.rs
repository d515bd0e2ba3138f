//! User profile and goal definitions.

pub mod goals;
pub mod types;

pub use goals::{Goal, GoalWeights};
pub use types::{Profile, DEFAULT_SKILL_SCORE};
