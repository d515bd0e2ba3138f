//! Workout generation engine.

pub mod bias;
pub mod duration;
pub mod engine;
pub mod framework;
pub mod quantity;
pub mod selection;
pub mod types;

pub use bias::resolve_bias;
pub use duration::{DurationInputs, DurationResolver, StructurePlan};
pub use engine::WorkoutGenerator;
pub use framework::{Framework, FrameworkPolicy, QuantityScale};
pub use quantity::{personalization_intensity, QuantityPlanner};
pub use selection::{recovery_adjustment, ExerciseSelector, SelectionContext};
pub use types::{
    DurationRange, EnergyLevel, GenerationRequest, OverloadBump, Rationale, SessionIntent, Workout,
    WorkoutRound,
};
