//! RustRep - Interval Workout Personalization Engine
//!
//! Generates short timed interval workouts (EMOM, Tabata, AMRAP, circuits)
//! from a user's profile and recent history, then folds completed sessions
//! back into skill, recovery, mastery, streak, record and framework signals.
//! Every operation is a pure function of its inputs and an injected random
//! source; callers own persistence.

pub mod catalog;
pub mod config;
pub mod error;
pub mod feedback;
pub mod generation;
pub mod profile;
pub mod session;
pub mod signals;

// Re-export commonly used types
pub use catalog::library::ExerciseCatalog;
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use feedback::records::PersonalRecordBook;
pub use generation::engine::WorkoutGenerator;
pub use generation::framework::Framework;
pub use generation::types::{GenerationRequest, Workout};
pub use profile::types::Profile;
pub use session::types::Session;
