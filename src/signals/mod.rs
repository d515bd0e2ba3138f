//! Signal models derived from session history.
//!
//! Provides:
//! - Rolling personalization insights (hit-rate, skip-rate, fatigue trend)
//! - Per-muscle recovery decay
//! - Per-exercise mastery
//! - Consistency streaks

pub mod insights;
pub mod mastery;
pub mod recovery;
pub mod streak;

pub use insights::{ExerciseStats, FatigueSeverity, InsightsAnalyzer, PersonalizationInsights};
pub use mastery::{linear_slope, MasteryModel, MasteryRecord};
pub use recovery::{workout_intensity, RecoveryModel, RecoveryRecord, RecoveryStatus};
pub use streak::{StreakAdjustment, StreakModel, StreakState};
