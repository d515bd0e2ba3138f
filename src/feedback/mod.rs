//! Adaptive feedback loop.
//!
//! Turns completed sessions back into signals for the next cycle:
//! - Skill-score update
//! - Progressive-overload bumps
//! - Personal records and PR readiness
//! - Framework preference

pub mod overload;
pub mod preference;
pub mod records;
pub mod skill;

pub use overload::{overload_bumps, OverloadDetector, OverloadRecommendation};
pub use preference::{ChoiceReason, FrameworkChoice, FrameworkPreference, PreferenceModel};
pub use records::{
    recent_bests, NearMiss, NewRecord, PersonalRecord, PersonalRecordBook, PrDetection, PrReadiness,
    RecordDetector,
};
pub use skill::{SkillModel, SkillUpdate};
