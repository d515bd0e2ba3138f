//! Target quantity computation.

use super::framework::QuantityScale;
use super::types::OverloadBump;
use crate::catalog::types::{DifficultyTier, ExerciseDefinition};
use crate::config::QuantityConfig;
use crate::session::types::QuantityUnit;
use crate::signals::insights::PersonalizationInsights;
use crate::signals::streak::StreakAdjustment;

/// Intensity multiplier from recent performance.
pub fn personalization_intensity(insights: &PersonalizationInsights, config: &QuantityConfig) -> f64 {
    (1.0 + (insights.average_hit_rate - 1.0) * config.hit_gain
        - insights.skip_rate * config.skip_penalty
        - insights.fatigue_trend * config.fatigue_penalty)
        .clamp(config.intensity_min, config.intensity_max)
}

/// Per-workout quantity parameters.
#[derive(Debug, Clone, Copy)]
pub struct QuantityPlanner {
    pub tier: DifficultyTier,
    /// Personalization intensity times energy multiplier
    pub multiplier: f64,
    pub scale: QuantityScale,
    pub streak: StreakAdjustment,
}

impl QuantityPlanner {
    /// Target and unit for an exercise.
    ///
    /// An overload bump raises the planned target and never lowers it. Holds
    /// stay within the framework's hold window.
    pub fn target(&self, exercise: &ExerciseDefinition, overload: Option<OverloadBump>) -> (u32, QuantityUnit) {
        let base = exercise.target_for(self.tier).max(1) as f64;
        let unit = if exercise.is_hold {
            QuantityUnit::Seconds
        } else {
            QuantityUnit::Reps
        };

        let raw = match (self.scale, exercise.is_hold) {
            (QuantityScale::WorkWindow { hold_seconds, .. }, true) => hold_seconds,
            (QuantityScale::WorkWindow { rep_scale, .. }, false) => (base * rep_scale * self.multiplier).round() as u32,
            (QuantityScale::Capped { hold_cap }, true) => ((base * self.multiplier).round() as u32).min(hold_cap),
            (QuantityScale::Capped { .. }, false) => (base * self.multiplier).round() as u32,
        };

        let planned = self.streak.apply_quantity(raw.max(1));
        let target = match (overload.filter(|b| b.unit == unit), self.scale) {
            (None, _) => planned,
            (Some(_), QuantityScale::WorkWindow { .. }) if exercise.is_hold => planned,
            (Some(bump), QuantityScale::Capped { hold_cap }) if exercise.is_hold => {
                bump.apply(planned).min(hold_cap).max(planned)
            }
            (Some(bump), _) => bump.apply(planned),
        };
        (target, unit)
    }
}
