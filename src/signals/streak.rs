//! Consistency streaks and the comeback adjustment they drive.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::{Band, StreakConfig};
use crate::session::types::Session;

/// Streak state over unique UTC workout days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakState {
    /// Consecutive days ending today or yesterday
    pub current_streak: u32,
    /// Longest run of consecutive days
    pub best_streak: u32,
    /// Whole days since the last workout day, `None` without history
    pub days_since_last: Option<i64>,
    pub last_workout_day: Option<NaiveDate>,
    pub total_workout_days: u32,
    /// Streak is at risk of breaking
    pub fragile: bool,
}

/// Multipliers applied to the next generated workout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreakAdjustment {
    /// Share of duration removed
    pub duration_cut: f64,
    /// Share of each round's quantity removed
    pub quantity_cut: f64,
    pub fragile: bool,
}

impl Default for StreakAdjustment {
    fn default() -> Self {
        Self::none()
    }
}

impl StreakAdjustment {
    pub fn none() -> Self {
        Self {
            duration_cut: 0.0,
            quantity_cut: 0.0,
            fragile: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.duration_cut > 0.0 || self.quantity_cut > 0.0
    }

    pub fn duration_factor(&self) -> f64 {
        1.0 - self.duration_cut
    }

    /// Shrink a quantity, never below 1.
    pub fn apply_quantity(&self, quantity: u32) -> u32 {
        if self.quantity_cut <= 0.0 {
            return quantity.max(1);
        }
        ((quantity as f64 * (1.0 - self.quantity_cut)).round() as u32).max(1)
    }
}

/// Computes streaks and adjustments.
#[derive(Debug, Clone, Default)]
pub struct StreakModel {
    config: StreakConfig,
}

impl StreakModel {
    pub fn new(config: StreakConfig) -> Self {
        Self { config }
    }

    /// Streak state as of `now`.
    pub fn analyze(&self, sessions: &[Session], now: DateTime<Utc>) -> StreakState {
        let days: BTreeSet<NaiveDate> = sessions.iter().map(|s| s.created_at.date_naive()).collect();
        let Some(last_day) = days.iter().next_back().copied() else {
            return StreakState::default();
        };

        let mut best = 0u32;
        let mut run = 0u32;
        let mut previous: Option<NaiveDate> = None;
        for day in &days {
            run = match previous {
                Some(prev) if (*day - prev).num_days() == 1 => run + 1,
                _ => 1,
            };
            best = best.max(run);
            previous = Some(*day);
        }

        let today = now.date_naive();
        let days_since = (today - last_day).num_days().max(0);
        // `run` ends at the last workout day; it only counts while still alive
        let current = if days_since <= 1 { run } else { 0 };
        let fragile = current <= self.config.fragile_max_streak || days_since >= self.config.fragile_gap_days;

        StreakState {
            current_streak: current,
            best_streak: best,
            days_since_last: Some(days_since),
            last_workout_day: Some(last_day),
            total_workout_days: days.len() as u32,
            fragile,
        }
    }

    /// Draw the adjustment for the next workout.
    pub fn adjustment<R: Rng + ?Sized>(&self, state: &StreakState, rng: &mut R) -> StreakAdjustment {
        let Some(days_since) = state.days_since_last else {
            return StreakAdjustment::none();
        };

        let (duration_band, quantity_band) = if state.fragile {
            (self.config.fragile_duration_cut, self.config.fragile_quantity_cut)
        } else if days_since >= self.config.adjustment_gap_days {
            (self.config.standard_duration_cut, self.config.standard_quantity_cut)
        } else {
            return StreakAdjustment::none();
        };

        let adjustment = StreakAdjustment {
            duration_cut: draw(duration_band, rng),
            quantity_cut: draw(quantity_band, rng),
            fragile: state.fragile,
        };
        tracing::debug!(
            "Streak adjustment: duration -{:.1}%, quantity -{:.1}% (fragile: {})",
            adjustment.duration_cut * 100.0,
            adjustment.quantity_cut * 100.0,
            adjustment.fragile
        );
        adjustment
    }
}

fn draw<R: Rng + ?Sized>(band: Band, rng: &mut R) -> f64 {
    band.lerp(rng.gen::<f64>())
}
