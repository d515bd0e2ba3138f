//! Duration and structure resolution per framework.
//!
//! Each framework turns the same inputs into a [`StructurePlan`]: how many
//! exercises to pick, how often the pass repeats, and the timing of each
//! interval. Adjustments are applied as a clamp-stack and the result is
//! floored at the framework minimum.

use rand::Rng;

use super::framework::{Framework, FrameworkPolicy};
use super::types::{DurationRange, EnergyLevel};
use crate::catalog::types::DifficultyTier;
use crate::config::DurationConfig;
use crate::signals::insights::PersonalizationInsights;
use crate::signals::streak::StreakAdjustment;

/// Inputs shared by every framework's duration formula.
#[derive(Debug, Clone)]
pub struct DurationInputs<'a> {
    pub tier: DifficultyTier,
    /// Primary goal's preferred range
    pub goal_range: Option<DurationRange>,
    /// Caller-imposed bounds (validated)
    pub request_range: Option<DurationRange>,
    /// Owned equipment other than bodyweight
    pub equipment_items: usize,
    pub insights: &'a PersonalizationInsights,
    pub energy: EnergyLevel,
    pub streak: StreakAdjustment,
}

/// Resolved structure of a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct StructurePlan {
    pub duration_minutes: u32,
    /// Distinct exercise picks (one per minute for fixed-minute)
    pub exercise_slots: u32,
    /// Times the exercise pass repeats
    pub passes: u32,
    /// Work-rest micro-intervals per exercise
    pub intervals_per_exercise: u32,
    pub work_seconds: Option<u32>,
    pub rest_seconds: Option<u32>,
    /// Rest between circuit passes
    pub pass_rest_seconds: Option<u32>,
}

/// Resolves durations from [`DurationConfig`].
#[derive(Debug, Clone, Default)]
pub struct DurationResolver {
    config: DurationConfig,
}

impl DurationResolver {
    pub fn new(config: DurationConfig) -> Self {
        Self { config }
    }

    /// Build the structure plan for a framework.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        policy: &FrameworkPolicy,
        inputs: &DurationInputs<'_>,
        rng: &mut R,
    ) -> StructurePlan {
        let plan = match policy.framework {
            Framework::FixedMinute => self.fixed_minute(policy, inputs, rng),
            Framework::WorkRest => self.work_rest(policy, inputs, rng),
            Framework::CountdownCircuit => self.countdown_circuit(policy, inputs, rng),
            Framework::RepeatedCircuit => self.repeated_circuit(policy, inputs, rng),
        };
        tracing::debug!(
            "{} plan: {} min, {} exercises x {} passes",
            policy.framework,
            plan.duration_minutes,
            plan.exercise_slots,
            plan.passes
        );
        plan
    }

    /// Personalization tuning factor from hit-rate and skip-rate.
    pub fn tuning_factor(&self, insights: &PersonalizationInsights) -> f64 {
        (1.0 + (insights.average_hit_rate - 1.0) * self.config.tuning_hit_gain
            - insights.skip_rate * self.config.tuning_skip_penalty)
            .clamp(self.config.tuning_min, self.config.tuning_max)
    }

    pub fn energy_multiplier(&self, energy: EnergyLevel) -> f64 {
        match energy {
            EnergyLevel::Low => self.config.low_energy_multiplier,
            EnergyLevel::Moderate => 1.0,
            EnergyLevel::High => self.config.high_energy_multiplier,
        }
    }

    pub fn equipment_bonus(&self, items: usize) -> u32 {
        if items >= self.config.full_equipment_items {
            self.config.full_equipment_bonus
        } else if items >= self.config.partial_equipment_items {
            self.config.partial_equipment_bonus
        } else {
            0
        }
    }

    fn tier_nudge(&self, tier: DifficultyTier) -> i32 {
        match tier {
            DifficultyTier::Beginner => self.config.beginner_nudge,
            DifficultyTier::Intermediate => 0,
            DifficultyTier::Advanced => self.config.advanced_nudge,
        }
    }

    /// Draw a base from `range`, then apply nudge, bonus, tuning, energy and streak.
    fn time_boxed<R: Rng + ?Sized>(
        &self,
        range: DurationRange,
        bonus: u32,
        ceiling: u32,
        policy: &FrameworkPolicy,
        inputs: &DurationInputs<'_>,
        rng: &mut R,
    ) -> u32 {
        let base = rng.gen_range(range.min..=range.max.max(range.min)) as f64;
        let nudged = (base + self.tier_nudge(inputs.tier) as f64 + bonus as f64).max(1.0);
        let tuned = nudged * self.tuning_factor(inputs.insights);
        let energized = tuned * self.energy_multiplier(inputs.energy);
        let shortened = energized * inputs.streak.duration_factor();

        let mut minutes = shortened.round().max(1.0) as u32;
        minutes = match inputs.request_range {
            Some(bounds) => bounds.clamp(minutes),
            None => minutes.min(ceiling),
        };
        minutes.max(policy.minimum_minutes)
    }

    fn fixed_minute<R: Rng + ?Sized>(
        &self,
        policy: &FrameworkPolicy,
        inputs: &DurationInputs<'_>,
        rng: &mut R,
    ) -> StructurePlan {
        let tier_range = self.config.fixed_minute_ranges.get(inputs.tier);
        let range = match (inputs.request_range, inputs.goal_range) {
            (Some(bounds), _) => bounds,
            (None, Some(goal)) => goal.intersect(&tier_range).unwrap_or(tier_range),
            (None, None) => tier_range,
        };
        let bonus = self.equipment_bonus(inputs.equipment_items);
        let minutes = self.time_boxed(range, bonus, self.config.fixed_minute_max, policy, inputs, rng);

        StructurePlan {
            duration_minutes: minutes,
            exercise_slots: minutes,
            passes: 1,
            intervals_per_exercise: 1,
            work_seconds: Some(60),
            rest_seconds: None,
            pass_rest_seconds: None,
        }
    }

    fn work_rest<R: Rng + ?Sized>(
        &self,
        policy: &FrameworkPolicy,
        inputs: &DurationInputs<'_>,
        rng: &mut R,
    ) -> StructurePlan {
        let mut exercises: u32 = match (inputs.tier, inputs.energy) {
            (DifficultyTier::Beginner, _) | (_, EnergyLevel::Low) => 2,
            (DifficultyTier::Intermediate, _) => rng.gen_range(2..=3),
            (DifficultyTier::Advanced, _) => 3,
        };

        let work = self.config.work_rest_work_seconds;
        let rest = self.config.work_rest_rest_seconds;
        let intervals = self.config.work_rest_intervals;
        let block_minutes = ((work + rest) * intervals).div_ceil(60).max(1);
        let min_exercises = policy.minimum_minutes.div_ceil(block_minutes).max(1);

        if let Some(bounds) = inputs.request_range {
            let fit_min = bounds.min.div_ceil(block_minutes);
            let fit_max = (bounds.max / block_minutes).max(fit_min);
            exercises = exercises.clamp(fit_min, fit_max);
        }
        exercises = exercises.max(min_exercises);

        StructurePlan {
            duration_minutes: (exercises * block_minutes).max(policy.minimum_minutes),
            exercise_slots: exercises,
            passes: 1,
            intervals_per_exercise: intervals,
            work_seconds: Some(work),
            rest_seconds: Some(rest),
            pass_rest_seconds: None,
        }
    }

    fn countdown_circuit<R: Rng + ?Sized>(
        &self,
        policy: &FrameworkPolicy,
        inputs: &DurationInputs<'_>,
        rng: &mut R,
    ) -> StructurePlan {
        let range = inputs
            .request_range
            .unwrap_or_else(|| self.config.countdown_circuit_ranges.get(inputs.tier));
        let minutes = self.time_boxed(range, 0, self.config.countdown_circuit_max, policy, inputs, rng);
        let exercises = match inputs.tier {
            DifficultyTier::Beginner => rng.gen_range(3..=4),
            DifficultyTier::Intermediate => rng.gen_range(4..=5),
            DifficultyTier::Advanced => rng.gen_range(5..=6),
        };

        StructurePlan {
            duration_minutes: minutes,
            exercise_slots: exercises,
            passes: 1,
            intervals_per_exercise: 1,
            work_seconds: None,
            rest_seconds: None,
            pass_rest_seconds: None,
        }
    }

    fn repeated_circuit<R: Rng + ?Sized>(
        &self,
        policy: &FrameworkPolicy,
        inputs: &DurationInputs<'_>,
        rng: &mut R,
    ) -> StructurePlan {
        let (exercises, mut passes): (u32, u32) = match inputs.tier {
            DifficultyTier::Beginner => (rng.gen_range(4..=5), 3),
            DifficultyTier::Intermediate => (rng.gen_range(5..=6), 4),
            DifficultyTier::Advanced => (rng.gen_range(6..=8), 5),
        };

        let base_work = self.config.circuit_work_seconds.get(inputs.tier) as f64;
        let work = ((base_work * inputs.streak.duration_factor()).round() as u32)
            .max(self.config.circuit_min_work_seconds);
        let transition = self.config.circuit_transition_seconds;
        let rest = self.pass_rest_seconds(inputs);

        let total_minutes = |passes: u32| -> u32 {
            let seconds = exercises * (work + transition) * passes + passes.saturating_sub(1) * rest;
            seconds.div_ceil(60)
        };

        if let Some(bounds) = inputs.request_range {
            while total_minutes(passes) > bounds.max && passes > 2 {
                passes -= 1;
            }
            while total_minutes(passes) < bounds.min && passes < 8 {
                passes += 1;
            }
        }

        StructurePlan {
            duration_minutes: total_minutes(passes).max(policy.minimum_minutes),
            exercise_slots: exercises,
            passes,
            intervals_per_exercise: 1,
            work_seconds: Some(work),
            rest_seconds: Some(transition),
            pass_rest_seconds: Some(rest),
        }
    }

    /// Rest between circuit passes, longer when fatigued or low on energy.
    pub fn pass_rest_seconds(&self, inputs: &DurationInputs<'_>) -> u32 {
        let scaled = self.config.circuit_base_rest_seconds as f64
            * (1.0 + self.config.circuit_rest_fatigue_gain * inputs.insights.fatigue_trend);
        let mut rest = (scaled.round() as u32).clamp(
            self.config.circuit_rest_min_seconds,
            self.config.circuit_rest_max_seconds,
        );
        if inputs.energy == EnergyLevel::Low {
            rest += self.config.circuit_low_energy_rest_bonus;
        }
        rest
    }
}
