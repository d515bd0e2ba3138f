//! Candidate filtering and epsilon-greedy exercise selection.
//!
//! Each pick narrows the eligible pool through a fallback chain (no
//! immediate repeat, recency window, recovery gate, unused first) and then
//! draws either uniformly (exploration) or proportionally to a fitness
//! score (exploitation).

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

use crate::catalog::types::{CategoryVector, ExerciseDefinition, MuscleGroup};
use crate::config::SelectionConfig;
use crate::signals::insights::PersonalizationInsights;

/// Selection weight multiplier for a muscle's recovery.
///
/// Full weight at or above the full threshold, the floor below the severe
/// threshold, linear in between.
pub fn recovery_adjustment(recovery: f64, high_intensity: bool, config: &SelectionConfig) -> f64 {
    let floor = if high_intensity {
        config.high_intensity_recovery_floor
    } else {
        config.standard_recovery_floor
    };
    if recovery >= config.full_recovery_threshold {
        return 1.0;
    }
    if recovery < config.severe_recovery_threshold {
        return floor;
    }
    let span = config.full_recovery_threshold - config.severe_recovery_threshold;
    if span <= 0.0 {
        return 1.0;
    }
    floor + (1.0 - floor) * (recovery - config.severe_recovery_threshold) / span
}

/// Scoring inputs fixed for one workout.
#[derive(Debug, Clone)]
pub struct SelectionContext<'a> {
    pub bias: CategoryVector,
    pub insights: &'a PersonalizationInsights,
    /// Recovery per muscle group at generation time
    pub recovery: BTreeMap<MuscleGroup, f64>,
    pub config: &'a SelectionConfig,
    pub epsilon: f64,
}

impl SelectionContext<'_> {
    fn recovery_of(&self, group: MuscleGroup) -> f64 {
        self.recovery.get(&group).copied().unwrap_or(1.0)
    }

    fn severely_under_recovered(&self, exercise: &ExerciseDefinition) -> bool {
        exercise.is_high_intensity()
            && self.recovery_of(exercise.muscle_group) < self.config.severe_recovery_threshold
    }

    /// Goal fitness of an exercise, before usage terms.
    pub fn base_fitness(&self, exercise: &ExerciseDefinition) -> f64 {
        1.0 + self.config.category_weight * self.bias.matching(&exercise.categories)
    }
}

/// Picks exercises one interval at a time, tracking usage within the workout.
pub struct ExerciseSelector<'a> {
    eligible: Vec<&'a ExerciseDefinition>,
    context: SelectionContext<'a>,
    picks: Vec<&'a ExerciseDefinition>,
    usage: HashMap<&'a str, usize>,
    last_used: HashMap<&'a str, usize>,
    explorations: usize,
}

impl<'a> ExerciseSelector<'a> {
    pub fn new(eligible: Vec<&'a ExerciseDefinition>, context: SelectionContext<'a>) -> Self {
        Self {
            eligible,
            context,
            picks: Vec::new(),
            usage: HashMap::new(),
            last_used: HashMap::new(),
            explorations: 0,
        }
    }

    /// Exercises picked so far, in order.
    pub fn picks(&self) -> &[&'a ExerciseDefinition] {
        &self.picks
    }

    /// Number of exploratory (uniform) picks.
    pub fn explorations(&self) -> usize {
        self.explorations
    }

    fn previous(&self) -> Option<&'a ExerciseDefinition> {
        self.picks.last().copied()
    }

    /// Intervals since an exercise was last picked, `None` if unused.
    fn intervals_since(&self, name: &str) -> Option<usize> {
        self.last_used.get(name).map(|last| self.picks.len() - last)
    }

    /// Candidate set for the next pick after the fallback chain.
    pub fn candidates(&self) -> Vec<&'a ExerciseDefinition> {
        let previous = self.previous().map(|e| e.name.as_str());
        let base: Vec<&'a ExerciseDefinition> = self
            .eligible
            .iter()
            .copied()
            .filter(|e| Some(e.name.as_str()) != previous)
            .collect();

        let window = self.context.config.recency_window;
        let recent: Vec<&'a ExerciseDefinition> = base
            .iter()
            .copied()
            .filter(|e| self.intervals_since(&e.name).map_or(true, |d| d > window))
            .collect();

        let recovered: Vec<&'a ExerciseDefinition> = recent
            .iter()
            .copied()
            .filter(|e| !self.context.severely_under_recovered(e))
            .collect();
        let recovered = if recovered.is_empty() { recent } else { recovered };

        let unused: Vec<&'a ExerciseDefinition> = recovered
            .iter()
            .copied()
            .filter(|e| !self.usage.contains_key(e.name.as_str()))
            .collect();

        if !unused.is_empty() {
            unused
        } else if !recovered.is_empty() {
            recovered
        } else {
            tracing::debug!("Recency window exhausted, falling back to all but the previous exercise");
            base
        }
    }

    /// Selection weight for a candidate.
    pub fn weight(&self, exercise: &ExerciseDefinition) -> f64 {
        let config = self.context.config;
        let recovery = self.context.recovery_of(exercise.muscle_group);
        let mut weight = self.context.base_fitness(exercise)
            * self.context.insights.muscle_preference(exercise.muscle_group)
            * recovery_adjustment(recovery, exercise.is_high_intensity(), config);

        match self.usage.get(exercise.name.as_str()) {
            None => weight *= config.unused_multiplier,
            Some(count) => {
                weight /= 1.0 + *count as f64 * config.usage_penalty;
                if let Some(since) = self.intervals_since(&exercise.name) {
                    weight /= 1.0 + config.recency_penalty_scale / since.max(1) as f64;
                }
            }
        }
        weight
    }

    /// Pick the next exercise and record its use.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&'a ExerciseDefinition> {
        let candidates = self.candidates();
        let chosen = if candidates.is_empty() {
            tracing::warn!("No candidates left, reusing the last eligible exercise");
            self.eligible.last().copied()?
        } else if rng.gen_bool(self.context.epsilon.clamp(0.0, 1.0)) {
            self.explorations += 1;
            candidates[rng.gen_range(0..candidates.len())]
        } else {
            let weights: Vec<f64> = candidates.iter().map(|e| self.weight(e)).collect();
            match WeightedIndex::new(&weights) {
                Ok(dist) => candidates[dist.sample(rng)],
                Err(_) => candidates[rng.gen_range(0..candidates.len())],
            }
        };

        tracing::debug!("Interval {}: {}", self.picks.len() + 1, chosen.name);
        self.last_used.insert(chosen.name.as_str(), self.picks.len());
        *self.usage.entry(chosen.name.as_str()).or_insert(0) += 1;
        self.picks.push(chosen);
        Some(chosen)
    }
}
