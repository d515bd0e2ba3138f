//! Per-exercise mastery composite.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::MasteryConfig;
use crate::session::types::{mean, Round, Session};

/// Mastery score and counters for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryRecord {
    pub exercise: String,
    /// Composite score (0-100)
    pub score: f64,
    pub attempts: u32,
    pub successes: u32,
}

impl MasteryRecord {
    pub fn empty(exercise: impl Into<String>) -> Self {
        Self {
            exercise: exercise.into(),
            score: 0.0,
            attempts: 0,
            successes: 0,
        }
    }
}

/// Computes mastery from session history.
#[derive(Debug, Clone, Default)]
pub struct MasteryModel {
    config: MasteryConfig,
}

impl MasteryModel {
    pub fn new(config: MasteryConfig) -> Self {
        Self { config }
    }

    /// Mastery for one exercise (name matched case-insensitively).
    pub fn score_exercise(&self, exercise: &str, sessions: &[Session]) -> MasteryRecord {
        let attempts: Vec<&Round> = chronological_rounds(sessions)
            .into_iter()
            .filter(|r| r.exercise.eq_ignore_ascii_case(exercise))
            .collect();
        self.score_rounds(exercise, &attempts)
    }

    /// Mastery for every exercise that appears in history.
    pub fn score_all(&self, sessions: &[Session]) -> BTreeMap<String, MasteryRecord> {
        let mut grouped: BTreeMap<String, Vec<&Round>> = BTreeMap::new();
        for round in chronological_rounds(sessions) {
            grouped.entry(round.exercise.clone()).or_default().push(round);
        }
        grouped
            .into_iter()
            .map(|(name, rounds)| {
                let record = self.score_rounds(&name, &rounds);
                (name, record)
            })
            .collect()
    }

    /// Score chronologically ordered attempts.
    fn score_rounds(&self, exercise: &str, attempts: &[&Round]) -> MasteryRecord {
        if attempts.is_empty() {
            return MasteryRecord::empty(exercise);
        }

        let total = attempts.len() as u32;
        let successes = attempts.iter().filter(|r| !r.skipped).count() as u32;
        let hit_rates: Vec<f64> = attempts
            .iter()
            .filter_map(|r| r.hit_rate(self.config.hit_rate_cap))
            .collect();

        let completion = successes as f64 / total as f64;
        let quality = mean(hit_rates.iter().copied())
            .map(|avg| (avg / self.config.hit_rate_cap).clamp(0.0, 1.0))
            .unwrap_or(self.config.neutral_component);
        let consistency = self.consistency(&hit_rates);
        let progression = self.progression(&hit_rates);

        let composite = completion * self.config.completion_weight
            + quality * self.config.quality_weight
            + consistency * self.config.consistency_weight
            + progression * self.config.progression_weight;

        MasteryRecord {
            exercise: exercise.to_string(),
            score: (composite * 100.0).clamp(0.0, 100.0),
            attempts: total,
            successes,
        }
    }

    /// One minus the coefficient of variation, clamped to `[0, 1]`.
    pub fn consistency(&self, hit_rates: &[f64]) -> f64 {
        if hit_rates.len() < self.config.min_consistency_samples {
            return self.config.neutral_component;
        }
        let avg = mean(hit_rates.iter().copied()).unwrap_or(0.0);
        if avg <= 0.0 {
            return 0.0;
        }
        let variance = mean(hit_rates.iter().map(|h| (h - avg).powi(2))).unwrap_or(0.0);
        (1.0 - variance.sqrt() / avg).clamp(0.0, 1.0)
    }

    /// Slope of the most recent hit-rates mapped around 0.5.
    pub fn progression(&self, hit_rates: &[f64]) -> f64 {
        if hit_rates.len() < self.config.min_progression_samples {
            return self.config.neutral_component;
        }
        let start = hit_rates.len().saturating_sub(self.config.progression_window);
        let slope = linear_slope(&hit_rates[start..]);
        (0.5 + slope * self.config.slope_gain).clamp(0.0, 1.0)
    }
}

/// Least-squares slope of values against their index.
pub fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn chronological_rounds(sessions: &[Session]) -> Vec<&Round> {
    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.created_at);
    ordered.into_iter().flat_map(|s| s.rounds.iter()).collect()
}
