//! Progressive-overload detection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::OverloadConfig;
use crate::generation::types::OverloadBump;
use crate::session::types::{mean, QuantityUnit, Session};
use crate::signals::mastery::MasteryRecord;

/// Suggested target bump for an exercise that keeps overperforming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadRecommendation {
    pub exercise: String,
    pub unit: QuantityUnit,
    pub current_target: u32,
    pub recommended_target: u32,
    pub increment: u32,
    /// Mean hit-rate over the qualifying sessions minus 1
    pub magnitude: f64,
    pub mastery: f64,
}

impl OverloadRecommendation {
    /// Growth relative to the previous target.
    ///
    /// The previous target already carries that session's scaling, so the
    /// next workout applies the ratio rather than the absolute number.
    pub fn bump(&self) -> OverloadBump {
        OverloadBump {
            unit: self.unit,
            factor: self.recommended_target as f64 / self.current_target.max(1) as f64,
        }
    }
}

/// Collapse recommendations into request overload bumps.
pub fn overload_bumps(recommendations: &[OverloadRecommendation]) -> BTreeMap<String, OverloadBump> {
    recommendations
        .iter()
        .map(|r| (r.exercise.clone(), r.bump()))
        .collect()
}

/// Finds exercises that qualify for a target bump.
#[derive(Debug, Clone)]
pub struct OverloadDetector {
    config: OverloadConfig,
    hit_rate_cap: f64,
}

impl Default for OverloadDetector {
    fn default() -> Self {
        Self::new(OverloadConfig::default(), 1.5)
    }
}

/// One session's showing for an exercise.
struct Appearance {
    hit_rate: f64,
    target: u32,
    unit: QuantityUnit,
}

impl OverloadDetector {
    pub fn new(config: OverloadConfig, hit_rate_cap: f64) -> Self {
        Self { config, hit_rate_cap }
    }

    /// Recommendations sorted by exercise name.
    pub fn detect(
        &self,
        sessions: &[Session],
        mastery: &BTreeMap<String, MasteryRecord>,
    ) -> Vec<OverloadRecommendation> {
        let mut ordered: Vec<&Session> = sessions.iter().collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        // Newest first per exercise
        let mut appearances: BTreeMap<String, Vec<Appearance>> = BTreeMap::new();
        for session in ordered {
            let mut per_exercise: BTreeMap<&str, (Vec<f64>, u32, QuantityUnit)> = BTreeMap::new();
            for round in &session.rounds {
                let entry = per_exercise
                    .entry(round.exercise.as_str())
                    .or_insert_with(|| (Vec::new(), round.target, round.unit));
                if let Some(hit) = round.hit_rate(self.hit_rate_cap) {
                    entry.0.push(hit);
                }
            }
            for (exercise, (hits, target, unit)) in per_exercise {
                if let Some(hit_rate) = mean(hits.into_iter()) {
                    appearances.entry(exercise.to_string()).or_default().push(Appearance {
                        hit_rate,
                        target,
                        unit,
                    });
                }
            }
        }

        let required = self.config.min_sessions.max(1);
        appearances
            .into_iter()
            .filter_map(|(exercise, seen)| {
                let window = seen.get(..required)?;
                if !window.iter().all(|a| a.hit_rate > self.config.hit_rate_threshold) {
                    return None;
                }
                let magnitude = mean(window.iter().map(|a| a.hit_rate)).unwrap_or(1.0) - 1.0;
                let mastery_score = mastery.get(&exercise).map_or(0.0, |m| m.score);
                Some(self.recommend(exercise, &window[0], magnitude, mastery_score))
            })
            .collect()
    }

    fn recommend(&self, exercise: String, latest: &Appearance, magnitude: f64, mastery: f64) -> OverloadRecommendation {
        let scale = ((magnitude - self.config.magnitude_floor) / self.config.magnitude_span).clamp(0.0, 1.0);
        let multiplier = self.config.mastery_multiplier.lerp(mastery / 100.0);
        let current = latest.target.max(1);

        let increment = match latest.unit {
            QuantityUnit::Seconds => {
                let band = self.config.hold_increment;
                (band.lerp(scale) * multiplier).clamp(band.min, band.max).round() as u32
            }
            QuantityUnit::Reps => {
                let band = self.config.rep_increment;
                let share = (band.lerp(scale) * multiplier).clamp(band.min, band.max);
                (current as f64 * share).round() as u32
            }
        }
        .max(1);

        tracing::debug!("Overload: {} {} -> {}", exercise, current, current + increment);

        OverloadRecommendation {
            exercise,
            unit: latest.unit,
            current_target: current,
            recommended_target: current + increment,
            increment,
            magnitude,
            mastery,
        }
    }
}
