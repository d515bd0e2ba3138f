//! Rolling personalization insights over recent sessions.
//!
//! Hit-rate, skip-rate, exertion and a fatigue trend summarise how the user
//! has actually been performing; per-muscle multipliers nudge selection
//! toward groups the user responds well to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::types::MuscleGroup;
use crate::config::InsightsConfig;
use crate::session::types::{mean, most_recent, Session};

/// Severity bucket of the fatigue trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FatigueSeverity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl FatigueSeverity {
    pub fn from_trend(trend: f64) -> Self {
        if trend >= 0.65 {
            FatigueSeverity::Severe
        } else if trend >= 0.4 {
            FatigueSeverity::Moderate
        } else if trend >= 0.2 {
            FatigueSeverity::Mild
        } else {
            FatigueSeverity::None
        }
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            FatigueSeverity::None => "No Fatigue",
            FatigueSeverity::Mild => "Mild Fatigue",
            FatigueSeverity::Moderate => "Moderate Fatigue",
            FatigueSeverity::Severe => "Severe Fatigue",
        }
    }
}

impl std::fmt::Display for FatigueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-exercise performance within the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStats {
    pub rounds: usize,
    pub skipped: usize,
    /// Mean hit-rate, `None` without samples
    pub hit_rate: Option<f64>,
}

impl ExerciseStats {
    pub fn skip_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.skipped as f64 / self.rounds as f64
        }
    }
}

/// Derived signals over the recent window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationInsights {
    /// Number of sessions in the window
    pub sessions_considered: usize,
    /// Mean capped hit-rate (1.0 without samples)
    pub average_hit_rate: f64,
    /// Skipped rounds over all rounds
    pub skip_rate: f64,
    /// Mean reported RPE (neutral without reports)
    pub average_rpe: f64,
    /// Weighted skip, shortfall and exertion, floored at 0
    pub fatigue_trend: f64,
    /// Selection multipliers per muscle group
    pub muscle_preferences: BTreeMap<MuscleGroup, f64>,
    /// Stats keyed by exercise name
    pub exercise_stats: BTreeMap<String, ExerciseStats>,
    /// Timestamp of the newest session
    pub last_session_at: Option<DateTime<Utc>>,
}

impl Default for PersonalizationInsights {
    fn default() -> Self {
        Self {
            sessions_considered: 0,
            average_hit_rate: 1.0,
            skip_rate: 0.0,
            average_rpe: InsightsConfig::default().neutral_rpe,
            fatigue_trend: 0.0,
            muscle_preferences: BTreeMap::new(),
            exercise_stats: BTreeMap::new(),
            last_session_at: None,
        }
    }
}

impl PersonalizationInsights {
    /// Multiplier for a muscle group (1.0 when unknown).
    pub fn muscle_preference(&self, group: MuscleGroup) -> f64 {
        self.muscle_preferences.get(&group).copied().unwrap_or(1.0)
    }

    /// Hours between the newest session and `now`.
    pub fn hours_since_last_session(&self, now: DateTime<Utc>) -> Option<f64> {
        self.last_session_at
            .map(|last| (now - last).num_seconds().max(0) as f64 / 3600.0)
    }

    pub fn fatigue_severity(&self) -> FatigueSeverity {
        FatigueSeverity::from_trend(self.fatigue_trend)
    }

    /// Share by which the average hit-rate falls short of target.
    pub fn shortfall(&self) -> f64 {
        (1.0 - self.average_hit_rate).max(0.0)
    }
}

/// Computes [`PersonalizationInsights`] from session history.
#[derive(Debug, Clone, Default)]
pub struct InsightsAnalyzer {
    config: InsightsConfig,
}

impl InsightsAnalyzer {
    pub fn new(config: InsightsConfig) -> Self {
        Self { config }
    }

    /// Analyze the most recent sessions.
    pub fn analyze(&self, sessions: &[Session]) -> PersonalizationInsights {
        let recent = most_recent(sessions, self.config.window.max(1));
        if recent.is_empty() {
            return PersonalizationInsights {
                average_rpe: self.config.neutral_rpe,
                ..Default::default()
            };
        }

        let cap = self.config.hit_rate_cap;
        let mut hit_samples = Vec::new();
        let mut total_rounds = 0usize;
        let mut skipped_rounds = 0usize;
        let mut muscle_hits: BTreeMap<MuscleGroup, Vec<f64>> = BTreeMap::new();
        let mut exercise_rounds: BTreeMap<String, (usize, usize, Vec<f64>)> = BTreeMap::new();

        for session in &recent {
            for round in &session.rounds {
                total_rounds += 1;
                let entry = exercise_rounds
                    .entry(round.exercise.clone())
                    .or_insert_with(|| (0, 0, Vec::new()));
                entry.0 += 1;

                if round.skipped {
                    skipped_rounds += 1;
                    entry.1 += 1;
                    continue;
                }
                if let Some(hit) = round.hit_rate(cap) {
                    hit_samples.push(hit);
                    entry.2.push(hit);
                    muscle_hits.entry(round.muscle_group).or_default().push(hit);
                }
            }
        }

        let average_hit_rate = mean(hit_samples.iter().copied()).unwrap_or(1.0);
        let skip_rate = if total_rounds == 0 {
            0.0
        } else {
            skipped_rounds as f64 / total_rounds as f64
        };
        let average_rpe = mean(recent.iter().filter_map(|s| s.rpe())).unwrap_or(self.config.neutral_rpe);
        let fatigue_trend = self.fatigue_trend(average_hit_rate, skip_rate, average_rpe);

        let muscle_preferences = muscle_hits
            .into_iter()
            .filter_map(|(group, hits)| {
                mean(hits.into_iter()).map(|avg| (group, self.muscle_preference(avg)))
            })
            .collect();

        let exercise_stats = exercise_rounds
            .into_iter()
            .map(|(name, (rounds, skipped, hits))| {
                let stats = ExerciseStats {
                    rounds,
                    skipped,
                    hit_rate: mean(hits.into_iter()),
                };
                (name, stats)
            })
            .collect();

        let insights = PersonalizationInsights {
            sessions_considered: recent.len(),
            average_hit_rate,
            skip_rate,
            average_rpe,
            fatigue_trend,
            muscle_preferences,
            exercise_stats,
            last_session_at: recent.first().map(|s| s.created_at),
        };

        tracing::debug!(
            "Insights over {} sessions: hit {:.2}, skip {:.2}, rpe {:.1}, fatigue {:.2}",
            insights.sessions_considered,
            insights.average_hit_rate,
            insights.skip_rate,
            insights.average_rpe,
            insights.fatigue_trend
        );

        insights
    }

    /// Weighted sum of skip-rate, shortfall and RPE above 3, floored at 0.
    pub fn fatigue_trend(&self, hit_rate: f64, skip_rate: f64, rpe: f64) -> f64 {
        let shortfall = (1.0 - hit_rate).max(0.0);
        let exertion = (rpe - 3.0).max(0.0);
        (skip_rate * self.config.fatigue_skip_weight
            + shortfall * self.config.fatigue_shortfall_weight
            + exertion * self.config.fatigue_rpe_weight)
            .max(0.0)
    }

    /// Muscle multiplier from that muscle's mean hit-rate.
    pub fn muscle_preference(&self, hit_rate: f64) -> f64 {
        (1.0 + (hit_rate - 1.0) * self.config.muscle_preference_sensitivity).clamp(
            self.config.muscle_preference_min,
            self.config.muscle_preference_max,
        )
    }
}
