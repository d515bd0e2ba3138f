//! Framework preference scoring and next-framework choice.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PreferenceConfig;
use crate::generation::framework::Framework;
use crate::session::types::{mean, most_recent, Session};

/// Preference statistics for one framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkPreference {
    pub framework: Framework,
    /// Composite score (0-1)
    pub score: f64,
    pub sessions: usize,
    pub completion_rate: Option<f64>,
    pub average_hit_rate: Option<f64>,
    pub average_rpe: Option<f64>,
    pub last_used: Option<DateTime<Utc>>,
}

/// Why a framework was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceReason {
    Requested,
    Exploration,
    GoalImplied,
    HighestScore,
}

impl ChoiceReason {
    pub fn label(&self) -> &'static str {
        match self {
            ChoiceReason::Requested => "requested by the caller",
            ChoiceReason::Exploration => "exploring a different structure",
            ChoiceReason::GoalImplied => "matches your goal and you respond well to it",
            ChoiceReason::HighestScore => "your best-performing structure recently",
        }
    }
}

/// Framework chosen for the next session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameworkChoice {
    pub framework: Framework,
    pub reason: ChoiceReason,
}

/// Scores frameworks from history and picks the next one.
#[derive(Debug, Clone)]
pub struct PreferenceModel {
    config: PreferenceConfig,
    hit_rate_cap: f64,
}

impl Default for PreferenceModel {
    fn default() -> Self {
        Self::new(PreferenceConfig::default(), 1.5)
    }
}

impl PreferenceModel {
    pub fn new(config: PreferenceConfig, hit_rate_cap: f64) -> Self {
        Self { config, hit_rate_cap }
    }

    /// Preferences for every framework in declaration order.
    pub fn score_all(&self, sessions: &[Session], now: DateTime<Utc>) -> Vec<FrameworkPreference> {
        Framework::all()
            .iter()
            .map(|framework| {
                let matching: Vec<Session> = sessions
                    .iter()
                    .filter(|s| s.framework == *framework)
                    .cloned()
                    .collect();
                self.score(*framework, &matching, now)
            })
            .collect()
    }

    /// Score one framework from its own sessions.
    pub fn score(&self, framework: Framework, sessions: &[Session], now: DateTime<Utc>) -> FrameworkPreference {
        if sessions.is_empty() {
            return FrameworkPreference {
                framework,
                score: self.config.neutral_score,
                sessions: 0,
                completion_rate: None,
                average_hit_rate: None,
                average_rpe: None,
                last_used: None,
            };
        }

        let completion_rate = mean(sessions.iter().map(|s| s.completion_rate())).unwrap_or(1.0);
        let average_hit_rate = mean(sessions.iter().filter_map(|s| s.average_hit_rate(self.hit_rate_cap)));
        let average_rpe = mean(sessions.iter().filter_map(|s| s.rpe()));

        let hit_component = (average_hit_rate.unwrap_or(1.0) / self.hit_rate_cap).clamp(0.0, 1.0);
        let rpe_component = (1.0 - average_rpe.unwrap_or(3.0) / 5.0).clamp(0.0, 1.0);
        let recent = most_recent(sessions, self.config.recency_sessions.max(1));
        let recency_component = mean(recent.iter().map(|s| self.decay(s.created_at, now))).unwrap_or(0.0);

        let score = (completion_rate * self.config.completion_weight
            + hit_component * self.config.hit_rate_weight
            + rpe_component * self.config.rpe_weight
            + recency_component * self.config.recency_weight)
            .clamp(0.0, 1.0);

        FrameworkPreference {
            framework,
            score,
            sessions: sessions.len(),
            completion_rate: Some(completion_rate),
            average_hit_rate,
            average_rpe,
            last_used: recent.first().map(|s| s.created_at),
        }
    }

    /// Half-life decay of a session's age.
    fn decay(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        if self.config.half_life_days <= 0.0 {
            return 0.0;
        }
        let days = (now - at).num_seconds().max(0) as f64 / 86_400.0;
        0.5f64.powf(days / self.config.half_life_days)
    }

    /// Choose the next framework.
    ///
    /// Explores uniformly with a fixed probability; otherwise keeps the
    /// goal-implied framework when it scores well, else the best scorer.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        preferences: &[FrameworkPreference],
        goal_framework: Framework,
        rng: &mut R,
    ) -> FrameworkChoice {
        if rng.gen_bool(self.config.explore_probability.clamp(0.0, 1.0)) {
            let all = Framework::all();
            return FrameworkChoice {
                framework: all[rng.gen_range(0..all.len())],
                reason: ChoiceReason::Exploration,
            };
        }

        let score_of = |framework: Framework| {
            preferences
                .iter()
                .find(|p| p.framework == framework)
                .map_or(self.config.neutral_score, |p| p.score)
        };

        if score_of(goal_framework) >= self.config.goal_threshold {
            return FrameworkChoice {
                framework: goal_framework,
                reason: ChoiceReason::GoalImplied,
            };
        }

        let best = Framework::all()
            .iter()
            .map(|f| score_of(*f))
            .fold(f64::MIN, f64::max);
        let framework = if (score_of(goal_framework) - best).abs() < 1e-9 {
            goal_framework
        } else {
            Framework::all()
                .into_iter()
                .find(|f| (score_of(*f) - best).abs() < 1e-9)
                .unwrap_or(goal_framework)
        };

        FrameworkChoice {
            framework,
            reason: if framework == goal_framework {
                ChoiceReason::GoalImplied
            } else {
                ChoiceReason::HighestScore
            },
        }
    }
}
