//! Skill-score update from recent sessions.
//!
//! The raw delta rewards hitting targets and penalizes skips, both overall
//! and per movement. An asymmetric amplifier then makes sustained trends
//! count more than one-off sessions before the delta is clamped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::SkillConfig;
use crate::profile::types::Profile;
use crate::session::types::{mean, most_recent, Session};

/// Result of a skill update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillUpdate {
    pub previous_score: f64,
    pub new_score: f64,
    /// Applied delta after amplification and clamping
    pub delta: f64,
    pub raw_delta: f64,
    pub sessions_considered: usize,
    pub average_hit_rate: f64,
    pub skip_rate: f64,
    pub average_rpe: f64,
    pub movement_score: f64,
    pub sustained_progress: bool,
    pub sustained_struggle: bool,
}

impl SkillUpdate {
    fn unchanged(score: f64) -> Self {
        Self {
            previous_score: score,
            new_score: score,
            delta: 0.0,
            raw_delta: 0.0,
            sessions_considered: 0,
            average_hit_rate: 1.0,
            skip_rate: 0.0,
            average_rpe: 3.0,
            movement_score: 0.0,
            sustained_progress: false,
            sustained_struggle: false,
        }
    }
}

/// Updates skill scores from history.
#[derive(Debug, Clone)]
pub struct SkillModel {
    config: SkillConfig,
    hit_rate_cap: f64,
}

impl Default for SkillModel {
    fn default() -> Self {
        Self::new(SkillConfig::default(), 1.5)
    }
}

#[derive(Default)]
struct MovementTally {
    rounds: usize,
    skipped: usize,
    hits: Vec<f64>,
}

impl SkillModel {
    pub fn new(config: SkillConfig, hit_rate_cap: f64) -> Self {
        Self { config, hit_rate_cap }
    }

    /// Compute the update for a score. An empty history leaves it unchanged.
    pub fn update(&self, current: f64, sessions: &[Session]) -> SkillUpdate {
        let current = current.clamp(0.0, 100.0);
        let recent = most_recent(sessions, self.config.window.max(1));
        if recent.is_empty() {
            return SkillUpdate::unchanged(current);
        }

        let mut hits = Vec::new();
        let mut total_rounds = 0usize;
        let mut skipped = 0usize;
        let mut movements: BTreeMap<String, MovementTally> = BTreeMap::new();

        for round in recent.iter().flat_map(|s| s.rounds.iter()) {
            total_rounds += 1;
            let tally = movements.entry(round.exercise.to_lowercase()).or_default();
            tally.rounds += 1;
            if round.skipped {
                skipped += 1;
                tally.skipped += 1;
            } else if let Some(hit) = round.hit_rate(self.hit_rate_cap) {
                hits.push(hit);
                tally.hits.push(hit);
            }
        }

        let average_hit_rate = mean(hits.into_iter()).unwrap_or(1.0);
        let skip_rate = if total_rounds == 0 {
            0.0
        } else {
            skipped as f64 / total_rounds as f64
        };
        let average_rpe = mean(recent.iter().filter_map(|s| s.rpe())).unwrap_or(3.0);

        let movement_score = mean(movements.values().map(|tally| {
            let hit = mean(tally.hits.iter().copied()).unwrap_or(1.0);
            let skip = tally.skipped as f64 / tally.rounds.max(1) as f64;
            (hit - 1.0) * self.config.movement_hit_gain - skip * self.config.movement_skip_penalty
        }))
        .unwrap_or(0.0);

        let raw_delta = (average_hit_rate - 1.0) * self.config.hit_gain - skip_rate * self.config.skip_penalty
            + movement_score * self.config.movement_weight;

        let sustained_progress = average_hit_rate >= self.config.progress_min_hit_rate
            && skip_rate <= self.config.progress_max_skip_rate
            && average_rpe <= self.config.progress_max_rpe;
        let sustained_struggle = average_hit_rate <= self.config.struggle_max_hit_rate
            || skip_rate >= self.config.struggle_min_skip_rate
            || average_rpe >= self.config.struggle_min_rpe;

        let amplified = if raw_delta >= 0.0 {
            raw_delta
                * if sustained_progress {
                    self.config.sustained_gain_amplifier
                } else {
                    self.config.unsustained_gain_amplifier
                }
        } else {
            raw_delta
                * if sustained_struggle {
                    self.config.sustained_loss_amplifier
                } else {
                    self.config.unsustained_loss_amplifier
                }
        };

        let delta = amplified.clamp(-self.config.max_delta, self.config.max_delta);
        let new_score = (current + delta).clamp(0.0, 100.0);

        SkillUpdate {
            previous_score: current,
            new_score,
            delta: new_score - current,
            raw_delta,
            sessions_considered: recent.len(),
            average_hit_rate,
            skip_rate,
            average_rpe,
            movement_score,
            sustained_progress,
            sustained_struggle,
        }
    }

    /// Update a profile's skill score in place.
    pub fn apply(&self, profile: &mut Profile, sessions: &[Session]) -> SkillUpdate {
        let update = self.update(profile.skill_score, sessions);
        if update.sessions_considered > 0 {
            profile.set_skill_score(update.new_score);
            tracing::info!(
                "Skill score {:.1} -> {:.1} ({:+.1}) over {} sessions",
                update.previous_score,
                update.new_score,
                update.delta,
                update.sessions_considered
            );
        }
        update
    }
}
