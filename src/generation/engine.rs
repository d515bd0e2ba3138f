//! Workout generation pipeline.
//!
//! One parameterized pipeline serves every framework:
//! - Difficulty and framework resolution
//! - Duration and structure planning
//! - Exercise-bias resolution
//! - Round-by-round candidate filtering and epsilon-greedy selection
//! - Quantity computation and PR-attempt marking

use rand::Rng;

use super::bias::resolve_bias;
use super::duration::{DurationInputs, DurationResolver, StructurePlan};
use super::framework::{Framework, FrameworkPolicy};
use super::quantity::{personalization_intensity, QuantityPlanner};
use super::selection::{ExerciseSelector, SelectionContext};
use super::types::{muscle_load, DurationRange, GenerationRequest, Rationale, Workout, WorkoutRound};
use crate::catalog::filter::EligibilityFilter;
use crate::catalog::library::ExerciseCatalog;
use crate::catalog::types::{DifficultyTier, ExerciseDefinition};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::feedback::preference::{ChoiceReason, FrameworkChoice, PreferenceModel};
use crate::feedback::records::{recent_bests, PersonalRecordBook, RecordDetector};
use crate::profile::goals::Goal;
use crate::profile::types::Profile;
use crate::session::types::{most_recent, PrModality, QuantityUnit, Session};
use crate::signals::insights::{InsightsAnalyzer, PersonalizationInsights};
use crate::signals::recovery::RecoveryModel;
use crate::signals::streak::{StreakAdjustment, StreakModel};

const DEFAULT_FOCUS: &str = "General Fitness";

/// Workout generator.
///
/// Stateless across calls: every input arrives as an argument and the
/// only non-determinism is the supplied random source.
#[derive(Debug, Clone)]
pub struct WorkoutGenerator {
    catalog: ExerciseCatalog,
    config: EngineConfig,
}

impl Default for WorkoutGenerator {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WorkoutGenerator {
    /// Create a generator over a catalog.
    pub fn new(catalog: ExerciseCatalog, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Generator over the built-in catalog with default tuning.
    pub fn builtin() -> Self {
        Self::new(ExerciseCatalog::builtin(), EngineConfig::default())
    }

    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a workout.
    ///
    /// Fails only when the catalog is empty or the requested duration
    /// bounds are invalid.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        history: &[Session],
        records: &PersonalRecordBook,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> EngineResult<Workout> {
        if self.catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        if let Some(range) = &request.duration_range {
            validate_range(range)?;
        }

        let now = request.now;
        let tier = profile.difficulty();
        let insights = InsightsAnalyzer::new(self.config.insights.clone()).analyze(history);
        let recovery = RecoveryModel::from_sessions(history, self.config.recovery.clone());
        let streak_model = StreakModel::new(self.config.streak.clone());
        let streak_state = streak_model.analyze(history, now);
        let streak = streak_model.adjustment(&streak_state, rng);

        let choice = self.choose_framework(profile, history, request, rng);
        let policy = FrameworkPolicy::for_framework(choice.framework, &self.config);

        let resolver = DurationResolver::new(self.config.duration.clone());
        let inputs = DurationInputs {
            tier,
            goal_range: profile.primary_goal.and_then(|g| g.preferred_duration()),
            request_range: request.duration_range,
            equipment_items: profile.equipment_items(),
            insights: &insights,
            energy: request.intent.energy,
            streak,
        };
        let plan = resolver.plan(&policy, &inputs, rng);
        let policy = match (policy.framework, plan.work_seconds) {
            (Framework::RepeatedCircuit, Some(work)) => policy.with_hold_cap(work),
            _ => policy,
        };

        let bias = resolve_bias(&profile.goal_weights(), &request.intent.text);
        let eligible = self.eligible_pool(tier, profile, &policy, rng);
        let eligible_count = eligible.len();

        let context = SelectionContext {
            bias,
            insights: &insights,
            recovery: recovery.snapshot(now),
            config: &self.config.selection,
            epsilon: policy.epsilon,
        };
        let mut selector = ExerciseSelector::new(eligible, context);
        for _ in 0..plan.exercise_slots {
            if selector.next(rng).is_none() {
                break;
            }
        }
        let picks: Vec<&ExerciseDefinition> = selector.picks().to_vec();

        let intensity = personalization_intensity(&insights, &self.config.quantity);
        let planner = QuantityPlanner {
            tier,
            multiplier: intensity * resolver.energy_multiplier(request.intent.energy),
            scale: policy.quantity_scale,
            streak,
        };
        let mut rounds = expand_rounds(&plan, &picks, &planner, request);
        let pr_round = self.mark_pr_attempt(&mut rounds, history, records, &insights, now, rng);

        let rationale = Rationale {
            framework: format!(
                "{} ({}): {}",
                choice.framework.label(),
                choice.framework.description(),
                choice.reason.label()
            ),
            intensity: intensity_rationale(tier, profile.skill_score, intensity, &insights, &streak, &plan),
            exercise_selection: format!(
                "{} exercises from {} eligible for {}; bias compound {:.2}, cardio {:.2}, plyometric {:.2}, mobility {:.2}; {} exploratory picks{}",
                picks.len(),
                eligible_count,
                tier,
                bias.compound,
                bias.cardio,
                bias.plyometric,
                bias.mobility,
                selector.explorations(),
                match pr_round {
                    Some(index) => format!("; PR attempt on interval {}", index),
                    None => String::new(),
                }
            ),
        };

        let workout = Workout {
            id: uuid::Uuid::new_v4(),
            framework: choice.framework,
            duration_minutes: plan.duration_minutes,
            difficulty: tier,
            focus: focus_label(profile, request),
            muscle_load: muscle_load(&rounds),
            rounds,
            rationale,
            generated_at: now,
        };

        tracing::info!(
            "Generated {} workout: {} min, {} rounds, {} difficulty",
            workout.framework,
            workout.duration_minutes,
            workout.rounds.len(),
            workout.difficulty
        );

        Ok(workout)
    }

    fn choose_framework<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        history: &[Session],
        request: &GenerationRequest,
        rng: &mut R,
    ) -> FrameworkChoice {
        if let Some(framework) = request.framework {
            return FrameworkChoice {
                framework,
                reason: ChoiceReason::Requested,
            };
        }
        let goal_framework = profile
            .primary_goal
            .unwrap_or(Goal::GeneralFitness)
            .implied_framework();
        let model = PreferenceModel::new(self.config.preference.clone(), self.config.insights.hit_rate_cap);
        let preferences = model.score_all(history, request.now);
        model.choose(&preferences, goal_framework, rng)
    }

    /// Eligible exercises for this tier, equipment and framework.
    ///
    /// Falls back to the tier pool when the framework scope empties it, then
    /// to the whole catalog.
    fn eligible_pool<R: Rng + ?Sized>(
        &self,
        tier: DifficultyTier,
        profile: &Profile,
        policy: &FrameworkPolicy,
        rng: &mut R,
    ) -> Vec<&ExerciseDefinition> {
        let filter = EligibilityFilter::new(
            tier,
            &profile.equipment,
            self.config.selection.beginner_stretch_probability,
        );
        let eligible = filter.apply(&self.catalog, rng);
        let scoped: Vec<&ExerciseDefinition> = eligible.iter().copied().filter(|e| policy.admits(e)).collect();

        if !scoped.is_empty() {
            scoped
        } else if !eligible.is_empty() {
            tracing::debug!("No {} exercises in scope, using the full eligible pool", policy.framework);
            eligible
        } else {
            tracing::warn!("No eligible exercises for {}, falling back to the full catalog", tier);
            self.catalog.exercises().iter().collect()
        }
    }

    /// Mark one round as a PR attempt when the readiness gate passes.
    ///
    /// Returns the 1-based index of the marked round.
    fn mark_pr_attempt<R: Rng + ?Sized>(
        &self,
        rounds: &mut [WorkoutRound],
        history: &[Session],
        records: &PersonalRecordBook,
        insights: &PersonalizationInsights,
        now: chrono::DateTime<chrono::Utc>,
        rng: &mut R,
    ) -> Option<u32> {
        let detector = RecordDetector::new(self.config.records.clone());
        let readiness = detector.readiness(insights, now);
        if !readiness.ready {
            tracing::debug!("PR attempt skipped: {}", readiness.blockers.join(", "));
            return None;
        }

        let first = detector.first_attempt_index();
        let allowed: Vec<usize> = rounds
            .iter()
            .enumerate()
            .filter(|(_, r)| r.index >= first)
            .map(|(i, _)| i)
            .collect();
        if allowed.is_empty() {
            return None;
        }

        let recent = most_recent(history, self.config.insights.window.max(1));
        let bests = recent_bests(&recent);
        let close: Vec<usize> = allowed
            .iter()
            .copied()
            .filter(|i| {
                let round = &rounds[*i];
                let modality = attempt_modality(round.unit);
                let best = bests.get(&(round.exercise.to_lowercase(), modality));
                match (records.get(&round.exercise, modality), best) {
                    (Some(record), Some(best)) => detector.is_close(*best, record),
                    _ => false,
                }
            })
            .collect();

        let pool = if close.is_empty() { &allowed } else { &close };
        let chosen = pool[rng.gen_range(0..pool.len())];
        let round = &mut rounds[chosen];
        round.pr_attempt = Some(attempt_modality(round.unit));
        Some(round.index)
    }
}

fn validate_range(range: &DurationRange) -> EngineResult<()> {
    if range.min == 0 {
        return Err(EngineError::InvalidDuration(
            "minimum must be at least 1 minute".to_string(),
        ));
    }
    if range.min > range.max {
        return Err(EngineError::InvalidDuration(format!(
            "minimum {} exceeds maximum {}",
            range.min, range.max
        )));
    }
    Ok(())
}

fn attempt_modality(unit: QuantityUnit) -> PrModality {
    match unit {
        QuantityUnit::Seconds => PrModality::Time,
        QuantityUnit::Reps => PrModality::Reps,
    }
}

/// Intent focus, else goal, else legacy focus, else the default.
fn focus_label(profile: &Profile, request: &GenerationRequest) -> String {
    let explicit = request
        .intent
        .focus
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());
    if let Some(focus) = explicit {
        return focus.to_string();
    }
    if let Some(goal) = profile.primary_goal {
        return goal.label().to_string();
    }
    profile
        .legacy_focus
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FOCUS)
        .to_string()
}

/// Lay picks out as intervals according to the structure plan.
fn expand_rounds(
    plan: &StructurePlan,
    picks: &[&ExerciseDefinition],
    planner: &QuantityPlanner,
    request: &GenerationRequest,
) -> Vec<WorkoutRound> {
    let targets: Vec<_> = picks
        .iter()
        .map(|e| planner.target(e, request.overload(&e.name)))
        .collect();

    let mut rounds = Vec::new();
    let passes = plan.passes.max(1);
    for pass in 1..=passes {
        for (position, (exercise, (target, unit))) in picks.iter().zip(&targets).enumerate() {
            let last_station = position + 1 == picks.len();
            let rest_seconds = match plan.pass_rest_seconds {
                Some(pass_rest) if last_station => (pass < passes).then_some(pass_rest),
                _ => plan.rest_seconds,
            };
            for _ in 0..plan.intervals_per_exercise.max(1) {
                rounds.push(WorkoutRound {
                    index: rounds.len() as u32 + 1,
                    exercise: exercise.name.clone(),
                    muscle_group: exercise.muscle_group,
                    difficulty: exercise.difficulty,
                    target: *target,
                    unit: *unit,
                    work_seconds: plan.work_seconds,
                    rest_seconds,
                    circuit_round: plan.pass_rest_seconds.map(|_| pass),
                    alternates_sides: exercise.alternates_sides,
                    pr_attempt: None,
                });
            }
        }
    }
    rounds
}

fn intensity_rationale(
    tier: DifficultyTier,
    skill_score: f64,
    intensity: f64,
    insights: &PersonalizationInsights,
    streak: &StreakAdjustment,
    plan: &StructurePlan,
) -> String {
    let mut text = format!(
        "{} tier from skill score {:.0}; targets x{:.2} from hit-rate {:.0}% and skip-rate {:.0}% ({}); {} minutes",
        tier,
        skill_score,
        intensity,
        insights.average_hit_rate * 100.0,
        insights.skip_rate * 100.0,
        insights.fatigue_severity(),
        plan.duration_minutes
    );
    if streak.is_active() {
        text.push_str(&format!(
            "; eased back {:.0}% duration and {:.0}% volume to rebuild the streak",
            streak.duration_cut * 100.0,
            streak.quantity_cut * 100.0
        ));
    }
    text
}
