//! Unit tests for history-derived signals.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustrep::catalog::{DifficultyTier, MuscleGroup};
use rustrep::config::{RecoveryConfig, StreakConfig};
use rustrep::session::{QuantityUnit, Round};
use rustrep::signals::{
    FatigueSeverity, InsightsAnalyzer, MasteryModel, RecoveryModel, RecoveryRecord, StreakModel,
};
use rustrep::{Framework, Session};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 7, 30, 0).unwrap()
}

fn push_up_session(created_at: DateTime<Utc>, actual: Option<u32>) -> Session {
    let round = Round::planned(1, "Push-ups", MuscleGroup::Chest, DifficultyTier::Beginner, 10, QuantityUnit::Reps);
    let round = match actual {
        Some(reps) => round.with_actual(reps),
        None => round.skip(),
    };
    Session::new(Framework::FixedMinute, DifficultyTier::Beginner, created_at)
        .with_duration(10)
        .with_rounds(vec![round])
        .completed()
}

#[test]
fn test_insights_neutral_without_history() {
    let insights = InsightsAnalyzer::new(Default::default()).analyze(&[]);
    assert_eq!(insights.sessions_considered, 0);
    assert_eq!(insights.average_hit_rate, 1.0);
    assert_eq!(insights.fatigue_severity(), FatigueSeverity::None);
    assert_eq!(insights.hours_since_last_session(now()), None);
}

#[test]
fn test_insights_flags_struggling_user() {
    let sessions: Vec<Session> = (1..=4)
        .map(|d| push_up_session(now() - Duration::days(d), if d % 2 == 0 { None } else { Some(5) }))
        .map(|s| s.with_exertion(5))
        .collect();

    let insights = InsightsAnalyzer::new(Default::default()).analyze(&sessions);
    assert_eq!(insights.sessions_considered, 4);
    assert!((insights.skip_rate - 0.5).abs() < 1e-9);
    assert!((insights.average_hit_rate - 0.5).abs() < 1e-9);
    assert_eq!(insights.fatigue_severity(), FatigueSeverity::Severe);
    assert!(insights.muscle_preference(MuscleGroup::Chest) < 1.0);
    assert_eq!(insights.muscle_preference(MuscleGroup::Legs), 1.0);
}

#[test]
fn test_recovery_decays_back_to_full() {
    let session = push_up_session(now() - Duration::hours(6), Some(10)).with_exertion(4);
    let model = RecoveryModel::from_sessions(&[session], RecoveryConfig::default());

    let soon = model.recovery(MuscleGroup::Chest, now());
    let later = model.recovery(MuscleGroup::Chest, now() + Duration::days(4));
    assert!(soon < 0.5);
    assert_eq!(later, 1.0);
    assert_eq!(model.recovery(MuscleGroup::Legs, now()), 1.0);
}

#[test]
fn test_recovery_ignores_skipped_rounds() {
    let session = push_up_session(now() - Duration::hours(2), None);
    let model = RecoveryModel::from_sessions(&[session], RecoveryConfig::default());
    assert_eq!(model.recovery(MuscleGroup::Chest, now()), 1.0);
    assert!(model.snapshot(now()).is_empty());
}

#[test]
fn test_mastery_rewards_consistent_success() {
    let strong: Vec<Session> = (1..=5)
        .map(|d| push_up_session(now() - Duration::days(d), Some(10)))
        .collect();
    let weak: Vec<Session> = (1..=5)
        .map(|d| push_up_session(now() - Duration::days(d), if d % 2 == 0 { None } else { Some(4) }))
        .collect();

    let model = MasteryModel::default();
    let strong_score = model.score_exercise("push-ups", &strong);
    let weak_score = model.score_exercise("Push-ups", &weak);
    assert_eq!(strong_score.attempts, 5);
    assert_eq!(strong_score.successes, 5);
    assert!(strong_score.score > weak_score.score);
    assert_eq!(model.score_exercise("Burpees", &strong).score, 0.0);
}

#[test]
fn test_streak_counts_unique_days() {
    let sessions = vec![
        push_up_session(now() - Duration::hours(1), Some(10)),
        push_up_session(now() - Duration::hours(2), Some(10)),
        push_up_session(now() - Duration::days(1), Some(10)),
        push_up_session(now() - Duration::days(2), Some(10)),
        push_up_session(now() - Duration::days(6), Some(10)),
    ];

    let state = StreakModel::new(StreakConfig::default()).analyze(&sessions, now());
    assert_eq!(state.current_streak, 3);
    assert_eq!(state.best_streak, 3);
    assert_eq!(state.total_workout_days, 4);
    assert_eq!(state.days_since_last, Some(0));
    assert!(!state.fragile);
}

#[test]
fn test_streak_gap_shrinks_next_workout() {
    let sessions = vec![push_up_session(now() - Duration::days(4), Some(10))];
    let model = StreakModel::new(StreakConfig::default());
    let state = model.analyze(&sessions, now());
    assert_eq!(state.current_streak, 0);
    assert!(state.fragile);

    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let adjustment = model.adjustment(&state, &mut rng);
    assert!(adjustment.is_active());
    assert!((0.15..=0.20).contains(&adjustment.duration_cut));
    assert!((0.075..=0.10).contains(&adjustment.quantity_cut));
    assert_eq!(adjustment.apply_quantity(1), 1);
}

proptest! {
    #[test]
    fn prop_recovery_monotonic_in_hours(
        hours in 0.0f64..200.0,
        extra in 0.0f64..200.0,
        intensity in 0.0f64..=1.0,
    ) {
        let model = RecoveryModel::new(RecoveryConfig::default());
        let earlier = model.recovery_after(MuscleGroup::Legs, hours, intensity);
        let later = model.recovery_after(MuscleGroup::Legs, hours + extra, intensity);
        prop_assert!((0.0..=1.0).contains(&earlier));
        prop_assert!(later >= earlier);
    }

    #[test]
    fn prop_recovery_bounded_for_any_timestamp(offset_hours in -100i64..500, intensity in 0.0f64..=1.0) {
        let mut model = RecoveryModel::new(RecoveryConfig::default());
        model.insert(RecoveryRecord {
            muscle_group: MuscleGroup::Core,
            last_worked: now() - Duration::hours(offset_hours),
            intensity,
        });
        let recovery = model.recovery(MuscleGroup::Core, now());
        prop_assert!((0.0..=1.0).contains(&recovery));
        prop_assert_eq!(model.recovery(MuscleGroup::Arms, now()), 1.0);
    }

    #[test]
    fn prop_mastery_within_bounds(results in proptest::collection::vec(proptest::option::of(0u32..40), 1..12)) {
        let sessions: Vec<Session> = results
            .iter()
            .enumerate()
            .map(|(i, actual)| push_up_session(now() - Duration::days(i as i64 + 1), *actual))
            .collect();

        let record = MasteryModel::default().score_exercise("Push-ups", &sessions);
        prop_assert!((0.0..=100.0).contains(&record.score));
        prop_assert_eq!(record.attempts as usize, results.len());
    }
}
