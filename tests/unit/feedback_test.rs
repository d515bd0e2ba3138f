//! Unit tests for the adaptive feedback loop.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustrep::catalog::{DifficultyTier, MuscleGroup};
use rustrep::config::PreferenceConfig;
use rustrep::feedback::{
    overload_bumps, ChoiceReason, OverloadDetector, PersonalRecord, PreferenceModel, RecordDetector,
    SkillModel,
};
use rustrep::session::{PrModality, QuantityUnit, Round};
use rustrep::signals::{InsightsAnalyzer, MasteryModel};
use rustrep::{Framework, PersonalRecordBook, Profile, Session};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 20, 12, 0, 0).unwrap()
}

fn session(framework: Framework, days_ago: i64, rounds: Vec<Round>, rpe: u8) -> Session {
    Session::new(framework, DifficultyTier::Intermediate, now() - Duration::days(days_ago))
        .with_duration(12)
        .with_rounds(rounds)
        .with_exertion(rpe)
        .completed()
}

fn reps(exercise: &str, muscle: MuscleGroup, target: u32, actual: u32) -> Round {
    Round::planned(1, exercise, muscle, DifficultyTier::Intermediate, target, QuantityUnit::Reps).with_actual(actual)
}

fn skipped(exercise: &str, muscle: MuscleGroup, target: u32) -> Round {
    Round::planned(1, exercise, muscle, DifficultyTier::Intermediate, target, QuantityUnit::Reps).skip()
}

fn book_with(exercise: &str, value: f64) -> PersonalRecordBook {
    let mut book = PersonalRecordBook::new();
    book.insert(PersonalRecord {
        exercise: exercise.to_string(),
        modality: PrModality::Reps,
        value,
        session_id: None,
        round_index: None,
        achieved_at: now() - Duration::days(30),
    });
    book
}

#[test]
fn test_skill_rises_on_sustained_progress() {
    let history: Vec<Session> = (1..=6)
        .map(|d| {
            session(
                Framework::FixedMinute,
                d,
                vec![reps("Push-ups", MuscleGroup::Chest, 10, 13), reps("Air Squats", MuscleGroup::Legs, 18, 23)],
                3,
            )
        })
        .collect();

    let mut profile = Profile::new(50.0, None);
    let update = SkillModel::default().apply(&mut profile, &history);
    assert!(update.sustained_progress);
    assert!(update.delta > 0.0);
    assert_eq!(profile.skill_score, update.new_score);
}

#[test]
fn test_skill_falls_on_struggle() {
    let history: Vec<Session> = (1..=4)
        .map(|d| {
            session(
                Framework::FixedMinute,
                d,
                vec![reps("Burpees", MuscleGroup::FullBody, 10, 5), skipped("Burpees", MuscleGroup::FullBody, 10)],
                5,
            )
        })
        .collect();

    let update = SkillModel::default().update(60.0, &history);
    assert!(update.sustained_struggle);
    assert!(update.delta < 0.0);
    assert!(update.delta >= -12.0);
}

#[test]
fn test_skill_unchanged_without_history() {
    let mut profile = Profile::new(42.0, None);
    let update = SkillModel::default().apply(&mut profile, &[]);
    assert_eq!(update.sessions_considered, 0);
    assert_eq!(profile.skill_score, 42.0);
}

#[test]
fn test_overload_after_three_strong_sessions() {
    let history: Vec<Session> = (1..=3)
        .map(|d| session(Framework::FixedMinute, d, vec![reps("Push-ups", MuscleGroup::Chest, 10, 12)], 3))
        .collect();
    let mastery = MasteryModel::default().score_all(&history);

    let recommendations = OverloadDetector::default().detect(&history, &mastery);
    assert_eq!(recommendations.len(), 1);
    let push_ups = &recommendations[0];
    assert_eq!(push_ups.exercise, "Push-ups");
    assert_eq!(push_ups.current_target, 10);
    assert!(push_ups.recommended_target > 10);
    assert!(push_ups.mastery > 0.0);

    let bumps = overload_bumps(&recommendations);
    let bump = bumps["Push-ups"];
    assert_eq!(bump.unit, QuantityUnit::Reps);
    assert_eq!(bump.apply(10), push_ups.recommended_target);
}

#[test]
fn test_no_overload_with_short_or_mixed_history() {
    let short: Vec<Session> = (1..=2)
        .map(|d| session(Framework::FixedMinute, d, vec![reps("Push-ups", MuscleGroup::Chest, 10, 14)], 3))
        .collect();
    assert!(OverloadDetector::default()
        .detect(&short, &MasteryModel::default().score_all(&short))
        .is_empty());

    let mixed: Vec<Session> = [14, 10, 14]
        .iter()
        .enumerate()
        .map(|(i, actual)| {
            session(Framework::FixedMinute, i as i64 + 1, vec![reps("Push-ups", MuscleGroup::Chest, 10, *actual)], 3)
        })
        .collect();
    assert!(OverloadDetector::default()
        .detect(&mixed, &MasteryModel::default().score_all(&mixed))
        .is_empty());
}

#[test]
fn test_record_detection_thresholds() {
    let book = book_with("Push-ups", 20.0);
    let detector = RecordDetector::new(Default::default());
    let with_reps = |actual| session(Framework::FixedMinute, 0, vec![reps("push-ups", MuscleGroup::Chest, 15, actual)], 3);

    let beaten = detector.detect(&with_reps(21), &book);
    assert_eq!(beaten.new_records.len(), 1);
    assert_eq!(beaten.new_records[0].previous_value, Some(20.0));

    let close = detector.detect(&with_reps(19), &book);
    assert!(close.new_records.is_empty());
    assert_eq!(close.near_misses.len(), 1);
    assert_eq!(close.near_misses[0].record_value, 20.0);

    assert!(detector.detect(&with_reps(18), &book).is_empty());
}

#[test]
fn test_record_book_applies_new_records() {
    let mut book = book_with("Push-ups", 20.0);
    let detector = RecordDetector::new(Default::default());
    let latest = session(
        Framework::FixedMinute,
        0,
        vec![reps("Push-ups", MuscleGroup::Chest, 15, 23), reps("Burpees", MuscleGroup::FullBody, 10, 11)],
        3,
    );

    let detection = detector.detect(&latest, &book);
    assert_eq!(detection.new_records.len(), 2);
    book.apply(&detection);
    assert_eq!(book.len(), 2);
    assert_eq!(book.get("PUSH-UPS", PrModality::Reps).map(|r| r.value), Some(23.0));
    assert_eq!(book.get("Burpees", PrModality::Reps).map(|r| r.session_id), Some(Some(latest.id)));
}

#[test]
fn test_pr_readiness_gates() {
    let detector = RecordDetector::new(Default::default());
    let fresh = InsightsAnalyzer::new(Default::default()).analyze(&[]);
    assert!(detector.readiness(&fresh, now()).ready);

    let recent = vec![session(Framework::FixedMinute, 0, vec![reps("Push-ups", MuscleGroup::Chest, 10, 10)], 3)];
    let insights = InsightsAnalyzer::new(Default::default()).analyze(&recent);
    let readiness = detector.readiness(&insights, now());
    assert!(!readiness.ready);
    assert_eq!(readiness.blockers.len(), 1);

    let tomorrow = detector.readiness(&insights, now() + Duration::days(1));
    assert!(tomorrow.ready);
}

#[test]
fn test_preference_keeps_goal_framework_without_history() {
    let model = PreferenceModel::new(
        PreferenceConfig {
            explore_probability: 0.0,
            ..Default::default()
        },
        1.5,
    );
    let preferences = model.score_all(&[], now());
    assert_eq!(preferences.len(), 4);
    assert!(preferences.iter().all(|p| p.sessions == 0 && p.score == 0.5));

    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let choice = model.choose(&preferences, Framework::WorkRest, &mut rng);
    assert_eq!(choice.framework, Framework::WorkRest);
    assert_eq!(choice.reason, ChoiceReason::GoalImplied);
}

#[test]
fn test_preference_moves_to_best_scorer() {
    let model = PreferenceModel::new(
        PreferenceConfig {
            explore_probability: 0.0,
            ..Default::default()
        },
        1.5,
    );
    let history = vec![
        session(Framework::CountdownCircuit, 1, vec![reps("Burpees", MuscleGroup::FullBody, 10, 14)], 2),
        session(Framework::CountdownCircuit, 3, vec![reps("Burpees", MuscleGroup::FullBody, 10, 13)], 2),
        session(Framework::WorkRest, 2, vec![skipped("Burpees", MuscleGroup::FullBody, 10)], 5),
    ];

    let preferences = model.score_all(&history, now());
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let choice = model.choose(&preferences, Framework::WorkRest, &mut rng);
    assert_eq!(choice.framework, Framework::CountdownCircuit);
    assert_eq!(choice.reason, ChoiceReason::HighestScore);
}

proptest! {
    #[test]
    fn prop_skill_update_stays_in_bounds(
        current in 0.0f64..=100.0,
        results in proptest::collection::vec((proptest::option::of(0u32..30), 1u8..=5), 1..10),
    ) {
        let history: Vec<Session> = results
            .iter()
            .enumerate()
            .map(|(i, (actual, rpe))| {
                let round = match actual {
                    Some(actual) => reps("Push-ups", MuscleGroup::Chest, 10, *actual),
                    None => skipped("Push-ups", MuscleGroup::Chest, 10),
                };
                session(Framework::FixedMinute, i as i64 + 1, vec![round], *rpe)
            })
            .collect();

        let update = SkillModel::default().update(current, &history);
        prop_assert!((0.0..=100.0).contains(&update.new_score));
        prop_assert!(update.delta.abs() <= 12.0 + 1e-9);
    }
}
