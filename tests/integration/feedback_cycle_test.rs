//! Integration tests for the generate, perform, feed back loop.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustrep::catalog::{DifficultyTier, MuscleGroup};
use rustrep::feedback::{
    overload_bumps, OverloadDetector, PreferenceModel, RecordDetector, SkillModel,
};
use rustrep::generation::Workout;
use rustrep::profile::Goal;
use rustrep::session::{QuantityUnit, Round};
use rustrep::signals::{MasteryModel, StreakModel};
use rustrep::{ExerciseCatalog, EngineConfig, Framework, GenerationRequest, PersonalRecordBook, Profile, Session, WorkoutGenerator};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 5, 7, 0, 0).unwrap()
}

/// Perform a workout, beating every target by a quarter.
fn perform_strongly(workout: &Workout) -> Session {
    let mut session = workout.to_session().with_exertion(2).completed();
    for round in &mut session.rounds {
        round.actual = Some(round.target * 5 / 4 + 1);
    }
    session
}

#[test]
fn test_strong_session_feeds_every_signal() {
    let config = EngineConfig::default();
    let generator = WorkoutGenerator::builtin();
    let mut profile = Profile::new(50.0, Some(Goal::Strength));
    let mut records = PersonalRecordBook::new();
    let mut rng = ChaCha8Rng::seed_from_u64(31);

    let request = GenerationRequest::new(start()).with_framework(Framework::FixedMinute);
    let first = generator.generate(&profile, &[], &records, &request, &mut rng).unwrap();
    let history = vec![perform_strongly(&first)];

    // An empty book turns every performed exercise into a record
    let detector = RecordDetector::new(config.records.clone());
    let detection = detector.detect(&history[0], &records);
    assert_eq!(detection.new_records.len(), first.exercise_names().len());
    assert!(detection.near_misses.is_empty());
    records.apply(&detection);
    assert_eq!(records.len(), first.exercise_names().len());

    let update = SkillModel::new(config.skill.clone(), config.insights.hit_rate_cap).apply(&mut profile, &history);
    assert!(update.sustained_progress);
    assert!(profile.skill_score > 50.0);

    let preferences = PreferenceModel::new(config.preference.clone(), config.insights.hit_rate_cap)
        .score_all(&history, start() + Duration::days(1));
    let fixed_minute = preferences
        .iter()
        .find(|p| p.framework == Framework::FixedMinute)
        .unwrap();
    assert_eq!(fixed_minute.sessions, 1);
    assert!(fixed_minute.score > config.preference.neutral_score);

    let streak = StreakModel::new(config.streak.clone()).analyze(&history, start() + Duration::days(1));
    assert_eq!(streak.current_streak, 1);
    assert!(streak.fragile);

    // Next day: rested, fresh and holding records
    let next_request = GenerationRequest::new(start() + Duration::days(1)).with_framework(Framework::FixedMinute);
    let second = generator
        .generate(&profile, &history, &records, &next_request, &mut rng)
        .unwrap();

    let attempts: Vec<_> = second.pr_attempts().collect();
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].index >= 3);
    let any_known = second
        .rounds
        .iter()
        .filter(|r| r.index >= 3)
        .any(|r| first.exercise_names().contains(&r.exercise.as_str()));
    if any_known {
        assert!(first.exercise_names().contains(&attempts[0].exercise.as_str()));
    }
}

#[test]
fn test_same_day_session_blocks_pr_attempts() {
    let generator = WorkoutGenerator::builtin();
    let profile = Profile::new(65.0, None);
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let request = GenerationRequest::new(start()).with_framework(Framework::CountdownCircuit);
    let first = generator
        .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut rng)
        .unwrap();
    let history = vec![perform_strongly(&first)];

    let later_today = GenerationRequest::new(start() + Duration::hours(3));
    let second = generator
        .generate(&profile, &history, &PersonalRecordBook::new(), &later_today, &mut rng)
        .unwrap();
    assert_eq!(second.pr_attempts().count(), 0);
}

fn push_ups_history(framework: Framework, target: u32, actual: u32) -> Vec<Session> {
    (1..=3)
        .map(|days_ago| {
            let round = Round::planned(1, "Push-ups", MuscleGroup::Chest, DifficultyTier::Intermediate, target, QuantityUnit::Reps)
                .with_actual(actual);
            Session::new(framework, DifficultyTier::Intermediate, start() - Duration::days(days_ago))
                .with_duration(10)
                .with_rounds(vec![round])
                .with_exertion(3)
                .completed()
        })
        .collect()
}

fn push_up_target(workout: &Workout) -> u32 {
    workout
        .rounds
        .iter()
        .find(|r| r.exercise == "Push-ups")
        .map(|r| r.target)
        .unwrap()
}

/// Fixed-minute workouts over push-ups and squats, without and with the
/// overload bumps detected in `history`.
fn plain_and_pushed(history: &[Session]) -> (Workout, Workout) {
    let builtin = ExerciseCatalog::builtin();
    let catalog = ExerciseCatalog::new(vec![
        builtin.get("Push-ups").unwrap().clone(),
        builtin.get("Air Squats").unwrap().clone(),
    ]);
    let generator = WorkoutGenerator::new(catalog, EngineConfig::default());
    let profile = Profile::new(50.0, None);

    let mastery = MasteryModel::default().score_all(history);
    let recommendations = OverloadDetector::default().detect(history, &mastery);
    assert_eq!(recommendations.len(), 1);
    assert!(recommendations[0].recommended_target > recommendations[0].current_target);

    let base = GenerationRequest::new(start()).with_framework(Framework::FixedMinute);
    let overloaded = base.clone().with_overloads(overload_bumps(&recommendations));

    let plain = generator
        .generate(&profile, history, &PersonalRecordBook::new(), &base, &mut ChaCha8Rng::seed_from_u64(5))
        .unwrap();
    let pushed = generator
        .generate(&profile, history, &PersonalRecordBook::new(), &overloaded, &mut ChaCha8Rng::seed_from_u64(5))
        .unwrap();
    (plain, pushed)
}

#[test]
fn test_overload_carries_into_next_workout() {
    let history = push_ups_history(Framework::FixedMinute, 14, 17);
    let (plain, pushed) = plain_and_pushed(&history);

    assert!(push_up_target(&pushed) > push_up_target(&plain));
    assert!(pushed
        .rounds
        .windows(2)
        .all(|pair| pair[0].exercise != pair[1].exercise));
}

#[test]
fn test_work_rest_overload_raises_fixed_minute_target() {
    // Work/rest targets are halved for the 20 second window
    let history = push_ups_history(Framework::WorkRest, 7, 10);
    let (plain, pushed) = plain_and_pushed(&history);

    assert_eq!(plain.exercise_names(), pushed.exercise_names());
    assert!(push_up_target(&pushed) > push_up_target(&plain));
    assert!(push_up_target(&pushed) > 10);
}
