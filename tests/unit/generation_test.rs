//! Unit tests for the workout generator.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustrep::catalog::Equipment;
use rustrep::generation::{EnergyLevel, FrameworkPolicy, SessionIntent};
use rustrep::profile::Goal;
use rustrep::{
    EngineConfig, EngineError, ExerciseCatalog, Framework, GenerationRequest, PersonalRecordBook, Profile,
    WorkoutGenerator,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 6, 45, 0).unwrap()
}

#[test]
fn test_empty_catalog_is_an_error() {
    let generator = WorkoutGenerator::new(ExerciseCatalog::new(Vec::new()), EngineConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let result = generator.generate(
        &Profile::default(),
        &[],
        &PersonalRecordBook::new(),
        &GenerationRequest::new(now()),
        &mut rng,
    );
    assert!(matches!(result, Err(EngineError::EmptyCatalog)));
}

#[test]
fn test_inverted_or_zero_duration_is_an_error() {
    let generator = WorkoutGenerator::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for (min, max) in [(20, 10), (0, 10)] {
        let request = GenerationRequest::new(now()).with_duration_range(min, max);
        let result = generator.generate(&Profile::default(), &[], &PersonalRecordBook::new(), &request, &mut rng);
        assert!(matches!(result, Err(EngineError::InvalidDuration(_))));
    }
}

#[test]
fn test_requested_duration_range_is_honored() {
    let generator = WorkoutGenerator::builtin();
    let profile = Profile::new(55.0, Some(Goal::Strength));
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let request = GenerationRequest::new(now())
            .with_framework(Framework::FixedMinute)
            .with_duration_range(10, 12);
        let workout = generator
            .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut rng)
            .unwrap();
        assert!((10..=12).contains(&workout.duration_minutes));
        assert_eq!(workout.rounds.len() as u32, workout.duration_minutes);
    }
}

#[test]
fn test_same_seed_same_workout() {
    let generator = WorkoutGenerator::builtin();
    let profile = Profile::new(62.0, Some(Goal::FatLoss)).with_equipment(&[Equipment::Kettlebell]);
    let request = GenerationRequest::new(now()).with_intent(SessionIntent::new("quick sweaty cardio"));

    let first = generator
        .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut ChaCha8Rng::seed_from_u64(99))
        .unwrap();
    let second = generator
        .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut ChaCha8Rng::seed_from_u64(99))
        .unwrap();

    assert_eq!(first.framework, second.framework);
    assert_eq!(first.duration_minutes, second.duration_minutes);
    assert_eq!(first.rounds, second.rounds);
}

#[test]
fn test_low_energy_never_longer_than_high_energy() {
    let generator = WorkoutGenerator::builtin();
    let profile = Profile::new(50.0, None);
    let build = |energy| {
        let request = GenerationRequest::new(now())
            .with_framework(Framework::FixedMinute)
            .with_intent(SessionIntent::default().with_energy(energy));
        generator
            .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut ChaCha8Rng::seed_from_u64(17))
            .unwrap()
    };

    assert!(build(EnergyLevel::Low).duration_minutes <= build(EnergyLevel::High).duration_minutes);
}

#[test]
fn test_rationale_and_focus_are_filled() {
    let generator = WorkoutGenerator::builtin();
    let profile = Profile::new(30.0, Some(Goal::Mobility));
    let request = GenerationRequest::new(now()).with_intent(SessionIntent::new("").with_focus("Morning reset"));
    let workout = generator
        .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut ChaCha8Rng::seed_from_u64(6))
        .unwrap();

    assert_eq!(workout.focus, "Morning reset");
    assert!(!workout.rationale.framework.is_empty());
    assert!(!workout.rationale.intensity.is_empty());
    assert!(!workout.rationale.exercise_selection.is_empty());
    let total: u32 = workout.muscle_load.values().sum();
    assert_eq!(total as usize, workout.rounds.len());
}

fn framework_strategy() -> impl Strategy<Value = Framework> {
    prop_oneof![
        Just(Framework::FixedMinute),
        Just(Framework::WorkRest),
        Just(Framework::CountdownCircuit),
        Just(Framework::RepeatedCircuit),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_workouts_respect_floors(
        seed in any::<u64>(),
        skill in 0.0f64..=100.0,
        framework in framework_strategy(),
    ) {
        let generator = WorkoutGenerator::builtin();
        let profile = Profile::new(skill, None);
        let request = GenerationRequest::new(now()).with_framework(framework);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let workout = generator
            .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut rng)
            .unwrap();
        let policy = FrameworkPolicy::for_framework(framework, generator.config());

        prop_assert_eq!(workout.framework, framework);
        prop_assert!(workout.duration_minutes >= policy.minimum_minutes);
        prop_assert!(!workout.rounds.is_empty());
        prop_assert!(workout.rounds.iter().all(|r| r.target >= 1));
        prop_assert!(workout.pr_attempts().count() <= 1);
        prop_assert!(workout.pr_attempts().all(|r| r.index >= 3));
    }

    #[test]
    fn prop_no_back_to_back_exercise(
        seed in any::<u64>(),
        skill in 0.0f64..=100.0,
        countdown in any::<bool>(),
    ) {
        let framework = if countdown { Framework::CountdownCircuit } else { Framework::FixedMinute };
        let generator = WorkoutGenerator::builtin();
        let profile = Profile::new(skill, None);
        let request = GenerationRequest::new(now()).with_framework(framework);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let workout = generator
            .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut rng)
            .unwrap();
        for pair in workout.rounds.windows(2) {
            prop_assert_ne!(&pair[0].exercise, &pair[1].exercise);
        }
    }
}
