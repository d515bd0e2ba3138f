//! Integration tests for end-to-end workout generation.
//!
//! Covers:
//! - A first workout for a new user with no equipment
//! - Every framework against the built-in catalog
//! - Engine tuning loaded from a config file

use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustrep::catalog::Equipment;
use rustrep::config::{load_config_from, save_config_to};
use rustrep::profile::Goal;
use rustrep::{EngineConfig, ExerciseCatalog, Framework, GenerationRequest, PersonalRecordBook, Profile, WorkoutGenerator};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 17, 15, 0).unwrap()
}

#[test]
fn test_first_workout_for_new_bodyweight_user() {
    let generator = WorkoutGenerator::builtin();
    let profile = Profile::new(50.0, Some(Goal::CardioEndurance));
    let request = GenerationRequest::new(now()).with_framework(Framework::FixedMinute);

    for seed in 0..25 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let workout = generator
            .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut rng)
            .unwrap();

        // Goal window 15-25 narrowed by the intermediate window 12-22
        assert!(
            (15..=22).contains(&workout.duration_minutes),
            "seed {}: {} minutes",
            seed,
            workout.duration_minutes
        );
        assert_eq!(workout.rounds.len() as u32, workout.duration_minutes);
        assert_eq!(workout.focus, "Cardio Endurance");

        for round in &workout.rounds {
            let definition = generator.catalog().get(&round.exercise).unwrap();
            assert!(definition.equipment.iter().all(|e| *e == Equipment::Bodyweight));
            assert_eq!(round.work_seconds, Some(60));
        }
        for pair in workout.rounds.windows(2) {
            assert_ne!(pair[0].exercise, pair[1].exercise);
        }
        for (i, round) in workout.rounds.iter().enumerate() {
            assert_eq!(round.index, i as u32 + 1);
        }
    }
}

#[test]
fn test_every_framework_builds_a_runnable_workout() {
    let generator = WorkoutGenerator::builtin();
    let profile = Profile::new(75.0, Some(Goal::GeneralFitness))
        .with_equipment(&[Equipment::Dumbbells, Equipment::JumpRope]);

    for framework in Framework::all() {
        let request = GenerationRequest::new(now()).with_framework(framework);
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let workout = generator
            .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut rng)
            .unwrap();

        assert_eq!(workout.framework, framework);
        assert!(!workout.rounds.is_empty(), "{} has no rounds", framework);

        match framework {
            Framework::WorkRest => {
                assert_eq!(workout.rounds.len() % 8, 0);
                assert!(workout
                    .rounds
                    .iter()
                    .all(|r| r.work_seconds == Some(20) && r.rest_seconds == Some(10)));
            }
            Framework::RepeatedCircuit => {
                let passes = workout.rounds.iter().filter_map(|r| r.circuit_round).max().unwrap();
                assert!(passes >= 2);
                assert_eq!(workout.rounds.len() as u32 % passes, 0);
                assert_eq!(workout.rounds.last().and_then(|r| r.rest_seconds), None);
            }
            Framework::CountdownCircuit => {
                assert_eq!(workout.exercise_names().len(), workout.rounds.len());
            }
            Framework::FixedMinute => {
                assert_eq!(workout.rounds.len() as u32, workout.duration_minutes);
            }
        }

        let session = workout.to_session();
        assert_eq!(session.id, workout.id);
        assert_eq!(session.rounds.len(), workout.rounds.len());
        assert!(session.rounds.iter().all(|r| r.actual.is_none() && !r.skipped));
    }
}

#[test]
fn test_generator_uses_tuning_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.toml");
    let mut config = EngineConfig::default();
    config.duration.fixed_minute_min = 14;
    config.duration.fixed_minute_ranges.beginner.min = 14;
    config.duration.fixed_minute_ranges.beginner.max = 16;
    save_config_to(&path, &config).unwrap();

    let loaded = load_config_from(&path).unwrap();
    let generator = WorkoutGenerator::new(ExerciseCatalog::builtin(), loaded);
    let profile = Profile::new(20.0, None);
    let request = GenerationRequest::new(now()).with_framework(Framework::FixedMinute);

    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let workout = generator
            .generate(&profile, &[], &PersonalRecordBook::new(), &request, &mut rng)
            .unwrap();
        // Beginner nudge takes one minute off before the floor applies
        assert!((14..=15).contains(&workout.duration_minutes));
    }
}
