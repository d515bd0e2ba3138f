//! Unit tests for the exercise catalog and eligibility filter.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustrep::catalog::{DifficultyTier, EligibilityFilter, Equipment, ExerciseCatalog};
use rustrep::EngineError;

#[test]
fn test_builtin_catalog_has_bodyweight_coverage() {
    let catalog = ExerciseCatalog::builtin();
    assert!(!catalog.is_empty());

    for tier in [
        DifficultyTier::Beginner,
        DifficultyTier::Intermediate,
        DifficultyTier::Advanced,
    ] {
        let bodyweight_at_tier = catalog
            .exercises()
            .iter()
            .filter(|e| e.equipment.iter().all(|eq| *eq == Equipment::Bodyweight))
            .filter(|e| e.difficulty == tier)
            .count();
        assert!(bodyweight_at_tier > 0, "no bodyweight exercise at {}", tier);
    }
}

#[test]
fn test_catalog_lookup_ignores_case() {
    let catalog = ExerciseCatalog::builtin();
    let push_ups = catalog.get("push-ups").expect("push-ups in catalog");
    assert_eq!(push_ups.name, "Push-ups");
    assert!(catalog.get("Underwater Basket Weaving").is_none());
}

#[test]
fn test_catalog_json_reload() {
    let catalog = ExerciseCatalog::builtin();
    let json = serde_json::to_string(catalog.exercises()).unwrap();

    let reloaded = ExerciseCatalog::from_json(&json).unwrap();
    assert_eq!(reloaded.len(), catalog.len());
    assert_eq!(reloaded.get("Plank"), catalog.get("Plank"));
}

#[test]
fn test_catalog_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        ExerciseCatalog::from_json_file(&missing),
        Err(EngineError::Catalog(_))
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(ExerciseCatalog::from_json_file(&broken).is_err());
}

#[test]
fn test_filter_respects_equipment() {
    let catalog = ExerciseCatalog::builtin();
    let owned: BTreeSet<Equipment> = [Equipment::Dumbbells].into_iter().collect();
    let filter = EligibilityFilter::new(DifficultyTier::Advanced, &owned, 0.0);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let eligible = filter.apply(&catalog, &mut rng);
    assert!(eligible.iter().any(|e| e.name == "Dumbbell Rows"));
    assert!(eligible.iter().all(|e| e
        .equipment
        .iter()
        .all(|eq| matches!(eq, Equipment::Bodyweight | Equipment::Dumbbells))));
    assert!(eligible.iter().all(|e| e.name != "Kettlebell Swings"));
}

#[test]
fn test_filter_caps_difficulty_at_tier() {
    let catalog = ExerciseCatalog::builtin();
    let filter = EligibilityFilter::new(DifficultyTier::Intermediate, &BTreeSet::new(), 1.0);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let eligible = filter.apply(&catalog, &mut rng);
    assert!(!eligible.is_empty());
    assert!(eligible
        .iter()
        .all(|e| e.difficulty <= DifficultyTier::Intermediate));
}

#[test]
fn test_beginner_stretch_probability_bounds() {
    let catalog = ExerciseCatalog::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let never = EligibilityFilter::new(DifficultyTier::Beginner, &BTreeSet::new(), 0.0);
    assert!(never
        .apply(&catalog, &mut rng)
        .iter()
        .all(|e| e.difficulty == DifficultyTier::Beginner));

    let always = EligibilityFilter::new(DifficultyTier::Beginner, &BTreeSet::new(), 1.0);
    let stretched = always.apply(&catalog, &mut rng);
    assert!(stretched
        .iter()
        .any(|e| e.difficulty == DifficultyTier::Intermediate));
    assert!(stretched
        .iter()
        .all(|e| e.difficulty != DifficultyTier::Advanced));
}
