//! Engine tuning configuration.
//!
//! Every scoring constant lives here so the selection and feedback pipelines
//! can be audited (and overridden from `engine.toml`) in one place.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::types::DifficultyTier;
use crate::generation::types::DurationRange;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub selection: SelectionConfig,
    pub insights: InsightsConfig,
    pub recovery: RecoveryConfig,
    pub mastery: MasteryConfig,
    pub duration: DurationConfig,
    pub quantity: QuantityConfig,
    pub skill: SkillConfig,
    pub overload: OverloadConfig,
    pub streak: StreakConfig,
    pub records: RecordsConfig,
    pub preference: PreferenceConfig,
}

/// Inclusive `[min, max]` band of fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Linear interpolation inside the band (`t` in 0..=1).
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + (self.max - self.min) * t.clamp(0.0, 1.0)
    }
}

/// One value per difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerTier<T> {
    pub beginner: T,
    pub intermediate: T,
    pub advanced: T,
}

impl<T: Copy> PerTier<T> {
    pub fn get(&self, tier: DifficultyTier) -> T {
        match tier {
            DifficultyTier::Beginner => self.beginner,
            DifficultyTier::Intermediate => self.intermediate,
            DifficultyTier::Advanced => self.advanced,
        }
    }
}

/// Candidate filtering and bandit selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Chance an intermediate exercise enters a beginner pool
    pub beginner_stretch_probability: f64,
    /// Intervals an exercise stays blocked after use
    pub recency_window: usize,
    /// Recovery below this blocks high-intensity moves
    pub severe_recovery_threshold: f64,
    /// Recovery at or above this carries full weight
    pub full_recovery_threshold: f64,
    /// Weight floor for under-recovered high-intensity moves
    pub high_intensity_recovery_floor: f64,
    /// Weight floor for other under-recovered moves
    pub standard_recovery_floor: f64,
    /// Multiplier on summed matching category bias
    pub category_weight: f64,
    /// Boost for exercises not yet used in the workout
    pub unused_multiplier: f64,
    /// Divisor growth per prior use in the workout
    pub usage_penalty: f64,
    /// Recency divisor is `1 + scale / intervals_since_use`
    pub recency_penalty_scale: f64,
    pub epsilon_fixed_minute: f64,
    pub epsilon_work_rest: f64,
    pub epsilon_countdown_circuit: f64,
    pub epsilon_repeated_circuit: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            beginner_stretch_probability: 0.3,
            recency_window: 4,
            severe_recovery_threshold: 0.35,
            full_recovery_threshold: 0.8,
            high_intensity_recovery_floor: 0.15,
            standard_recovery_floor: 0.5,
            category_weight: 10.0,
            unused_multiplier: 10.0,
            usage_penalty: 1.5,
            recency_penalty_scale: 2.0,
            epsilon_fixed_minute: 0.12,
            epsilon_work_rest: 0.15,
            epsilon_countdown_circuit: 0.15,
            epsilon_repeated_circuit: 0.12,
        }
    }
}

/// Rolling personalization statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// Number of recent sessions considered
    pub window: usize,
    /// Upper cap on a single hit-rate sample
    pub hit_rate_cap: f64,
    pub fatigue_skip_weight: f64,
    pub fatigue_shortfall_weight: f64,
    pub fatigue_rpe_weight: f64,
    /// RPE assumed when none was reported
    pub neutral_rpe: f64,
    pub muscle_preference_sensitivity: f64,
    pub muscle_preference_min: f64,
    pub muscle_preference_max: f64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            window: 8,
            hit_rate_cap: 1.5,
            fatigue_skip_weight: 0.6,
            fatigue_shortfall_weight: 1.2,
            fatigue_rpe_weight: 0.2,
            neutral_rpe: 3.0,
            muscle_preference_sensitivity: 0.8,
            muscle_preference_min: 0.8,
            muscle_preference_max: 1.3,
        }
    }
}

/// Per-muscle recovery decay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Cardio and full-body groups
    pub conditioning_base_hours: f64,
    /// Chest, back, legs and glutes
    pub major_base_hours: f64,
    pub default_base_hours: f64,
    pub intensity_floor: f64,
    pub intensity_span: f64,
    pub rpe_weight: f64,
    pub difficulty_weight: f64,
    pub completion_weight: f64,
    pub difficulty_intensity: PerTier<f64>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            conditioning_base_hours: 24.0,
            major_base_hours: 48.0,
            default_base_hours: 36.0,
            intensity_floor: 0.7,
            intensity_span: 0.8,
            rpe_weight: 0.4,
            difficulty_weight: 0.3,
            completion_weight: 0.3,
            difficulty_intensity: PerTier {
                beginner: 0.3,
                intermediate: 0.6,
                advanced: 0.9,
            },
        }
    }
}

/// Per-exercise mastery composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MasteryConfig {
    pub completion_weight: f64,
    pub quality_weight: f64,
    pub consistency_weight: f64,
    pub progression_weight: f64,
    /// Upper cap on a single hit-rate sample
    pub hit_rate_cap: f64,
    pub min_consistency_samples: usize,
    pub min_progression_samples: usize,
    pub progression_window: usize,
    pub slope_gain: f64,
    /// Component value used when there are too few samples
    pub neutral_component: f64,
}

impl Default for MasteryConfig {
    fn default() -> Self {
        Self {
            completion_weight: 0.4,
            quality_weight: 0.3,
            consistency_weight: 0.2,
            progression_weight: 0.1,
            hit_rate_cap: 1.5,
            min_consistency_samples: 3,
            min_progression_samples: 4,
            progression_window: 6,
            slope_gain: 2.0,
            neutral_component: 0.5,
        }
    }
}

/// Duration resolution per framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    pub fixed_minute_min: u32,
    pub fixed_minute_max: u32,
    pub work_rest_min: u32,
    pub countdown_circuit_min: u32,
    pub countdown_circuit_max: u32,
    pub repeated_circuit_min: u32,
    pub fixed_minute_ranges: PerTier<DurationRange>,
    pub countdown_circuit_ranges: PerTier<DurationRange>,
    pub beginner_nudge: i32,
    pub advanced_nudge: i32,
    /// Non-bodyweight items needed for the full bonus
    pub full_equipment_items: usize,
    pub partial_equipment_items: usize,
    pub full_equipment_bonus: u32,
    pub partial_equipment_bonus: u32,
    pub tuning_hit_gain: f64,
    pub tuning_skip_penalty: f64,
    pub tuning_min: f64,
    pub tuning_max: f64,
    pub low_energy_multiplier: f64,
    pub high_energy_multiplier: f64,
    pub work_rest_work_seconds: u32,
    pub work_rest_rest_seconds: u32,
    pub work_rest_intervals: u32,
    pub circuit_work_seconds: PerTier<u32>,
    pub circuit_transition_seconds: u32,
    pub circuit_base_rest_seconds: u32,
    pub circuit_rest_fatigue_gain: f64,
    pub circuit_rest_min_seconds: u32,
    pub circuit_rest_max_seconds: u32,
    pub circuit_low_energy_rest_bonus: u32,
    /// Floor for per-exercise work seconds after streak shrinking
    pub circuit_min_work_seconds: u32,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            fixed_minute_min: 6,
            fixed_minute_max: 35,
            work_rest_min: 8,
            countdown_circuit_min: 8,
            countdown_circuit_max: 24,
            repeated_circuit_min: 10,
            fixed_minute_ranges: PerTier {
                beginner: DurationRange::new(8, 15),
                intermediate: DurationRange::new(12, 22),
                advanced: DurationRange::new(18, 30),
            },
            countdown_circuit_ranges: PerTier {
                beginner: DurationRange::new(8, 12),
                intermediate: DurationRange::new(10, 16),
                advanced: DurationRange::new(14, 20),
            },
            beginner_nudge: -1,
            advanced_nudge: 1,
            full_equipment_items: 4,
            partial_equipment_items: 2,
            full_equipment_bonus: 4,
            partial_equipment_bonus: 2,
            tuning_hit_gain: 0.3,
            tuning_skip_penalty: 0.25,
            tuning_min: 0.85,
            tuning_max: 1.2,
            low_energy_multiplier: 0.9,
            high_energy_multiplier: 1.1,
            work_rest_work_seconds: 20,
            work_rest_rest_seconds: 10,
            work_rest_intervals: 8,
            circuit_work_seconds: PerTier {
                beginner: 30,
                intermediate: 40,
                advanced: 45,
            },
            circuit_transition_seconds: 15,
            circuit_base_rest_seconds: 60,
            circuit_rest_fatigue_gain: 0.5,
            circuit_rest_min_seconds: 45,
            circuit_rest_max_seconds: 120,
            circuit_low_energy_rest_bonus: 15,
            circuit_min_work_seconds: 20,
        }
    }
}

/// Target quantity scaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantityConfig {
    pub hit_gain: f64,
    pub skip_penalty: f64,
    pub fatigue_penalty: f64,
    pub intensity_min: f64,
    pub intensity_max: f64,
    /// Rep scale for 20 second work windows
    pub work_rest_rep_scale: f64,
    /// Holds must fit inside one minute with a transition
    pub fixed_minute_hold_cap: u32,
}

impl Default for QuantityConfig {
    fn default() -> Self {
        Self {
            hit_gain: 0.5,
            skip_penalty: 0.3,
            fatigue_penalty: 0.1,
            intensity_min: 0.75,
            intensity_max: 1.3,
            work_rest_rep_scale: 0.5,
            fixed_minute_hold_cap: 50,
        }
    }
}

/// Skill-score update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    pub window: usize,
    pub hit_gain: f64,
    pub skip_penalty: f64,
    pub movement_weight: f64,
    pub movement_hit_gain: f64,
    pub movement_skip_penalty: f64,
    pub progress_min_hit_rate: f64,
    pub progress_max_skip_rate: f64,
    pub progress_max_rpe: f64,
    pub struggle_max_hit_rate: f64,
    pub struggle_min_skip_rate: f64,
    pub struggle_min_rpe: f64,
    pub sustained_gain_amplifier: f64,
    pub unsustained_gain_amplifier: f64,
    pub sustained_loss_amplifier: f64,
    pub unsustained_loss_amplifier: f64,
    pub max_delta: f64,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            window: 6,
            hit_gain: 10.0,
            skip_penalty: 12.0,
            movement_weight: 0.5,
            movement_hit_gain: 8.0,
            movement_skip_penalty: 10.0,
            progress_min_hit_rate: 1.03,
            progress_max_skip_rate: 0.08,
            progress_max_rpe: 3.5,
            struggle_max_hit_rate: 0.95,
            struggle_min_skip_rate: 0.15,
            struggle_min_rpe: 4.5,
            sustained_gain_amplifier: 1.2,
            unsustained_gain_amplifier: 0.6,
            sustained_loss_amplifier: 1.3,
            unsustained_loss_amplifier: 0.7,
            max_delta: 12.0,
        }
    }
}

/// Progressive-overload detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverloadConfig {
    pub min_sessions: usize,
    pub hit_rate_threshold: f64,
    pub magnitude_floor: f64,
    pub magnitude_span: f64,
    pub hold_increment: Band,
    pub rep_increment: Band,
    pub mastery_multiplier: Band,
}

impl Default for OverloadConfig {
    fn default() -> Self {
        Self {
            min_sessions: 3,
            hit_rate_threshold: 1.1,
            magnitude_floor: 0.1,
            magnitude_span: 0.4,
            hold_increment: Band::new(2.0, 5.0),
            rep_increment: Band::new(0.05, 0.20),
            mastery_multiplier: Band::new(0.8, 1.2),
        }
    }
}

/// Streak awareness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    pub fragile_max_streak: u32,
    pub fragile_gap_days: i64,
    pub adjustment_gap_days: i64,
    pub fragile_duration_cut: Band,
    pub standard_duration_cut: Band,
    pub fragile_quantity_cut: Band,
    pub standard_quantity_cut: Band,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            fragile_max_streak: 2,
            fragile_gap_days: 3,
            adjustment_gap_days: 2,
            fragile_duration_cut: Band::new(0.15, 0.20),
            standard_duration_cut: Band::new(0.10, 0.15),
            fragile_quantity_cut: Band::new(0.075, 0.10),
            standard_quantity_cut: Band::new(0.05, 0.075),
        }
    }
}

/// Personal records and PR readiness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Reported value at or above this share of the record is a near miss
    pub near_miss_ratio: f64,
    /// Recent best at or above this share marks an exercise as close to its record
    pub close_ratio: f64,
    pub min_rest_hours: f64,
    pub max_fatigue: f64,
    pub max_skip_rate: f64,
    pub max_rpe: f64,
    /// First interval (1-based) allowed to carry a PR attempt
    pub first_attempt_index: u32,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            near_miss_ratio: 0.95,
            close_ratio: 0.90,
            min_rest_hours: 20.0,
            max_fatigue: 0.65,
            max_skip_rate: 0.25,
            max_rpe: 3.6,
            first_attempt_index: 3,
        }
    }
}

/// Framework preference scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceConfig {
    pub completion_weight: f64,
    pub hit_rate_weight: f64,
    pub rpe_weight: f64,
    pub recency_weight: f64,
    pub half_life_days: f64,
    pub recency_sessions: usize,
    pub explore_probability: f64,
    pub goal_threshold: f64,
    pub neutral_score: f64,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            completion_weight: 0.4,
            hit_rate_weight: 0.3,
            rpe_weight: 0.2,
            recency_weight: 0.1,
            half_life_days: 30.0,
            recency_sessions: 5,
            explore_probability: 0.15,
            goal_threshold: 0.6,
            neutral_score: 0.5,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "rustrep", "RustRep")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("engine.toml")
}

/// Load engine configuration from the default location.
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load engine configuration from a file, falling back to defaults when absent.
pub fn load_config_from(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save engine configuration to a file.
pub fn save_config_to(path: &Path, config: &EngineConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
