//! Interval frameworks and the policy that parameterizes the shared pipeline.

use serde::{Deserialize, Serialize};

use crate::catalog::types::ExerciseDefinition;
use crate::config::EngineConfig;

/// Interval cadence of a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framework {
    /// One exercise per minute (EMOM)
    #[default]
    FixedMinute,
    /// 20s work / 10s rest micro-intervals (Tabata)
    WorkRest,
    /// One pass repeated until time runs out (AMRAP)
    CountdownCircuit,
    /// Fixed number of circuit rounds with rest between them
    RepeatedCircuit,
}

impl Framework {
    /// All frameworks in declaration order.
    pub fn all() -> [Framework; 4] {
        [
            Framework::FixedMinute,
            Framework::WorkRest,
            Framework::CountdownCircuit,
            Framework::RepeatedCircuit,
        ]
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Framework::FixedMinute => "EMOM",
            Framework::WorkRest => "Tabata",
            Framework::CountdownCircuit => "AMRAP",
            Framework::RepeatedCircuit => "Circuit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Framework::FixedMinute => "one exercise at the top of every minute",
            Framework::WorkRest => "20 seconds on, 10 seconds off, 8 times per exercise",
            Framework::CountdownCircuit => "as many rounds as possible before the clock runs out",
            Framework::RepeatedCircuit => "timed stations repeated for a set number of rounds",
        }
    }

    /// Whether round N may never repeat round N-1's exercise.
    pub fn forbids_consecutive_repeat(&self) -> bool {
        matches!(self, Framework::FixedMinute | Framework::CountdownCircuit)
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How target quantities are scaled for a framework.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityScale {
    /// Reps as computed, holds capped at `hold_cap` seconds
    Capped { hold_cap: u32 },
    /// Reps scaled for a short work window, holds fill the window
    WorkWindow { rep_scale: f64, hold_seconds: u32 },
}

/// Framework-specific parameters for the shared generation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkPolicy {
    pub framework: Framework,
    /// Probability of a uniform exploratory pick
    pub epsilon: f64,
    /// Duration floor in minutes
    pub minimum_minutes: u32,
    /// Only cardio, plyometric or compound exercises are eligible
    pub conditioning_only: bool,
    pub quantity_scale: QuantityScale,
}

impl FrameworkPolicy {
    pub fn for_framework(framework: Framework, config: &EngineConfig) -> Self {
        let selection = &config.selection;
        let duration = &config.duration;
        match framework {
            Framework::FixedMinute => Self {
                framework,
                epsilon: selection.epsilon_fixed_minute,
                minimum_minutes: duration.fixed_minute_min,
                conditioning_only: false,
                quantity_scale: QuantityScale::Capped {
                    hold_cap: config.quantity.fixed_minute_hold_cap,
                },
            },
            Framework::WorkRest => Self {
                framework,
                epsilon: selection.epsilon_work_rest,
                minimum_minutes: duration.work_rest_min,
                conditioning_only: true,
                quantity_scale: QuantityScale::WorkWindow {
                    rep_scale: config.quantity.work_rest_rep_scale,
                    hold_seconds: duration.work_rest_work_seconds,
                },
            },
            Framework::CountdownCircuit => Self {
                framework,
                epsilon: selection.epsilon_countdown_circuit,
                minimum_minutes: duration.countdown_circuit_min,
                conditioning_only: false,
                quantity_scale: QuantityScale::Capped {
                    hold_cap: config.quantity.fixed_minute_hold_cap,
                },
            },
            // Hold cap is narrowed to the station's work seconds once known.
            Framework::RepeatedCircuit => Self {
                framework,
                epsilon: selection.epsilon_repeated_circuit,
                minimum_minutes: duration.repeated_circuit_min,
                conditioning_only: false,
                quantity_scale: QuantityScale::Capped {
                    hold_cap: duration.circuit_work_seconds.advanced,
                },
            },
        }
    }

    /// Cap holds at a station's work seconds.
    pub fn with_hold_cap(mut self, hold_cap: u32) -> Self {
        if let QuantityScale::Capped { .. } = self.quantity_scale {
            self.quantity_scale = QuantityScale::Capped { hold_cap };
        }
        self
    }

    /// Check whether an exercise fits this framework's pool.
    pub fn admits(&self, exercise: &ExerciseDefinition) -> bool {
        !self.conditioning_only || exercise.is_cardio() || exercise.is_plyometric() || exercise.is_compound()
    }
}
