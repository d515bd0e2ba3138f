//! Exercise catalog types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Difficulty tier shared by exercises, sessions and profiles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    /// Resolve a tier from a 0-100 skill score.
    pub fn from_skill_score(score: f64) -> Self {
        if score <= 35.0 {
            DifficultyTier::Beginner
        } else if score <= 70.0 {
            DifficultyTier::Intermediate
        } else {
            DifficultyTier::Advanced
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "Beginner",
            DifficultyTier::Intermediate => "Intermediate",
            DifficultyTier::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Muscle group targeted by an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    FullBody,
    Cardio,
    Chest,
    Back,
    Shoulders,
    Arms,
    Core,
    Legs,
    Glutes,
}

impl MuscleGroup {
    pub fn label(&self) -> &'static str {
        match self {
            MuscleGroup::FullBody => "Full Body",
            MuscleGroup::Cardio => "Cardio",
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Core => "Core",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Glutes => "Glutes",
        }
    }

    /// Large strength groups that need the longest recovery.
    pub fn is_major_strength_group(&self) -> bool {
        matches!(
            self,
            MuscleGroup::Chest | MuscleGroup::Back | MuscleGroup::Legs | MuscleGroup::Glutes
        )
    }

    /// Conditioning groups that recover fastest.
    pub fn is_conditioning_group(&self) -> bool {
        matches!(self, MuscleGroup::Cardio | MuscleGroup::FullBody)
    }
}

impl std::fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A piece of training equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Bodyweight,
    Dumbbells,
    Kettlebell,
    Barbell,
    PullUpBar,
    ResistanceBand,
    JumpRope,
    Bench,
    PlyoBox,
    MedicineBall,
}

impl Equipment {
    pub fn label(&self) -> &'static str {
        match self {
            Equipment::Bodyweight => "Bodyweight",
            Equipment::Dumbbells => "Dumbbells",
            Equipment::Kettlebell => "Kettlebell",
            Equipment::Barbell => "Barbell",
            Equipment::PullUpBar => "Pull-up Bar",
            Equipment::ResistanceBand => "Resistance Band",
            Equipment::JumpRope => "Jump Rope",
            Equipment::Bench => "Bench",
            Equipment::PlyoBox => "Plyo Box",
            Equipment::MedicineBall => "Medicine Ball",
        }
    }
}

/// Equipment owned by a user. Bodyweight is always available.
pub fn available_equipment(owned: &BTreeSet<Equipment>) -> BTreeSet<Equipment> {
    let mut available = owned.clone();
    available.insert(Equipment::Bodyweight);
    available
}

/// Category vector `{compound, cardio, plyometric, mobility}`.
///
/// Exercises use it as a 0/1 flag set; goals and intents use it as a bias.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryVector {
    #[serde(default)]
    pub compound: f64,
    #[serde(default)]
    pub cardio: f64,
    #[serde(default)]
    pub plyometric: f64,
    #[serde(default)]
    pub mobility: f64,
}

impl CategoryVector {
    pub const fn new(compound: f64, cardio: f64, plyometric: f64, mobility: f64) -> Self {
        Self {
            compound,
            cardio,
            plyometric,
            mobility,
        }
    }

    /// Equal weight on every category.
    pub const fn neutral() -> Self {
        Self::new(0.25, 0.25, 0.25, 0.25)
    }

    /// Sum of bias components whose flag is set in `flags`.
    pub fn matching(&self, flags: &CategoryVector) -> f64 {
        let mut total = 0.0;
        if flags.compound > 0.0 {
            total += self.compound;
        }
        if flags.cardio > 0.0 {
            total += self.cardio;
        }
        if flags.plyometric > 0.0 {
            total += self.plyometric;
        }
        if flags.mobility > 0.0 {
            total += self.mobility;
        }
        total
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.compound * factor,
            self.cardio * factor,
            self.plyometric * factor,
            self.mobility * factor,
        )
    }

    pub fn plus(&self, other: &CategoryVector) -> Self {
        Self::new(
            self.compound + other.compound,
            self.cardio + other.cardio,
            self.plyometric + other.plyometric,
            self.mobility + other.mobility,
        )
    }

    /// Clamp every component to be non-negative.
    pub fn floored(&self) -> Self {
        Self::new(
            self.compound.max(0.0),
            self.cardio.max(0.0),
            self.plyometric.max(0.0),
            self.mobility.max(0.0),
        )
    }
}

/// Base rep or second targets per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTargets {
    pub beginner: u32,
    pub intermediate: u32,
    pub advanced: u32,
}

impl TierTargets {
    pub const fn new(beginner: u32, intermediate: u32, advanced: u32) -> Self {
        Self {
            beginner,
            intermediate,
            advanced,
        }
    }

    pub fn for_tier(&self, tier: DifficultyTier) -> u32 {
        match tier {
            DifficultyTier::Beginner => self.beginner,
            DifficultyTier::Intermediate => self.intermediate,
            DifficultyTier::Advanced => self.advanced,
        }
    }
}

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    /// Unique display name
    pub name: String,
    /// Primary muscle group
    pub muscle_group: MuscleGroup,
    /// Base difficulty
    pub difficulty: DifficultyTier,
    /// Every item must be available (AND semantics)
    #[serde(default)]
    pub equipment: BTreeSet<Equipment>,
    /// Reps, or seconds for holds
    pub targets: TierTargets,
    /// Isometric hold measured in seconds
    #[serde(default)]
    pub is_hold: bool,
    /// Performed per side
    #[serde(default)]
    pub alternates_sides: bool,
    /// Category flags
    #[serde(default)]
    pub categories: CategoryVector,
}

impl ExerciseDefinition {
    /// Create a bodyweight exercise with no category flags.
    pub fn new(
        name: impl Into<String>,
        muscle_group: MuscleGroup,
        difficulty: DifficultyTier,
        targets: TierTargets,
    ) -> Self {
        Self {
            name: name.into(),
            muscle_group,
            difficulty,
            equipment: BTreeSet::new(),
            targets,
            is_hold: false,
            alternates_sides: false,
            categories: CategoryVector::default(),
        }
    }

    /// Set required equipment.
    pub fn with_equipment(mut self, equipment: &[Equipment]) -> Self {
        self.equipment = equipment.iter().copied().collect();
        self
    }

    /// Set category flags.
    pub fn with_categories(mut self, compound: bool, cardio: bool, plyometric: bool, mobility: bool) -> Self {
        let flag = |set: bool| if set { 1.0 } else { 0.0 };
        self.categories = CategoryVector::new(flag(compound), flag(cardio), flag(plyometric), flag(mobility));
        self
    }

    /// Mark as an isometric hold.
    pub fn hold(mut self) -> Self {
        self.is_hold = true;
        self
    }

    /// Mark as performed per side.
    pub fn per_side(mut self) -> Self {
        self.alternates_sides = true;
        self
    }

    pub fn is_compound(&self) -> bool {
        self.categories.compound > 0.0
    }

    pub fn is_cardio(&self) -> bool {
        self.categories.cardio > 0.0
    }

    pub fn is_plyometric(&self) -> bool {
        self.categories.plyometric > 0.0
    }

    pub fn is_mobility(&self) -> bool {
        self.categories.mobility > 0.0
    }

    /// Advanced, plyometric, or a compound move above beginner level.
    pub fn is_high_intensity(&self) -> bool {
        self.difficulty == DifficultyTier::Advanced
            || self.is_plyometric()
            || (self.is_compound() && self.difficulty != DifficultyTier::Beginner)
    }

    /// Check that every required item is available.
    pub fn equipment_satisfied(&self, available: &BTreeSet<Equipment>) -> bool {
        self.equipment
            .iter()
            .all(|item| *item == Equipment::Bodyweight || available.contains(item))
    }

    /// Base target for a tier.
    pub fn target_for(&self, tier: DifficultyTier) -> u32 {
        self.targets.for_tier(tier)
    }
}
