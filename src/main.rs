//! RustRep - Interval Workout Personalization Engine
//!
//! Command-line entry point. Reads JSON snapshots, prints JSON results.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rustrep::config::{self, EngineConfig};
use rustrep::feedback::{
    FrameworkPreference, OverloadDetector, OverloadRecommendation, PrDetection, PreferenceModel,
    RecordDetector, SkillModel, SkillUpdate,
};
use rustrep::signals::{MasteryModel, MasteryRecord, RecoveryModel, RecoveryStatus, StreakModel, StreakState};
use rustrep::{ExerciseCatalog, GenerationRequest, PersonalRecordBook, Profile, Session, WorkoutGenerator};

#[derive(Parser)]
#[command(name = "rustrep", version, about = "Interval workout generation and personalization")]
struct Cli {
    /// Engine config file (defaults to the data directory's engine.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the next workout
    Generate {
        /// JSON file with profile, history, records and request
        #[arg(long)]
        input: PathBuf,
        /// Exercise catalog JSON (built-in catalog when omitted)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Recompute signals from history
    Feedback {
        /// JSON file with profile, history and records
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Deserialize)]
struct GenerateInput {
    #[serde(default)]
    profile: Profile,
    #[serde(default)]
    history: Vec<Session>,
    #[serde(default)]
    records: PersonalRecordBook,
    request: Option<GenerationRequest>,
}

#[derive(Deserialize)]
struct FeedbackInput {
    #[serde(default)]
    profile: Profile,
    #[serde(default)]
    history: Vec<Session>,
    #[serde(default)]
    records: PersonalRecordBook,
}

#[derive(Serialize)]
struct FeedbackReport {
    profile: Profile,
    skill: SkillUpdate,
    overload: Vec<OverloadRecommendation>,
    personal_records: PrDetection,
    records: PersonalRecordBook,
    mastery: BTreeMap<String, MasteryRecord>,
    recovery: Vec<RecoveryStatus>,
    streak: StreakState,
    framework_preferences: Vec<FrameworkPreference>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let engine_config = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .context("Failed to load engine config")?;

    match cli.command {
        Command::Generate { input, catalog, seed } => generate(engine_config, &input, catalog.as_deref(), seed),
        Command::Feedback { input } => feedback(&engine_config, &input),
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn generate(
    engine_config: EngineConfig,
    input: &Path,
    catalog: Option<&Path>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let input: GenerateInput = read_json(input)?;
    let catalog = match catalog {
        Some(path) => ExerciseCatalog::from_json_file(path)?,
        None => ExerciseCatalog::builtin(),
    };
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let request = input.request.unwrap_or_else(|| GenerationRequest::new(Utc::now()));

    let generator = WorkoutGenerator::new(catalog, engine_config);
    let workout = generator.generate(&input.profile, &input.history, &input.records, &request, &mut rng)?;

    println!("{}", serde_json::to_string_pretty(&workout)?);
    Ok(())
}

fn feedback(engine_config: &EngineConfig, input: &Path) -> anyhow::Result<()> {
    let input: FeedbackInput = read_json(input)?;
    let report = feedback_report(engine_config, input, Utc::now());

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn feedback_report(engine_config: &EngineConfig, input: FeedbackInput, now: DateTime<Utc>) -> FeedbackReport {
    let FeedbackInput {
        mut profile,
        history,
        mut records,
    } = input;
    let hit_rate_cap = engine_config.insights.hit_rate_cap;

    let skill = SkillModel::new(engine_config.skill.clone(), hit_rate_cap).apply(&mut profile, &history);
    let mastery = MasteryModel::new(engine_config.mastery.clone()).score_all(&history);
    let overload = OverloadDetector::new(engine_config.overload.clone(), hit_rate_cap).detect(&history, &mastery);
    let recovery = RecoveryModel::from_sessions(&history, engine_config.recovery.clone()).statuses(now);

    let personal_records = match history.iter().max_by_key(|s| s.created_at) {
        Some(latest) => RecordDetector::new(engine_config.records.clone()).detect(latest, &records),
        None => PrDetection::default(),
    };
    records.apply(&personal_records);

    FeedbackReport {
        profile,
        skill,
        overload,
        personal_records,
        records,
        mastery,
        recovery,
        streak: StreakModel::new(engine_config.streak.clone()).analyze(&history, now),
        framework_preferences: PreferenceModel::new(engine_config.preference.clone(), hit_rate_cap)
            .score_all(&history, now),
    }
}
