//! Exercise-bias resolution from goals and intent text.

use crate::catalog::types::CategoryVector;
use crate::profile::goals::GoalWeights;

/// Keyword groups and the bias delta each contributes once.
const KEYWORD_NUDGES: &[(&[&str], CategoryVector)] = &[
    (&["cardio", "engine"], CategoryVector::new(0.0, 0.3, 0.0, 0.0)),
    (&["mobility", "recovery"], CategoryVector::new(0.0, 0.0, -0.2, 0.35)),
    (&["strength", "power"], CategoryVector::new(0.3, 0.0, 0.0, 0.0)),
    (&["explosive", "speed"], CategoryVector::new(0.0, 0.0, 0.25, 0.0)),
];

/// Goal bias with keyword nudges applied, floored at zero.
pub fn resolve_bias(weights: &GoalWeights, intent_text: &str) -> CategoryVector {
    let text = intent_text.to_lowercase();
    KEYWORD_NUDGES
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .fold(weights.blended_bias(), |bias, (_, delta)| bias.plus(delta))
        .floored()
}
