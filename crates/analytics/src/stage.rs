//! Stage Probability Model.
//!
//! Conversion probability per pipeline stage. The table is a process-wide
//! constant and never changes at runtime.

use boardlens_core::normalize_label;

/// Probability applied to any stage label not in [`STAGE_PROBABILITIES`].
pub const DEFAULT_STAGE_PROBABILITY: f64 = 0.25;

/// Normalized stage label -> probability of converting to revenue.
pub const STAGE_PROBABILITIES: &[(&str, f64)] = &[
    ("lead", 0.1),
    ("qualified", 0.3),
    ("proposal", 0.5),
    ("negotiation", 0.7),
    ("contract", 0.85),
    ("won", 1.0),
    ("lost", 0.0),
];

/// Conversion probability for a stage label (normalized before lookup).
pub fn probability(stage_label: &str) -> f64 {
    let normalized = normalize_label(stage_label);
    STAGE_PROBABILITIES
        .iter()
        .find(|(stage, _)| *stage == normalized)
        .map(|(_, p)| *p)
        .unwrap_or(DEFAULT_STAGE_PROBABILITY)
}
