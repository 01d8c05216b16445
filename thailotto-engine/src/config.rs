use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Per-source scoring weights. The cultural weight comes from the holiday table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub seasonal: i32,
    pub running_digit: i32,
    pub weekday: i32,
    pub recent: i32,
    pub recent_window: usize,
    pub repeat_penalty: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            seasonal: 3,
            running_digit: 0,
            weekday: 0,
            recent: 1,
            recent_window: 5,
            repeat_penalty: -5,
        }
    }
}

pub fn save_weights(weights: &ScoringWeights, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(weights)?;
    std::fs::write(path, json).with_context(|| format!("cannot write {:?}", path))?;
    Ok(())
}

pub fn load_weights(path: &Path) -> anyhow::Result<ScoringWeights> {
    let json = std::fs::read_to_string(path).with_context(|| format!("cannot read {:?}", path))?;
    let weights: ScoringWeights =
        serde_json::from_str(&json).with_context(|| format!("invalid weights file {:?}", path))?;
    Ok(weights)
}
