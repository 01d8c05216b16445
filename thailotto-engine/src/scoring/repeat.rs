use thailotto_db::models::TwoDigit;

use super::{Evidence, EvidenceSource, History};
use crate::context::DrawContext;

/// Back-to-back repeats are penalised: the latest result loses points.
pub struct RepeatPenaltySource {
    weight: i32,
}

impl RepeatPenaltySource {
    pub fn new(weight: i32) -> Self {
        Self { weight }
    }
}

impl EvidenceSource for RepeatPenaltySource {
    fn evidence(&self) -> Evidence {
        Evidence::RepeatPenalty
    }

    fn hits(&self, _context: &DrawContext, history: &History<'_>) -> Vec<(TwoDigit, i32)> {
        history
            .latest()
            .map(|r| vec![(r.number, self.weight)])
            .unwrap_or_default()
    }
}
