use thailotto_db::models::TwoDigit;

use super::{Evidence, EvidenceSource, History};
use crate::context::DrawContext;

/// Momentum: every occurrence among the last `window` draws.
pub struct RecentTrendSource {
    weight: i32,
    window: usize,
}

impl RecentTrendSource {
    pub fn new(weight: i32, window: usize) -> Self {
        Self { weight, window }
    }
}

impl EvidenceSource for RecentTrendSource {
    fn evidence(&self) -> Evidence {
        Evidence::RecentTrend
    }

    fn hits(&self, _context: &DrawContext, history: &History<'_>) -> Vec<(TwoDigit, i32)> {
        history
            .most_recent(self.window)
            .map(|r| (r.number, self.weight))
            .collect()
    }
}
