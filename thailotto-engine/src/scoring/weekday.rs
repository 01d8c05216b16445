use chrono::Datelike;
use thailotto_db::models::TwoDigit;

use super::{Evidence, EvidenceSource, History};
use crate::context::DrawContext;

/// Earlier results drawn on the target's weekday. Disabled at weight 0.
pub struct WeekdaySource {
    weight: i32,
}

impl WeekdaySource {
    pub fn new(weight: i32) -> Self {
        Self { weight }
    }
}

impl EvidenceSource for WeekdaySource {
    fn evidence(&self) -> Evidence {
        Evidence::WeekdayMatch
    }

    fn hits(&self, context: &DrawContext, history: &History<'_>) -> Vec<(TwoDigit, i32)> {
        if self.weight == 0 {
            return Vec::new();
        }
        history
            .iter()
            .filter(|r| r.date < context.target_date && r.date.weekday() == context.weekday)
            .map(|r| (r.number, self.weight))
            .collect()
    }
}
