use chrono::Datelike;
use thailotto_db::models::TwoDigit;

use super::{Evidence, EvidenceSource, History};
use crate::context::DrawContext;

/// Results drawn on the same month and day in earlier years.
pub struct SeasonalSource {
    weight: i32,
}

impl SeasonalSource {
    pub fn new(weight: i32) -> Self {
        Self { weight }
    }
}

impl EvidenceSource for SeasonalSource {
    fn evidence(&self) -> Evidence {
        Evidence::SeasonalMatch
    }

    fn hits(&self, context: &DrawContext, history: &History<'_>) -> Vec<(TwoDigit, i32)> {
        let target = context.target_date;
        history
            .iter()
            .filter(|r| {
                r.date.month() == target.month()
                    && r.date.day() == target.day()
                    && r.date.year() < target.year()
            })
            .map(|r| (r.number, self.weight))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextResolver;
    use crate::scoring::make_records;
    use chrono::NaiveDate;

    #[test]
    fn test_seasonal_prior_years_only() {
        let records = make_records(&[
            ("17-01-2024", "47"),
            ("17-01-2025", "61"),
            ("17-01-2026", "99"),
            ("16-01-2025", "10"),
            ("17-02-2025", "11"),
        ]);
        let ctx = ContextResolver::default().resolve(NaiveDate::from_ymd_opt(2026, 1, 17).unwrap());
        let hits = SeasonalSource::new(3).hits(&ctx, &History::new(&records));
        assert_eq!(hits, vec![(TwoDigit::of(47), 3), (TwoDigit::of(61), 3)]);
    }
}
