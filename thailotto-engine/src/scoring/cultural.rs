use thailotto_db::models::TwoDigit;

use super::{Evidence, EvidenceSource, History};
use crate::context::DrawContext;

/// Holiday-associated numbers, weighted by the holiday itself.
pub struct CulturalSource;

impl EvidenceSource for CulturalSource {
    fn evidence(&self) -> Evidence {
        Evidence::CulturalPattern
    }

    fn hits(&self, context: &DrawContext, _history: &History<'_>) -> Vec<(TwoDigit, i32)> {
        context
            .bias_numbers
            .iter()
            .map(|&n| (n, context.cultural_weight))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextResolver;
    use chrono::NaiveDate;

    #[test]
    fn test_cultural_hits_bias_set_once() {
        let ctx = ContextResolver::default().resolve(NaiveDate::from_ymd_opt(2026, 1, 17).unwrap());
        let hits = CulturalSource.hits(&ctx, &History::new(&[]));
        assert_eq!(hits.len(), ctx.bias_numbers.len());
        assert!(hits.iter().all(|&(_, w)| w == 5));
    }

    #[test]
    fn test_cultural_silent_without_holiday() {
        let ctx = ContextResolver::default().resolve(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        assert!(CulturalSource.hits(&ctx, &History::new(&[])).is_empty());
    }
}
