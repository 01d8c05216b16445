use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use thailotto_db::models::{parse_record_date, TwoDigit};

use crate::error::EngineError;

/// Gregorian to Buddhist-era year offset.
const BUDDHIST_ERA_OFFSET: i32 = 543;

/// A calendar date with culturally associated numbers.
#[derive(Debug, Clone, Copy)]
pub struct Holiday {
    pub month: u32,
    pub day: u32,
    pub label: &'static str,
    pub bias: &'static [TwoDigit],
    pub weight: i32,
}

const LABOUR_DAY_BIAS: &[TwoDigit] = &[TwoDigit::of(1), TwoDigit::of(2), TwoDigit::of(5)];

pub static HOLIDAYS: &[Holiday] = &[
    Holiday {
        month: 1,
        day: 17,
        label: "Teacher's Day Draw",
        bias: &[
            TwoDigit::of(16),
            TwoDigit::of(17),
            TwoDigit::of(61),
            TwoDigit::of(95),
            TwoDigit::of(96),
            TwoDigit::of(97),
        ],
        weight: 5,
    },
    Holiday {
        month: 5,
        day: 1,
        label: "Labour Day Draw",
        bias: LABOUR_DAY_BIAS,
        weight: 5,
    },
    // Draws falling on Labour Day move to the 2nd.
    Holiday {
        month: 5,
        day: 2,
        label: "Labour Day Substitute Draw",
        bias: LABOUR_DAY_BIAS,
        weight: 5,
    },
];

/// Calendar-derived context for one target draw. Recomputed per call, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawContext {
    pub target_date: NaiveDate,
    pub label: Option<&'static str>,
    pub bias_numbers: BTreeSet<TwoDigit>,
    pub cultural_weight: i32,
    pub weekday: Weekday,
}

impl DrawContext {
    /// No holiday: scoring falls back to history alone.
    pub fn statistical(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            label: None,
            bias_numbers: BTreeSet::new(),
            cultural_weight: 0,
            weekday: target_date.weekday(),
        }
    }

    pub fn is_holiday(&self) -> bool {
        self.label.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContextResolver {
    holidays: &'static [Holiday],
}

impl Default for ContextResolver {
    fn default() -> Self {
        Self { holidays: HOLIDAYS }
    }
}

impl ContextResolver {
    pub fn with_table(holidays: &'static [Holiday]) -> Self {
        Self { holidays }
    }

    pub fn holiday_on(&self, date: NaiveDate) -> Option<&'static Holiday> {
        self.holidays
            .iter()
            .find(|h| h.month == date.month() && h.day == date.day())
    }

    pub fn resolve(&self, target_date: NaiveDate) -> DrawContext {
        let Some(holiday) = self.holiday_on(target_date) else {
            return DrawContext::statistical(target_date);
        };

        let year = target_date.year();
        let mut bias_numbers: BTreeSet<TwoDigit> = holiday.bias.iter().copied().collect();
        bias_numbers.insert(TwoDigit::tail_of(year));
        bias_numbers.insert(TwoDigit::tail_of(year + BUDDHIST_ERA_OFFSET));

        DrawContext {
            target_date,
            label: Some(holiday.label),
            bias_numbers,
            cultural_weight: holiday.weight,
            weekday: target_date.weekday(),
        }
    }

    pub fn resolve_ymd(&self, year: i32, month: u32, day: u32) -> Result<DrawContext, EngineError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            EngineError::InvalidDate(format!("{year:04}-{month:02}-{day:02}"))
        })?;
        Ok(self.resolve(date))
    }
}

/// Accepts `DD-MM-YYYY` or `YYYY-MM-DD`.
pub fn parse_target_date(raw: &str) -> Result<NaiveDate, EngineError> {
    parse_record_date(raw).map_err(|_| EngineError::InvalidDate(raw.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_teachers_day_context() {
        let ctx = ContextResolver::default().resolve(date(2026, 1, 17));
        assert_eq!(ctx.label, Some("Teacher's Day Draw"));
        assert_eq!(ctx.cultural_weight, 5);
        for n in [61, 96, 17, 16, 95, 97] {
            assert!(ctx.bias_numbers.contains(&TwoDigit::of(n)), "missing {:02}", n);
        }
        assert!(ctx.bias_numbers.contains(&TwoDigit::of(26)));
        assert!(ctx.bias_numbers.contains(&TwoDigit::of(69)));
        assert_eq!(ctx.weekday, Weekday::Sat);
    }

    #[test]
    fn test_labour_day_contexts() {
        let resolver = ContextResolver::default();
        let may1 = resolver.resolve(date(2026, 5, 1));
        let may2 = resolver.resolve(date(2026, 5, 2));
        assert!(may1.is_holiday());
        assert!(may2.is_holiday());
        assert!(may1.bias_numbers.contains(&TwoDigit::of(5)));
        assert_eq!(may1.bias_numbers, may2.bias_numbers);
    }

    #[test]
    fn test_no_holiday_is_statistical() {
        let ctx = ContextResolver::default().resolve(date(2026, 3, 16));
        assert_eq!(ctx.label, None);
        assert!(ctx.bias_numbers.is_empty());
        assert_eq!(ctx.cultural_weight, 0);
    }

    #[test]
    fn test_match_is_exact() {
        let resolver = ContextResolver::default();
        assert!(!resolver.resolve(date(2026, 1, 16)).is_holiday());
        assert!(!resolver.resolve(date(2026, 1, 18)).is_holiday());
    }

    #[test]
    fn test_custom_table() {
        static TABLE: &[Holiday] = &[Holiday {
            month: 12,
            day: 5,
            label: "Father's Day Draw",
            bias: &[TwoDigit::of(5), TwoDigit::of(12)],
            weight: 4,
        }];
        let resolver = ContextResolver::with_table(TABLE);
        let ctx = resolver.resolve(date(2025, 12, 5));
        assert_eq!(ctx.cultural_weight, 4);
        assert!(ctx.bias_numbers.contains(&TwoDigit::of(12)));
        assert!(!resolver.resolve(date(2026, 1, 17)).is_holiday());
    }

    #[test]
    fn test_resolve_ymd_invalid() {
        let err = ContextResolver::default().resolve_ymd(2026, 2, 30).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate(_)));
        assert!(ContextResolver::default().resolve_ymd(2026, 1, 17).is_ok());
    }

    #[test]
    fn test_parse_target_date() {
        assert_eq!(parse_target_date("17-01-2026").unwrap(), date(2026, 1, 17));
        assert_eq!(parse_target_date("2026-01-17").unwrap(), date(2026, 1, 17));
        assert!(matches!(parse_target_date("31-04-2026"), Err(EngineError::InvalidDate(_))));
        assert!(parse_target_date("tomorrow").is_err());
    }
}
