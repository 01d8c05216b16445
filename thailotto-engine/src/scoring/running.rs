use chrono::Datelike;
use thailotto_db::models::TwoDigit;

use super::{Evidence, EvidenceSource, History};
use crate::context::DrawContext;

/// Digit (0-9) seen most often across results drawn on the target's month and
/// day in earlier years. Ties go to the smaller digit.
pub fn hot_digit(context: &DrawContext, history: &History<'_>) -> Option<u8> {
    let target = context.target_date;
    let mut counts = [0u32; 10];
    for record in history.iter().filter(|r| {
        r.date.month() == target.month()
            && r.date.day() == target.day()
            && r.date.year() < target.year()
    }) {
        let n = record.number.value();
        counts[(n / 10) as usize] += 1;
        counts[(n % 10) as usize] += 1;
    }

    let best = counts.iter().copied().max().filter(|&c| c > 0)?;
    counts.iter().position(|&c| c == best).map(|d| d as u8)
}

fn contains_digit(number: TwoDigit, digit: u8) -> bool {
    let n = number.value();
    n / 10 == digit || n % 10 == digit
}

/// Numbers containing the hot running digit. Disabled at weight 0.
pub struct RunningDigitSource {
    weight: i32,
}

impl RunningDigitSource {
    pub fn new(weight: i32) -> Self {
        Self { weight }
    }
}

impl EvidenceSource for RunningDigitSource {
    fn evidence(&self) -> Evidence {
        Evidence::RunningDigit
    }

    fn hits(&self, context: &DrawContext, history: &History<'_>) -> Vec<(TwoDigit, i32)> {
        if self.weight == 0 {
            return Vec::new();
        }
        let Some(digit) = hot_digit(context, history) else {
            return Vec::new();
        };
        TwoDigit::all()
            .filter(|&n| contains_digit(n, digit))
            .map(|n| (n, self.weight))
            .collect()
    }
}
