use chrono::{Datelike, NaiveDate};

use crate::error::EngineError;

/// Regular draws fall on the 1st and the 16th.
const MID_MONTH_DAY: u32 = 16;

/// (month, day) moved to (month, day) by the lottery office.
static DRAW_SHIFTS: &[((u32, u32), (u32, u32))] = &[
    ((1, 16), (1, 17)), // Teacher's Day
    ((5, 1), (5, 2)),   // Labour Day
];

/// Next scheduled draw on or after `today`'s half of the month.
pub fn next_draw_date(today: NaiveDate) -> Result<NaiveDate, EngineError> {
    let (mut year, mut month) = (today.year(), today.month());
    let mut day = MID_MONTH_DAY;

    if today.day() > MID_MONTH_DAY {
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
        day = 1;
    }

    if let Some(&(_, (m, d))) = DRAW_SHIFTS.iter().find(|(from, _)| *from == (month, day)) {
        month = m;
        day = d;
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| EngineError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
}
