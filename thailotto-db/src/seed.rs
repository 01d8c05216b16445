use crate::error::RecordError;
use crate::models::DrawRecord;

/// Confirmed results used to bootstrap an empty history.
const SEED: &[(&str, &str)] = &[
    ("17-01-2018", "50"),
    ("17-01-2019", "65"),
    ("17-01-2021", "68"),
    ("17-01-2022", "15"),
    ("17-01-2023", "92"),
    ("17-01-2024", "47"),
    ("17-01-2025", "61"),
    ("01-11-2025", "87"),
    ("16-11-2025", "38"),
    ("01-12-2025", "22"),
    ("16-12-2025", "52"),
    ("30-12-2025", "59"),
    ("02-01-2026", "16"),
];

/// Seed draws, oldest first.
pub fn seed_records() -> Result<Vec<DrawRecord>, RecordError> {
    SEED.iter()
        .map(|(date, number)| DrawRecord::parse(date, number))
        .collect()
}
