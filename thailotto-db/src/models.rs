use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RecordError;

/// Number of distinct two-digit results (00 to 99).
pub const CANDIDATE_COUNT: usize = 100;

/// Date layout of the legacy JSON cache.
pub const LEGACY_DATE_FORMAT: &str = "%d-%m-%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Last-two-digits result of a draw, always rendered zero-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TwoDigit(u8);

impl TwoDigit {
    /// Builds a number in a const context; an out-of-range literal fails to compile
    /// when used in a `static` or `const`.
    ///
    /// # Panics
    ///
    /// Panics at runtime if `value > 99`.
    pub const fn of(value: u8) -> Self {
        assert!(value <= 99, "two-digit number out of range");
        Self(value)
    }

    pub fn new(value: u8) -> Result<Self, RecordError> {
        if value > 99 {
            return Err(RecordError::InvalidNumber(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Last two digits of any integer, e.g. a year: 2026 -> 26, 2569 -> 69.
    pub fn tail_of(n: i32) -> Self {
        Self(n.rem_euclid(100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Every candidate from 00 to 99, ascending.
    pub fn all() -> impl Iterator<Item = TwoDigit> {
        (0..CANDIDATE_COUNT as u8).map(TwoDigit)
    }
}

impl FromStr for TwoDigit {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(RecordError::InvalidNumber(s.to_string()));
        }
        Ok(Self((bytes[0] - b'0') * 10 + (bytes[1] - b'0')))
    }
}

impl fmt::Display for TwoDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl Serialize for TwoDigit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TwoDigit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One historical draw. Records are append-only and never rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    #[serde(with = "legacy_date")]
    pub date: NaiveDate,
    pub number: TwoDigit,
}

impl DrawRecord {
    pub fn new(date: NaiveDate, number: TwoDigit) -> Self {
        Self { date, number }
    }

    /// Validates raw text fields, rejecting anything that is not a real date
    /// or an exact two-digit number.
    pub fn parse(date: &str, number: &str) -> Result<Self, RecordError> {
        Ok(Self {
            date: parse_record_date(date)?,
            number: number.trim().parse()?,
        })
    }
}

pub fn parse_record_date(raw: &str) -> Result<NaiveDate, RecordError> {
    let raw = raw.trim();
    [LEGACY_DATE_FORMAT, ISO_DATE_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| RecordError::InvalidDate(raw.to_string()))
}

pub fn format_legacy_date(date: NaiveDate) -> String {
    date.format(LEGACY_DATE_FORMAT).to_string()
}

mod legacy_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(super::LEGACY_DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_record_date(&raw).map_err(serde::de::Error::custom)
    }
}
