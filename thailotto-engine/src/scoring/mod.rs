pub mod cultural;
pub mod recent;
pub mod repeat;
pub mod running;
pub mod seasonal;
pub mod weekday;

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thailotto_db::models::{DrawRecord, TwoDigit, CANDIDATE_COUNT};
use tracing::debug;

use crate::config::ScoringWeights;
use crate::context::DrawContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Evidence {
    #[serde(rename = "Cultural Pattern")]
    CulturalPattern,
    #[serde(rename = "Seasonal Match")]
    SeasonalMatch,
    #[serde(rename = "Running Digit")]
    RunningDigit,
    #[serde(rename = "Weekday Match")]
    WeekdayMatch,
    #[serde(rename = "Recent Trend")]
    RecentTrend,
    #[serde(rename = "Repeat Penalty")]
    RepeatPenalty,
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Evidence::CulturalPattern => "Cultural Pattern",
            Evidence::SeasonalMatch => "Seasonal Match",
            Evidence::RunningDigit => "Running Digit",
            Evidence::WeekdayMatch => "Weekday Match",
            Evidence::RecentTrend => "Recent Trend",
            Evidence::RepeatPenalty => "Repeat Penalty",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub evidence: Evidence,
    pub points: i32,
}

/// Score of one number with the evidence behind it. The score is always the
/// sum of the contributions, and each evidence appears at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    number: TwoDigit,
    score: i32,
    contributions: Vec<Contribution>,
}

impl ScoredCandidate {
    pub fn new(number: TwoDigit) -> Self {
        Self {
            number,
            score: 0,
            contributions: Vec::new(),
        }
    }

    pub fn number(&self) -> TwoDigit {
        self.number
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Labels in the order their sources were applied.
    pub fn evidence(&self) -> Vec<Evidence> {
        self.contributions.iter().map(|c| c.evidence).collect()
    }

    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    /// Points this number received from one source, 0 if none.
    pub fn contribution(&self, evidence: Evidence) -> i32 {
        self.contributions
            .iter()
            .find(|c| c.evidence == evidence)
            .map_or(0, |c| c.points)
    }

    pub fn add(&mut self, evidence: Evidence, points: i32) {
        if points == 0 {
            return;
        }
        self.score += points;
        match self.contributions.iter_mut().find(|c| c.evidence == evidence) {
            Some(existing) => existing.points += points,
            None => self.contributions.push(Contribution { evidence, points }),
        }
    }
}

impl Serialize for ScoredCandidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ScoredCandidate", 4)?;
        state.serialize_field("number", &self.number)?;
        state.serialize_field("score", &self.score)?;
        state.serialize_field("evidence", &self.evidence())?;
        state.serialize_field("contributions", &self.contributions)?;
        state.end()
    }
}

/// One candidate per number from 00 to 99, indexed by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    candidates: Vec<ScoredCandidate>,
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self {
            candidates: TwoDigit::all().map(ScoredCandidate::new).collect(),
        }
    }
}

impl ScoreBoard {
    pub fn get(&self, number: TwoDigit) -> &ScoredCandidate {
        &self.candidates[number.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredCandidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn add(&mut self, number: TwoDigit, evidence: Evidence, points: i32) {
        self.candidates[number.index()].add(evidence, points);
    }

    pub fn contribution(&self, number: TwoDigit, evidence: Evidence) -> i32 {
        self.get(number).contribution(evidence)
    }
}

/// Date-ordered view over a history slice.
#[derive(Debug, Clone)]
pub struct History<'a> {
    records: Vec<&'a DrawRecord>,
}

impl<'a> History<'a> {
    pub fn new(records: &'a [DrawRecord]) -> Self {
        let mut records: Vec<&DrawRecord> = records.iter().collect();
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &'a DrawRecord> + '_ {
        self.records.iter().copied()
    }

    /// Newest first.
    pub fn most_recent(&self, n: usize) -> impl Iterator<Item = &'a DrawRecord> + '_ {
        self.records.iter().rev().take(n).copied()
    }

    pub fn latest(&self) -> Option<&'a DrawRecord> {
        self.records.last().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub trait EvidenceSource: Send + Sync {
    fn evidence(&self) -> Evidence;
    /// One entry per occurrence; a number listed twice scores twice.
    fn hits(&self, context: &DrawContext, history: &History<'_>) -> Vec<(TwoDigit, i32)>;
}

pub struct Scorer {
    sources: Vec<Box<dyn EvidenceSource>>,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::from_weights(&ScoringWeights::default())
    }
}

impl Scorer {
    /// Sources in application order: cultural, seasonal, running digit, weekday,
    /// recent trend, repeat penalty.
    pub fn from_weights(weights: &ScoringWeights) -> Self {
        Self {
            sources: vec![
                Box::new(cultural::CulturalSource),
                Box::new(seasonal::SeasonalSource::new(weights.seasonal)),
                Box::new(running::RunningDigitSource::new(weights.running_digit)),
                Box::new(weekday::WeekdaySource::new(weights.weekday)),
                Box::new(recent::RecentTrendSource::new(weights.recent, weights.recent_window)),
                Box::new(repeat::RepeatPenaltySource::new(weights.repeat_penalty)),
            ],
        }
    }

    pub fn score_all(&self, context: &DrawContext, records: &[DrawRecord]) -> ScoreBoard {
        let history = History::new(records);
        let mut board = ScoreBoard::default();
        for source in &self.sources {
            let evidence = source.evidence();
            let hits = source.hits(context, &history);
            debug!(%evidence, hits = hits.len(), "evidence source applied");
            for (number, points) in hits {
                board.add(number, evidence, points);
            }
        }
        debug_assert_eq!(board.len(), CANDIDATE_COUNT);
        board
    }
}

/// Scores all 100 numbers with the default weights.
pub fn score_all(context: &DrawContext, records: &[DrawRecord]) -> ScoreBoard {
    Scorer::default().score_all(context, records)
}

#[cfg(test)]
pub(crate) fn make_records(rows: &[(&str, &str)]) -> Vec<DrawRecord> {
    rows.iter()
        .map(|(date, number)| DrawRecord::parse(date, number).unwrap())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextResolver;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn teachers_day() -> DrawContext {
        ContextResolver::default().resolve(NaiveDate::from_ymd_opt(2026, 1, 17).unwrap())
    }

    fn plain_day() -> DrawContext {
        ContextResolver::default().resolve(NaiveDate::from_ymd_opt(2026, 3, 16).unwrap())
    }

    #[test]
    fn test_board_covers_all_numbers() {
        let board = score_all(&plain_day(), &[]);
        assert_eq!(board.len(), 100);
        for (i, c) in board.iter().enumerate() {
            assert_eq!(c.number().index(), i);
        }
    }

    #[test]
    fn test_empty_history_no_holiday_all_zero() {
        let board = score_all(&plain_day(), &[]);
        for c in board.iter() {
            assert_eq!(c.score(), 0);
            assert!(c.evidence().is_empty());
        }
    }

    #[test]
    fn test_empty_history_cultural_only() {
        let ctx = teachers_day();
        let board = score_all(&ctx, &[]);
        for c in board.iter() {
            if ctx.bias_numbers.contains(&c.number()) {
                assert_eq!(c.score(), 5);
                assert_eq!(c.evidence(), vec![Evidence::CulturalPattern]);
            } else {
                assert_eq!(c.score(), 0);
            }
        }
    }

    #[test]
    fn test_scenario_teachers_day_with_seasonal() {
        let history = make_records(&[("17-01-2025", "61")]);
        let board = score_all(&teachers_day(), &history);
        let c = board.get(TwoDigit::of(61));
        // cultural 5 + seasonal 3 + recent 1 - repeat 5
        assert_eq!(c.score(), 4);
        assert_eq!(
            c.evidence(),
            vec![
                Evidence::CulturalPattern,
                Evidence::SeasonalMatch,
                Evidence::RecentTrend,
                Evidence::RepeatPenalty
            ]
        );
    }

    #[test]
    fn test_scenario_day_before_is_not_seasonal() {
        let history = make_records(&[("16-01-2025", "61")]);
        let board = score_all(&teachers_day(), &history);
        let c = board.get(TwoDigit::of(61));
        // cultural 5 + recent 1 - repeat 5
        assert_eq!(c.score(), 1);
        assert!(c.evidence().contains(&Evidence::CulturalPattern));
        assert!(!c.evidence().contains(&Evidence::SeasonalMatch));
    }

    #[test]
    fn test_repeat_penalty_applies_regardless() {
        let history = make_records(&[("01-03-2026", "40"), ("02-03-2026", "61")]);
        let board = score_all(&plain_day(), &history);
        let c = board.get(TwoDigit::of(61));
        assert_eq!(c.contribution(Evidence::RepeatPenalty), -5);
        assert_eq!(c.score(), 1 - 5);
    }

    #[test]
    fn test_seasonal_cumulative_single_label() {
        let history = make_records(&[
            ("16-03-2023", "08"),
            ("16-03-2024", "08"),
            ("16-03-2025", "08"),
            ("01-01-2026", "33"),
            ("16-01-2026", "34"),
            ("01-02-2026", "35"),
            ("16-02-2026", "36"),
            ("01-03-2026", "37"),
        ]);
        let board = score_all(&plain_day(), &history);
        let c = board.get(TwoDigit::of(8));
        assert_eq!(c.score(), 9);
        assert_eq!(c.evidence(), vec![Evidence::SeasonalMatch]);
    }

    #[test]
    fn test_recent_trend_window_is_five() {
        let history = make_records(&[
            ("01-01-2026", "11"),
            ("16-01-2026", "12"),
            ("01-02-2026", "12"),
            ("16-02-2026", "13"),
            ("01-03-2026", "14"),
            ("02-03-2026", "15"),
        ]);
        let board = score_all(&plain_day(), &history);
        assert_eq!(board.contribution(TwoDigit::of(11), Evidence::RecentTrend), 0);
        assert_eq!(board.contribution(TwoDigit::of(12), Evidence::RecentTrend), 2);
        assert_eq!(board.get(TwoDigit::of(12)).evidence(), vec![Evidence::RecentTrend]);
    }

    #[test]
    fn test_unsorted_history_is_ordered_by_date() {
        let history = make_records(&[("02-03-2026", "15"), ("01-03-2026", "14")]);
        let board = score_all(&plain_day(), &history);
        assert_eq!(board.contribution(TwoDigit::of(15), Evidence::RepeatPenalty), -5);
        assert_eq!(board.contribution(TwoDigit::of(14), Evidence::RepeatPenalty), 0);
    }

    #[test]
    fn test_candidate_add_zero_is_noop() {
        let mut c = ScoredCandidate::new(TwoDigit::of(1));
        c.add(Evidence::WeekdayMatch, 0);
        assert!(c.evidence().is_empty());
        assert_eq!(c.score(), 0);
    }

    #[test]
    fn test_evidence_labels() {
        assert_eq!(Evidence::CulturalPattern.to_string(), "Cultural Pattern");
        assert_eq!(Evidence::RepeatPenalty.to_string(), "Repeat Penalty");
    }

    #[test]
    fn test_evidence_serializes_as_label() {
        for evidence in [
            Evidence::CulturalPattern,
            Evidence::SeasonalMatch,
            Evidence::RunningDigit,
            Evidence::WeekdayMatch,
            Evidence::RecentTrend,
            Evidence::RepeatPenalty,
        ] {
            let json = serde_json::to_string(&evidence).unwrap();
            assert_eq!(json, format!("\"{evidence}\""));
        }
    }

    #[test]
    fn test_candidate_json_carries_labels() {
        let mut c = ScoredCandidate::new(TwoDigit::of(61));
        c.add(Evidence::CulturalPattern, 5);
        c.add(Evidence::SeasonalMatch, 3);
        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "number": "61",
                "score": 8,
                "evidence": ["Cultural Pattern", "Seasonal Match"],
                "contributions": [
                    {"evidence": "Cultural Pattern", "points": 5},
                    {"evidence": "Seasonal Match", "points": 3}
                ]
            })
        );
    }

    fn arb_history() -> impl Strategy<Value = Vec<DrawRecord>> {
        prop::collection::vec((0i64..4000, 0u8..100), 0..40).prop_map(|rows| {
            let base = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
            rows.into_iter()
                .map(|(offset, n)| {
                    DrawRecord::new(base + chrono::Duration::days(offset), TwoDigit::of(n))
                })
                .collect()
        })
    }

    fn arb_target() -> impl Strategy<Value = NaiveDate> {
        (0i64..5000).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2014, 1, 1).unwrap() + chrono::Duration::days(offset)
        })
    }

    proptest! {
        #[test]
        fn prop_score_is_sum_of_contributions(history in arb_history(), target in arb_target()) {
            let ctx = ContextResolver::default().resolve(target);
            let board = score_all(&ctx, &history);
            for c in board.iter() {
                let sum: i32 = [
                    Evidence::CulturalPattern,
                    Evidence::SeasonalMatch,
                    Evidence::RunningDigit,
                    Evidence::WeekdayMatch,
                    Evidence::RecentTrend,
                    Evidence::RepeatPenalty,
                ]
                .iter()
                .map(|&e| c.contribution(e))
                .sum();
                prop_assert_eq!(c.score(), sum);
                let mut labels = c.evidence();
                let before = labels.len();
                labels.dedup();
                prop_assert_eq!(labels.len(), before);
                prop_assert!(c.contributions().iter().all(|x| x.points != 0));
            }
        }

        #[test]
        fn prop_score_all_is_pure(history in arb_history(), target in arb_target()) {
            let ctx = ContextResolver::default().resolve(target);
            prop_assert_eq!(score_all(&ctx, &history), score_all(&ctx, &history));
        }

        #[test]
        fn prop_no_holiday_no_cultural(history in arb_history(), target in arb_target()) {
            let ctx = ContextResolver::default().resolve(target);
            prop_assume!(!ctx.is_holiday());
            let board = score_all(&ctx, &history);
            prop_assert!(board.iter().all(|c| c.contribution(Evidence::CulturalPattern) == 0));
        }

        #[test]
        fn prop_unreferenced_numbers_score_zero(history in arb_history(), target in arb_target()) {
            let ctx = ContextResolver::default().resolve(target);
            let board = score_all(&ctx, &history);
            for c in board.iter() {
                let referenced = ctx.bias_numbers.contains(&c.number())
                    || history.iter().any(|r| r.number == c.number());
                if !referenced {
                    prop_assert_eq!(c.score(), 0);
                    prop_assert!(c.evidence().is_empty());
                }
            }
        }
    }
}
