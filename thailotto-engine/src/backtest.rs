use serde::Serialize;
use thailotto_db::models::{DrawRecord, CANDIDATE_COUNT};
use tracing::debug;

use crate::predict::Predictor;
use crate::rank::RankOptions;

#[derive(Debug, Clone, Serialize)]
pub struct BacktestStep {
    pub record: DrawRecord,
    pub rank: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub top_n: usize,
    pub n_tests: usize,
    pub hits: usize,
    pub steps: Vec<BacktestStep>,
}

impl BacktestReport {
    pub fn hit_rate(&self) -> f64 {
        if self.n_tests == 0 {
            return 0.0;
        }
        self.hits as f64 / self.n_tests as f64
    }

    /// Hit rate of picking `top_n` numbers uniformly at random.
    pub fn uniform_baseline(&self) -> f64 {
        self.top_n.min(CANDIDATE_COUNT) as f64 / CANDIDATE_COUNT as f64
    }
}

/// Walk-forward evaluation over the most recent `max_tests` draws. Each draw is
/// predicted from strictly earlier records only, so nothing leaks from the future.
pub fn backtest(
    predictor: &Predictor,
    history: &[DrawRecord],
    top_n: usize,
    max_tests: usize,
) -> BacktestReport {
    let mut sorted = history.to_vec();
    sorted.sort_by_key(|r| r.date);

    let mut steps = Vec::new();
    for record in sorted.iter().rev().take(max_tests) {
        let cutoff = sorted.partition_point(|r| r.date < record.date);
        if cutoff == 0 {
            continue;
        }
        let prediction = predictor.predict_from(&sorted[..cutoff], record.date, RankOptions::top(top_n));
        let rank = prediction
            .ranked
            .iter()
            .position(|c| c.number() == record.number)
            .map(|p| p + 1);
        steps.push(BacktestStep { record: *record, rank });
    }
    steps.reverse();

    let hits = steps.iter().filter(|s| s.rank.is_some()).count();
    debug!(tests = steps.len(), hits, "backtest finished");

    BacktestReport {
        top_n,
        n_tests: steps.len(),
        hits,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::make_records;
    use thailotto_db::seed::seed_records;

    #[test]
    fn test_backtest_skips_first_draw() {
        let history = make_records(&[("01-11-2025", "87"), ("16-11-2025", "38")]);
        let report = backtest(&Predictor::default(), &history, 5, 10);
        assert_eq!(report.n_tests, 1);
        assert_eq!(report.steps[0].record.number.to_string(), "38");
    }

    #[test]
    fn test_backtest_no_future_leak() {
        // Repeat of 87 cannot be ranked: the only earlier draw is 87 itself, penalised.
        let history = make_records(&[("01-11-2025", "87"), ("16-11-2025", "87")]);
        let report = backtest(&Predictor::default(), &history, 5, 10);
        assert_eq!(report.hits, 0);
        assert_eq!(report.hit_rate(), 0.0);
    }

    #[test]
    fn test_backtest_seasonal_hit() {
        // 61 on Teacher's Day 2025, then again in 2026 after two other draws
        let history = make_records(&[
            ("17-01-2025", "61"),
            ("01-02-2025", "10"),
            ("16-02-2025", "11"),
            ("17-01-2026", "61"),
        ]);
        let report = backtest(&Predictor::default(), &history, 1, 1);
        assert_eq!(report.n_tests, 1);
        assert_eq!(report.steps[0].rank, Some(1));
        assert_eq!(report.hit_rate(), 1.0);
    }

    #[test]
    fn test_backtest_limits_tests() {
        let history = seed_records().unwrap();
        let report = backtest(&Predictor::default(), &history, 5, 4);
        assert_eq!(report.n_tests, 4);
        assert!(report.steps.windows(2).all(|w| w[0].record.date < w[1].record.date));
        assert!((report.uniform_baseline() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_backtest_empty_history() {
        let report = backtest(&Predictor::default(), &[], 5, 10);
        assert_eq!(report.n_tests, 0);
        assert_eq!(report.hit_rate(), 0.0);
    }
}
