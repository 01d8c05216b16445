use anyhow::Context;
use chrono::NaiveDate;
use thailotto_db::models::DrawRecord;
use thailotto_db::store::HistoryStore;
use tracing::{debug, info};

use crate::config::ScoringWeights;
use crate::context::{ContextResolver, DrawContext};
use crate::error::EngineError;
use crate::rank::{rank_with, RankOptions};
use crate::scoring::running::hot_digit;
use crate::scoring::{History, ScoreBoard, ScoredCandidate, Scorer};

#[derive(Debug, Clone)]
pub struct Prediction {
    pub context: DrawContext,
    pub ranked: Vec<ScoredCandidate>,
    pub board: ScoreBoard,
    /// Records dated before the target, the only ones scored.
    pub history_len: usize,
    pub hot_digit: Option<u8>,
}

/// Caller-owned engine: holiday table plus scoring weights.
pub struct Predictor {
    resolver: ContextResolver,
    scorer: Scorer,
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(ContextResolver::default(), &ScoringWeights::default())
    }
}

impl Predictor {
    pub fn new(resolver: ContextResolver, weights: &ScoringWeights) -> Self {
        Self {
            resolver,
            scorer: Scorer::from_weights(weights),
        }
    }

    pub fn resolver(&self) -> &ContextResolver {
        &self.resolver
    }

    /// Pure scoring over an already loaded history. Draws on or after the
    /// target date are ignored.
    pub fn predict_from(
        &self,
        history: &[DrawRecord],
        target_date: NaiveDate,
        options: RankOptions,
    ) -> Prediction {
        let earlier: Vec<DrawRecord> = history
            .iter()
            .filter(|r| r.date < target_date)
            .copied()
            .collect();
        if earlier.len() < history.len() {
            debug!(
                ignored = history.len() - earlier.len(),
                "draws on or after the target left out"
            );
        }

        let context = self.resolver.resolve(target_date);
        let board = self.scorer.score_all(&context, &earlier);
        let hot_digit = hot_digit(&context, &History::new(&earlier));
        let ranked = rank_with(&board, options);
        debug!(
            target = %target_date,
            label = context.label.unwrap_or("-"),
            ranked = ranked.len(),
            "prediction computed"
        );
        Prediction {
            context,
            ranked,
            board,
            history_len: earlier.len(),
            hot_digit,
        }
    }

    pub fn predict(
        &self,
        store: &dyn HistoryStore,
        target_date: NaiveDate,
        options: RankOptions,
    ) -> Result<Prediction, EngineError> {
        let history = store.load().context("loading draw history")?;
        if history.is_empty() {
            info!("empty history, scoring from cultural patterns only");
        }
        Ok(self.predict_from(&history, target_date, options))
    }
}

/// Default-weighted prediction of the top `top_n` positive candidates.
pub fn predict(
    store: &dyn HistoryStore,
    target_date: NaiveDate,
    top_n: usize,
) -> Result<Vec<ScoredCandidate>, EngineError> {
    Predictor::default()
        .predict(store, target_date, RankOptions::top(top_n))
        .map(|p| p.ranked)
}
