use std::cmp::Ordering;

use crate::scoring::{ScoreBoard, ScoredCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    pub top_n: usize,
    /// Keep zero and negative scores in the report.
    pub include_non_positive: bool,
}

impl RankOptions {
    pub fn top(top_n: usize) -> Self {
        Self {
            top_n,
            include_non_positive: false,
        }
    }
}

/// Score descending, then number ascending.
fn ranking_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score()
        .cmp(&a.score())
        .then_with(|| a.number().cmp(&b.number()))
}

/// Top `top_n` positively scored candidates.
pub fn rank(board: &ScoreBoard, top_n: usize) -> Vec<ScoredCandidate> {
    rank_with(board, RankOptions::top(top_n))
}

pub fn rank_with(board: &ScoreBoard, options: RankOptions) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = board
        .iter()
        .filter(|c| options.include_non_positive || c.score() > 0)
        .cloned()
        .collect();
    ranked.sort_by(ranking_order);
    ranked.truncate(options.top_n);
    ranked
}
