pub mod backtest;
pub mod config;
pub mod context;
pub mod error;
pub mod predict;
pub mod rank;
pub mod schedule;
pub mod scoring;

pub use context::{ContextResolver, DrawContext};
pub use error::EngineError;
pub use predict::{predict, Prediction, Predictor};
pub use rank::{rank, rank_with, RankOptions};
pub use scoring::{score_all, Evidence, ScoreBoard, ScoredCandidate, Scorer};
