//! Analyzer module - title quality scoring

pub mod engine;
pub mod rules;
pub mod scoring;

pub use engine::{TitleAnalysis, TitleAnalyzer};
pub use rules::TitleRules;
pub use scoring::ScoreCalculator;
