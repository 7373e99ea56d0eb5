//! Score calculation for title quality

use crate::{Issue, QualityBand};

/// Every title starts from this score before penalties
pub const BASE_SCORE: u8 = 100;

/// Calculator for title quality scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Subtract every issue's penalty from the base score, floored at 0
    pub fn calculate(issues: &[Issue]) -> u8 {
        let penalty: i32 = issues.iter().map(|i| i32::from(i.penalty)).sum();
        (i32::from(BASE_SCORE) - penalty).clamp(0, i32::from(BASE_SCORE)) as u8
    }

    /// Get a description of the band
    pub fn band_description(band: QualityBand) -> &'static str {
        match band {
            QualityBand::Good => "Ready to test - follows Shopping title guidelines",
            QualityBand::Fair => "Usable - a few guideline issues to review",
            QualityBand::Poor => "Needs work - likely to underperform or be flagged",
        }
    }
}
