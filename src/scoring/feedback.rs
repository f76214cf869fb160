use serde::Serialize;
use std::cmp::Ordering;
use strum::Display;

use super::rubric::SubScore;
use super::text::KeywordCoverage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Verdict {
    #[strum(to_string = "Outstanding")]
    #[serde(rename = "Outstanding")]
    Outstanding,
    #[strum(to_string = "Very good")]
    #[serde(rename = "Very good")]
    VeryGood,
    #[strum(to_string = "Good")]
    #[serde(rename = "Good")]
    Good,
    #[strum(to_string = "Needs improvement")]
    #[serde(rename = "Needs improvement")]
    NeedsImprovement,
    #[strum(to_string = "Weak")]
    #[serde(rename = "Weak")]
    Weak,
}

impl Verdict {
    pub fn from_total(total: u8) -> Self {
        match total {
            90..=u8::MAX => Self::Outstanding,
            75..=89 => Self::VeryGood,
            60..=74 => Self::Good,
            40..=59 => Self::NeedsImprovement,
            _ => Self::Weak,
        }
    }
}

/// Deterministic qualitative summary derived from the numeric sub-scores.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackSummary {
    /// Top two dimensions by points-earned ratio.
    pub strengths: Vec<String>,
    /// Bottom two dimensions, worst first.
    pub improvements: Vec<String>,
    /// Required elements the transcript never mentions, by display label.
    pub missing_required: Vec<String>,
    pub verdict: Verdict,
}

/// Ranks dimensions by earned ratio. Sorting is stable, so dimensions with
/// equal ratios keep their fixed rubric order.
pub fn synthesize(sub_scores: &[SubScore], coverage: &KeywordCoverage, total: u8) -> FeedbackSummary {
    let by_ratio = |a: &&SubScore, b: &&SubScore| {
        a.ratio().partial_cmp(&b.ratio()).unwrap_or(Ordering::Equal)
    };

    let mut descending: Vec<&SubScore> = sub_scores.iter().collect();
    descending.sort_by(|a, b| by_ratio(b, a));

    let mut ascending: Vec<&SubScore> = sub_scores.iter().collect();
    ascending.sort_by(by_ratio);

    FeedbackSummary {
        strengths: descending
            .iter()
            .take(2)
            .map(|s| s.dimension.to_string())
            .collect(),
        improvements: ascending
            .iter()
            .take(2)
            .map(|s| s.dimension.to_string())
            .collect(),
        missing_required: coverage
            .missing_required()
            .iter()
            .map(|e| e.to_string())
            .collect(),
        verdict: Verdict::from_total(total),
    }
}
