use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

use super::feedback::FeedbackSummary;
use super::features::{FeatureBundle, SentimentScore};
use super::semantic::SimilarityScores;
use super::text::{KeywordCoverage, SentenceTag, TokenSet};
use crate::settings::{settings, Band};

pub const SALUTATION_POINTS: u8 = 5;
pub const KEYWORD_POINTS: u8 = 30;
pub const FLOW_POINTS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize)]
pub enum Dimension {
    #[strum(to_string = "Content & Structure")]
    #[serde(rename = "Content & Structure")]
    Content,
    #[strum(to_string = "Speech Rate")]
    #[serde(rename = "Speech Rate")]
    Rate,
    #[strum(to_string = "Language & Grammar")]
    #[serde(rename = "Language & Grammar")]
    Language,
    #[strum(to_string = "Clarity")]
    #[serde(rename = "Clarity")]
    Clarity,
    #[strum(to_string = "Engagement")]
    #[serde(rename = "Engagement")]
    Engagement,
}

impl Dimension {
    pub fn points_possible(&self) -> u8 {
        match self {
            Self::Content => SALUTATION_POINTS + KEYWORD_POINTS + FLOW_POINTS,
            Self::Rate => 10,
            Self::Language => 20,
            Self::Clarity => 15,
            Self::Engagement => 15,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SubScore {
    pub dimension: Dimension,
    pub points: u8,
    pub possible: u8,
}

impl SubScore {
    pub fn ratio(&self) -> f64 {
        if self.possible == 0 {
            return 0.0;
        }
        self.points as f64 / self.possible as f64
    }
}

/// Structure-level signals feeding the Content & Structure dimension.
#[derive(Debug, Clone)]
pub struct ContentSignals {
    pub salutation_level: u8,
    pub coverage: KeywordCoverage,
    pub tags: Vec<SentenceTag>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContentBreakdown {
    pub salutation: u8,
    pub keywords: u8,
    pub flow: u8,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TranscriptStats {
    pub word_count: usize,
    pub distinct_words: usize,
    pub sentence_count: usize,
}

/// The aggregate result of one scoring call. Constructed once, never
/// mutated, serializable for any presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub sub_scores: Vec<SubScore>,
    pub total: u8,
    pub content: ContentBreakdown,
    pub stats: TranscriptStats,
    pub coverage: KeywordCoverage,
    pub features: FeatureBundle,
    pub similarity: Option<SimilarityScores>,
    pub feedback: FeedbackSummary,
}

#[derive(Debug, Clone)]
pub struct RubricScores {
    pub sub_scores: Vec<SubScore>,
    pub total: u8,
    pub content: ContentBreakdown,
}

fn lower_bound_band(bands: &[Band], floor: u8, value: f64) -> u8 {
    bands
        .iter()
        .find(|b| value >= b.threshold)
        .map(|b| b.points)
        .unwrap_or(floor)
}

fn upper_bound_band(bands: &[Band], floor: u8, value: f64) -> u8 {
    bands
        .iter()
        .find(|b| value <= b.threshold)
        .map(|b| b.points)
        .unwrap_or(floor)
}

pub fn score_content(signals: &ContentSignals) -> ContentBreakdown {
    let keywords: u8 = signals
        .coverage
        .present()
        .iter()
        .map(|e| e.points())
        .sum::<u8>()
        .min(KEYWORD_POINTS);

    ContentBreakdown {
        salutation: signals.salutation_level.min(SALUTATION_POINTS),
        keywords,
        flow: score_flow(&signals.tags),
    }
}

/// Flow is all-or-nothing: the transcript needs a salutation, at least one
/// basic-information sentence and a closing.
pub fn score_flow(tags: &[SentenceTag]) -> u8 {
    let has_salutation = tags.contains(&SentenceTag::Salutation);
    let has_basic = tags.contains(&SentenceTag::Basic);
    let has_closing = tags.contains(&SentenceTag::Closing);

    if has_salutation && has_basic && has_closing {
        FLOW_POINTS
    } else {
        0
    }
}

/// Band boundaries are inclusive on the better side: exactly 111 or 140 WPM
/// is ideal, exactly 80 or 160 is only slightly off.
pub fn score_speech_rate(wpm: f64, word_count: usize) -> u8 {
    if word_count == 0 {
        return 0;
    }
    let r = &settings().rate;
    if wpm >= r.ideal_min && wpm <= r.ideal_max {
        r.ideal_points
    } else if (wpm >= r.slow_min && wpm < r.ideal_min) || (wpm > r.ideal_max && wpm <= r.fast_max) {
        r.off_points
    } else {
        r.extreme_points
    }
}

pub fn score_grammar(errors_per_100: f64, word_count: usize) -> u8 {
    if word_count == 0 {
        return 0;
    }
    let g = &settings().grammar;
    let gram_frac = 1.0 - (errors_per_100 / g.errors_per_100_cap).min(1.0);
    lower_bound_band(&g.bands, g.floor_points, gram_frac)
}

pub fn score_vocabulary(ttr: f64, word_count: usize) -> u8 {
    if word_count == 0 {
        return 0;
    }
    let v = &settings().vocabulary;
    lower_bound_band(&v.bands, v.floor_points, ttr)
}

pub fn score_clarity(filler_rate: f64, word_count: usize) -> u8 {
    if word_count == 0 {
        return 0;
    }
    let c = &settings().clarity;
    upper_bound_band(&c.bands, c.floor_points, filler_rate * 100.0)
}

pub fn score_engagement(sentiment: SentimentScore) -> u8 {
    let e = &settings().engagement;
    lower_bound_band(&e.bands, e.floor_points, sentiment.positive)
}

/// Applies every rule and sums the five bounded sub-scores. Each term is
/// individually clamped to its dimension maximum, so the total is in
/// [0, 100] by construction.
pub fn score_rubric(
    tokens: &TokenSet,
    features: &FeatureBundle,
    signals: &ContentSignals,
) -> RubricScores {
    let word_count = tokens.word_count();
    let content = score_content(signals);

    let points = |dimension: Dimension| -> u8 {
        let raw = match dimension {
            Dimension::Content => content.salutation + content.keywords + content.flow,
            Dimension::Rate => score_speech_rate(features.wpm, word_count),
            Dimension::Language => {
                score_grammar(features.errors_per_100, word_count)
                    + score_vocabulary(features.ttr, word_count)
            }
            Dimension::Clarity => score_clarity(features.filler_rate, word_count),
            Dimension::Engagement => score_engagement(features.sentiment),
        };
        raw.min(dimension.points_possible())
    };

    let sub_scores: Vec<SubScore> = Dimension::iter()
        .map(|dimension| SubScore {
            dimension,
            points: points(dimension),
            possible: dimension.points_possible(),
        })
        .collect();

    let total = sub_scores.iter().map(|s| s.points).sum();

    RubricScores {
        sub_scores,
        total,
        content,
    }
}
