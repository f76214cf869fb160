use serde::Serialize;

use super::grammar;
use super::text::TokenSet;
use crate::settings::settings;

/// Lexicon sentiment over the whole transcript. `compound` is the overall
/// polarity in [-1, 1]; `positive` is the positive proportion in [0, 1]
/// that drives the engagement score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentScore {
    pub compound: f64,
    pub positive: f64,
}

/// Raw measurements feeding the rubric scorer. Immutable once computed.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureBundle {
    pub wpm: f64,
    pub ttr: f64,
    pub filler_count: usize,
    /// Filler occurrences as a fraction of total tokens.
    pub filler_rate: f64,
    pub grammar_penalties: usize,
    pub errors_per_100: f64,
    pub sentiment: SentimentScore,
}

pub fn extract_features(raw_text: &str, tokens: &TokenSet, duration_seconds: f64) -> FeatureBundle {
    let word_count = tokens.word_count();
    let filler_count = count_fillers(tokens);
    let grammar_penalties = grammar::penalty_count(raw_text, tokens);

    let errors_per_100 = if word_count == 0 {
        0.0
    } else {
        ((grammar_penalties as f64 / word_count as f64) * 100.0).min(100.0)
    };

    FeatureBundle {
        wpm: words_per_minute(word_count, duration_seconds),
        ttr: type_token_ratio(tokens),
        filler_count,
        filler_rate: if word_count == 0 {
            0.0
        } else {
            filler_count as f64 / word_count as f64
        },
        grammar_penalties,
        errors_per_100,
        sentiment: analyze_sentiment(raw_text, tokens),
    }
}

pub fn words_per_minute(word_count: usize, duration_seconds: f64) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    (word_count as f64 * 60.0) / duration_seconds
}

pub fn type_token_ratio(tokens: &TokenSet) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    tokens.distinct_words as f64 / tokens.word_count() as f64
}

/// Counts filler occurrences: single-word fillers match whole tokens,
/// multi-word fillers match token windows.
pub fn count_fillers(tokens: &TokenSet) -> usize {
    settings()
        .fillers
        .iter()
        .map(|f| count_phrase(tokens, f))
        .sum()
}

fn count_phrase(tokens: &TokenSet, phrase: &str) -> usize {
    let parts: Vec<&str> = phrase.split_whitespace().collect();
    match parts.as_slice() {
        [] => 0,
        [word] => tokens.tokens.iter().filter(|t| t == word).count(),
        parts => tokens
            .tokens
            .windows(parts.len())
            .filter(|window| window.iter().zip(parts).all(|(w, p)| w == p))
            .count(),
    }
}

pub fn analyze_sentiment(raw_text: &str, tokens: &TokenSet) -> SentimentScore {
    if tokens.is_empty() {
        return SentimentScore::default();
    }
    let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
    let scores = analyzer.polarity_scores(raw_text);
    SentimentScore {
        compound: scores.get("compound").copied().unwrap_or(0.0),
        positive: scores.get("pos").copied().unwrap_or(0.0),
    }
}
