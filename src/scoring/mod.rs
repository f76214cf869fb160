pub mod feedback;
pub mod features;
pub mod grammar;
pub mod rubric;
pub mod semantic;
pub mod text;

pub use feedback::{synthesize, FeedbackSummary, Verdict};
pub use features::{extract_features, FeatureBundle, SentimentScore};
pub use rubric::{
    score_rubric, ContentBreakdown, ContentSignals, Dimension, ScoreReport, SubScore,
    TranscriptStats,
};
pub use semantic::{
    cosine_similarity, Criterion, Embedder, EmbeddingHandle, SemanticScorer, SimilarityScores,
};
pub use text::{detect_keywords, preprocess, ContentElement, KeywordCoverage, TokenSet};

use crate::error::EvaluateError;
use crate::utils::log_model_error;

/// One-stop pipeline: preprocess, extract features, score the rubric,
/// attach similarity metadata and synthesize feedback. Holds the only
/// shared state (the embedding model, behind its worker thread); everything
/// per call is independently allocated.
pub struct Evaluator {
    semantic: Option<SemanticScorer>,
}

impl Evaluator {
    /// Spawns the real embedding worker. If the model cannot be loaded the
    /// evaluator still works, just without the similarity section.
    pub fn new() -> Self {
        Self::with_embedder(Box::new(EmbeddingHandle::spawn()))
    }

    pub fn with_embedder(embedder: Box<dyn Embedder>) -> Self {
        match SemanticScorer::new(embedder) {
            Ok(semantic) => Self {
                semantic: Some(semantic),
            },
            Err(e) => {
                log_model_error(&format!("Similarity disabled: {e}"));
                Self { semantic: None }
            }
        }
    }

    pub fn without_semantic() -> Self {
        Self { semantic: None }
    }

    pub fn evaluate(
        &self,
        transcript: &str,
        duration_seconds: f64,
    ) -> Result<ScoreReport, EvaluateError> {
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(EvaluateError::InvalidInput(format!(
                "duration must be a positive number of seconds, got {duration_seconds}"
            )));
        }

        let tokens = preprocess(transcript);
        let signals = ContentSignals {
            salutation_level: text::salutation_level(&tokens),
            coverage: text::detect_keywords(&tokens),
            tags: text::structure_tags(&tokens),
        };
        let features = extract_features(transcript, &tokens, duration_seconds);
        let scores = score_rubric(&tokens, &features, &signals);

        // Similarity is descriptive only; a model failure degrades the
        // report instead of aborting the call.
        let similarity = match &self.semantic {
            Some(semantic) => match semantic.similarities(&tokens.text) {
                Ok(sims) => Some(sims),
                Err(e) => {
                    log_model_error(&format!("Similarity skipped: {e}"));
                    None
                }
            },
            None => None,
        };

        let feedback = synthesize(&scores.sub_scores, &signals.coverage, scores.total);

        Ok(ScoreReport {
            sub_scores: scores.sub_scores,
            total: scores.total,
            content: scores.content,
            stats: TranscriptStats {
                word_count: tokens.word_count(),
                distinct_words: tokens.distinct_words,
                sentence_count: tokens.sentences.len(),
            },
            coverage: signals.coverage,
            features,
            similarity,
            feedback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    const SAMPLE: &str =
        "Hello everyone, my name is Arjun. I am 14 years old and I study in \
         class 9 at Sunrise Public School. I live in Bangalore with my parents \
         and my younger sister. In my free time, I enjoy playing football and \
         reading stories. Thank you for listening.";

    struct UnitEmbedder;

    impl Embedder for UnitEmbedder {
        fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            // deterministic direction derived from the text length
            let n = (text.len() % 7 + 1) as f32;
            Ok(vec![n, 1.0, 1.0 / n])
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Err(anyhow!("inference failed"))
        }
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let evaluator = Evaluator::without_semantic();
        for duration in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let result = evaluator.evaluate(SAMPLE, duration);
            assert!(matches!(result, Err(EvaluateError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_empty_transcript_is_legal() {
        let evaluator = Evaluator::without_semantic();
        let report = evaluator.evaluate("", 60.0).expect("empty must score");
        assert_eq!(report.stats.word_count, 0);
        assert_eq!(report.features.wpm, 0.0);
        assert_eq!(report.features.ttr, 0.0);
        assert_eq!(report.features.filler_rate, 0.0);
        assert_eq!(report.content.keywords, 0);
    }

    #[test]
    fn test_sub_scores_bounded_and_total_exact() {
        let evaluator = Evaluator::without_semantic();
        let report = evaluator.evaluate(SAMPLE, 60.0).expect("score");

        assert_eq!(report.sub_scores.len(), 5);
        for sub in &report.sub_scores {
            assert!(sub.points <= sub.possible);
        }
        let sum: u8 = report.sub_scores.iter().map(|s| s.points).sum();
        assert_eq!(report.total, sum);
        assert!(report.total <= 100);
    }

    #[test]
    fn test_wpm_boundary_through_pipeline() {
        let evaluator = Evaluator::without_semantic();

        let ideal = vec!["hello"; 111].join(" ");
        let report = evaluator.evaluate(&ideal, 60.0).expect("score");
        assert_eq!(report.features.wpm, 111.0);
        assert_eq!(report.sub_scores[1].points, 10);

        let slow = vec!["hello"; 110].join(" ");
        let report = evaluator.evaluate(&slow, 60.0).expect("score");
        assert_eq!(report.sub_scores[1].points, 6);
    }

    #[test]
    fn test_idempotent_reports() {
        let evaluator = Evaluator::with_embedder(Box::new(UnitEmbedder));
        let a = evaluator.evaluate(SAMPLE, 60.0).expect("first");
        let b = evaluator.evaluate(SAMPLE, 60.0).expect("second");
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_keyword_points_never_decrease_when_adding_element() {
        let evaluator = Evaluator::without_semantic();
        let without = "Hello everyone. I am 14 years old. Thank you.";
        let with = "Hello everyone. I am 14 years old. My name is Asha. Thank you.";

        let base = evaluator.evaluate(without, 60.0).expect("score");
        let extended = evaluator.evaluate(with, 60.0).expect("score");
        assert!(extended.content.keywords >= base.content.keywords);
    }

    #[test]
    fn test_clarity_never_increases_with_more_fillers() {
        let evaluator = Evaluator::without_semantic();
        let mut text = SAMPLE.to_string();
        let mut last = evaluator.evaluate(&text, 60.0).expect("score").sub_scores[3].points;

        for _ in 0..6 {
            text.push_str(" um uh like");
            let clarity = evaluator.evaluate(&text, 60.0).expect("score").sub_scores[3].points;
            assert!(clarity <= last);
            last = clarity;
        }
    }

    #[test]
    fn test_model_failure_degrades_gracefully() {
        let evaluator = Evaluator::with_embedder(Box::new(FailingEmbedder));
        let report = evaluator.evaluate(SAMPLE, 60.0).expect("must still score");

        assert!(report.similarity.is_none());
        assert_eq!(report.sub_scores.len(), 5);
        assert!(report.total > 0);
    }

    #[test]
    fn test_similarity_attached_when_embedder_works() {
        let evaluator = Evaluator::with_embedder(Box::new(UnitEmbedder));
        let report = evaluator.evaluate(SAMPLE, 60.0).expect("score");
        let sims = report.similarity.expect("similarity section");
        for value in [sims.content, sims.language, sims.clarity, sims.engagement] {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_report_serializes_to_json() {
        let evaluator = Evaluator::without_semantic();
        let report = evaluator.evaluate(SAMPLE, 60.0).expect("score");
        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json.get("total").is_some());
        assert!(json.get("sub_scores").is_some());
        assert!(json.get("feedback").is_some());
    }
}
