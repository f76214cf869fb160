use anyhow::{anyhow, Result};
use rust_bert::pipelines::sentence_embeddings::{
    SentenceEmbeddingsBuilder, SentenceEmbeddingsModelType,
};
use serde::Serialize;
use simsimd::SpatialSimilarity;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::error::EvaluateError;
use crate::utils::{log_model_error, log_model_loaded, log_model_step};

/// The four high-level rubric criteria that get a semantic similarity
/// reading. Descriptive metadata only; never part of the numeric total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Criterion {
    #[strum(serialize = "content")]
    Content,
    #[strum(serialize = "language")]
    Language,
    #[strum(serialize = "clarity")]
    Clarity,
    #[strum(serialize = "engagement")]
    Engagement,
}

impl Criterion {
    /// Compiled-in "ideal" description the transcript is compared against.
    pub fn ideal_description(&self) -> &'static str {
        match self {
            Self::Content => {
                "A well-structured self introduction with a clear salutation, name, age, \
                 class or school, family background, hobbies or interests, and a closing \
                 thank you."
            }
            Self::Language => {
                "Clear, grammatically correct English with appropriate sentence structure \
                 and a reasonably varied vocabulary for a school student."
            }
            Self::Clarity => {
                "Fluent and easy to understand speech with minimal filler words, concise \
                 sentences, and ideas expressed in a straightforward way."
            }
            Self::Engagement => {
                "A positive, enthusiastic, and friendly tone that feels genuine and \
                 engaging, making the listener interested in the speaker."
            }
        }
    }
}

/// Cosine similarity of the transcript against each criterion description.
/// Raw values: floating-point noise can push them slightly outside [0, 1],
/// so display code should use [`SimilarityScores::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityScores {
    pub content: f64,
    pub language: f64,
    pub clarity: f64,
    pub engagement: f64,
}

impl SimilarityScores {
    pub fn clamped(&self) -> SimilarityScores {
        SimilarityScores {
            content: self.content.clamp(0.0, 1.0),
            language: self.language.clamp(0.0, 1.0),
            clarity: self.clarity.clamp(0.0, 1.0),
            engagement: self.engagement.clamp(0.0, 1.0),
        }
    }
}

/// Text to fixed-length vector. Injected into the scorer so tests can
/// substitute a stub for the real model.
pub trait Embedder: Send {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

struct EmbedRequest {
    text: String,
    response_tx: mpsc::Sender<Result<Vec<f32>, String>>,
}

/// Handle to a dedicated worker thread owning the sentence embedding model.
/// The model loads once on that thread and is read-only afterwards; requests
/// are serialized through the channel, so concurrent holders of a clone can
/// share it safely.
#[derive(Clone)]
pub struct EmbeddingHandle {
    request_tx: mpsc::Sender<EmbedRequest>,
}

impl EmbeddingHandle {
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<EmbedRequest>();

        thread::spawn(move || {
            if let Err(e) = run_embedding_worker(request_rx) {
                log_model_error(&format!("Embedding worker failed: {e}"));
            }
        });

        Self { request_tx }
    }
}

impl Embedder for EmbeddingHandle {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let (response_tx, response_rx) = mpsc::channel();

        self.request_tx
            .send(EmbedRequest {
                text: text.to_string(),
                response_tx,
            })
            .map_err(|_| anyhow!("embedding worker is gone"))?;

        response_rx
            .recv()
            .map_err(|_| anyhow!("embedding worker dropped the request"))?
            .map_err(|e| anyhow!(e))
    }
}

fn run_embedding_worker(request_rx: mpsc::Receiver<EmbedRequest>) -> Result<()> {
    log_model_step("Loading sentence embedding model...");
    let start = Instant::now();
    let model = SentenceEmbeddingsBuilder::remote(SentenceEmbeddingsModelType::AllMiniLmL6V2)
        .create_model()?;
    log_model_loaded(start.elapsed().as_secs_f32());

    for request in request_rx {
        let response = match model.encode(&[request.text.as_str()]) {
            Ok(mut embeddings) if !embeddings.is_empty() => Ok(embeddings.remove(0)),
            Ok(_) => Err("model returned an empty batch".to_string()),
            Err(e) => Err(e.to_string()),
        };
        let _ = request.response_tx.send(response);
    }

    Ok(())
}

/// Wraps an [`Embedder`] with memoized embeddings of the four criterion
/// descriptions, computed once at construction.
pub struct SemanticScorer {
    embedder: Box<dyn Embedder>,
    references: Vec<(Criterion, Vec<f32>)>,
}

impl SemanticScorer {
    pub fn new(embedder: Box<dyn Embedder>) -> Result<Self, EvaluateError> {
        let references = Criterion::iter()
            .map(|c| embedder.embed(c.ideal_description()).map(|emb| (c, emb)))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| EvaluateError::ModelUnavailable(e.to_string()))?;

        Ok(Self {
            embedder,
            references,
        })
    }

    /// Embeds the transcript once and compares it against every criterion.
    pub fn similarities(&self, text: &str) -> Result<SimilarityScores, EvaluateError> {
        let text_embedding = self
            .embedder
            .embed(text)
            .map_err(|e| EvaluateError::ModelUnavailable(e.to_string()))?;

        let similarity = |criterion: Criterion| {
            self.references
                .iter()
                .find(|(c, _)| *c == criterion)
                .map(|(_, emb)| cosine_similarity(&text_embedding, emb))
                .unwrap_or(0.0)
        };

        Ok(SimilarityScores {
            content: similarity(Criterion::Content),
            language: similarity(Criterion::Language),
            clarity: similarity(Criterion::Clarity),
            engagement: similarity(Criterion::Engagement),
        })
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    f32::cosine(a, b).map(|distance| 1.0 - distance).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Maps each known text to a fixed vector so similarities are exact.
    struct StubEmbedder;

    impl Embedder for StubEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text == Criterion::Content.ideal_description() {
                Ok(vec![1.0, 0.0, 0.0])
            } else if text == Criterion::Language.ideal_description() {
                Ok(vec![0.0, 1.0, 0.0])
            } else if text == Criterion::Clarity.ideal_description()
                || text == Criterion::Engagement.ideal_description()
            {
                Ok(vec![0.0, 0.0, 1.0])
            } else {
                Ok(vec![1.0, 0.0, 0.0])
            }
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(anyhow!("model not loaded"))
        }
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let v = vec![0.5, 0.5, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_scorer_with_stub() {
        let scorer = SemanticScorer::new(Box::new(StubEmbedder)).expect("stub scorer");
        let sims = scorer.similarities("hello everyone").expect("similarities");
        assert!((sims.content - 1.0).abs() < 1e-6);
        assert!(sims.language.abs() < 1e-6);
    }

    #[test]
    fn test_failing_embedder_is_model_unavailable() {
        let err = SemanticScorer::new(Box::new(FailingEmbedder)).err().expect("must fail");
        assert!(matches!(err, EvaluateError::ModelUnavailable(_)));
    }

    #[test]
    fn test_clamped_bounds_values() {
        let sims = SimilarityScores {
            content: 1.0000002,
            language: -0.01,
            clarity: 0.5,
            engagement: 0.9,
        };
        let clamped = sims.clamped();
        assert_eq!(clamped.content, 1.0);
        assert_eq!(clamped.language, 0.0);
        assert_eq!(clamped.clarity, 0.5);
        assert_eq!(clamped.engagement, 0.9);
    }
}
