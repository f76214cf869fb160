//! Scores a transcribed self-introduction against a communication-skills
//! rubric: five banded sub-scores (Content & Structure, Speech Rate,
//! Language & Grammar, Clarity, Engagement) summed into a 0-100 total,
//! plus keyword coverage, sentence-embedding similarity metadata and
//! deterministic feedback.

pub mod error;
pub mod scoring;
pub mod settings;
pub mod utils;

pub use error::EvaluateError;
pub use scoring::{Evaluator, ScoreReport};
