use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluateError {
    /// The caller-supplied inputs cannot be scored at all. Surfaced before
    /// any feature extraction runs; no partial report is produced.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The embedding model failed to load or failed inference. `evaluate`
    /// never returns this: similarity is descriptive only, so scoring
    /// degrades to a report without a similarity section. Callers driving
    /// the semantic adapter directly see it.
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// An unexpected failure in a component. Never silently produces a
    /// misleading score.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
