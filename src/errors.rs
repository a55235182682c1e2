//! Error types shared by the matching engine.

use thiserror::Error;

/// Failures raised while building or querying a [`SimilarityEngine`].
///
/// [`SimilarityEngine`]: crate::processing::similarity::SimilarityEngine
#[derive(Debug, Error, PartialEq)]
pub enum MatchError {
    /// The engine cannot be built from the supplied catalog or settings.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The embedder failed or produced output the engine cannot trust.
    #[error("embedding error: {0}")]
    Embedding(String),
}

pub type MatchResult<T> = Result<T, MatchError>;
