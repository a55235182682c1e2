use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

/// A text embedding capability.
///
/// Implementations encode a whole batch in one call and must return exactly
/// one row per input text, in input order.
pub trait Embedder: Send + Sync {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, String>;
}

/// [`Embedder`] backed by a local fastembed ONNX model.
///
/// fastembed needs exclusive access while encoding, so concurrent callers
/// are serialized on an internal mutex.
pub struct FastEmbedder {
    model_name: String,
    model: Mutex<TextEmbedding>,
}

impl FastEmbedder {
    /// Loads (downloading on first use) the model registered under `model_name`.
    pub fn try_new(model_name: &str, show_download_progress: bool) -> Result<Self, String> {
        let model = model_from_name(model_name)
            .ok_or_else(|| format!("Unknown embedding model: {model_name}"))?;

        let embedder = TextEmbedding::try_new(
            InitOptions::new(model).with_show_download_progress(show_download_progress),
        )
        .map_err(|error| format!("Failed to initialize embedder {model_name}: {error:?}"))?;

        Ok(Self {
            model_name: model_name.to_string(),
            model: Mutex::new(embedder),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl Embedder for FastEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, String> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| format!("Embedding model {} is poisoned", self.model_name))?;

        model
            .embed(texts.to_vec(), None)
            .map_err(|error| format!("Failed to generate embeddings: {error:?}"))
    }
}

/// Map a sentence-transformers style model name onto a fastembed model.
pub fn model_from_name(name: &str) -> Option<EmbeddingModel> {
    let name = name.trim();
    let name = name
        .strip_prefix("sentence-transformers/")
        .or_else(|| name.strip_prefix("Qdrant/"))
        .or_else(|| name.strip_prefix("intfloat/"))
        .or_else(|| name.strip_prefix("BAAI/"))
        .unwrap_or(name);

    match name.to_ascii_lowercase().as_str() {
        "all-minilm-l6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Some(EmbeddingModel::AllMiniLML12V2),
        "paraphrase-multilingual-minilm-l12-v2" => Some(EmbeddingModel::ParaphraseMLMiniLML12V2),
        "multilingual-e5-small" => Some(EmbeddingModel::MultilingualE5Small),
        "multilingual-e5-large" => Some(EmbeddingModel::MultilingualE5Large),
        "bge-small-en-v1.5" => Some(EmbeddingModel::BGESmallENV15),
        _ => None,
    }
}

/// Euclidean norm, accumulated in `f64`.
pub(crate) fn vector_norm(vec: &[f32]) -> f64 {
    vec.iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity for vectors whose norms are already known.
///
/// Returns `0.0` when either norm is zero.
pub(crate) fn similarity_with_norms(a: &[f32], norm_a: f64, b: &[f32], norm_b: f64) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();

    (dot / (norm_a * norm_b)) as f32
}

/// Cosine similarity of two vectors, `0.0` if either has zero length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    similarity_with_norms(a, vector_norm(a), b, vector_norm(b))
}

/// Express a similarity score as a percentage rounded to two decimals.
pub fn round_percent(score: f32) -> f64 {
    (f64::from(score) * 10_000.0).round() / 100.0
}
