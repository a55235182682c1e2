//! Catalog-wide semantic similarity between external and internal courses.
//!
//! A [`SimilarityEngine`] embeds the whole internal catalog once when it is
//! built and keeps those vectors for its lifetime. Every later call only
//! embeds the incoming texts, in a single batch, and scores them against the
//! cached vectors. Reloading the catalog means building a new engine.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::course::{CourseMatch, CourseRecord, MatchCandidate, PairSimilarity};
use crate::errors::{MatchError, MatchResult};
use crate::processing::embedding::{Embedder, round_percent, similarity_with_norms, vector_norm};

/// Internal course codes and their embeddings, index-aligned.
#[derive(Default)]
struct InternalCache {
    codes: Vec<String>,
    embeddings: Vec<Vec<f32>>,
    norms: Vec<f64>,
    dimension: usize,
}

pub struct SimilarityEngine<E> {
    embedder: E,
    threshold: f32,
    cache: InternalCache,
}

impl<E: Embedder> SimilarityEngine<E> {
    /// Build an engine over `catalog`, embedding every internal course in one batch.
    ///
    /// `threshold` is the minimum cosine similarity for an exemption and must
    /// lie in `(0, 1]`. Catalog order is kept and decides how equal scores are
    /// ranked later on.
    pub fn new(embedder: E, threshold: f32, catalog: Vec<CourseRecord>) -> MatchResult<Self> {
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(MatchError::Configuration(format!(
                "similarity threshold must be within (0, 1], got {threshold}"
            )));
        }

        if catalog.is_empty() {
            return Err(MatchError::Configuration(
                "internal course catalog is empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(catalog.len());
        for course in &catalog {
            if !seen.insert(course.code.as_str()) {
                return Err(MatchError::Configuration(format!(
                    "duplicate internal course code {}",
                    course.code
                )));
            }
        }

        let (codes, texts): (Vec<String>, Vec<String>) = catalog
            .into_iter()
            .map(|course| (course.code, course.text))
            .unzip();

        let embeddings = encode_batch(&embedder, &texts, None)?;
        let dimension = embeddings.first().map(Vec::len).unwrap_or_default();
        let norms = embeddings.iter().map(|row| vector_norm(row)).collect();

        Ok(Self {
            embedder,
            threshold,
            cache: InternalCache {
                codes,
                embeddings,
                norms,
                dimension,
            },
        })
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Threshold as a rounded percentage, the unit candidates are compared in.
    pub fn threshold_percent(&self) -> f64 {
        round_percent(self.threshold)
    }

    /// Internal course codes in catalog order; column `j` of every
    /// [`auto_match`](Self::auto_match) row belongs to `internal_codes()[j]`.
    pub fn internal_codes(&self) -> &[String] {
        &self.cache.codes
    }

    pub fn dimension(&self) -> usize {
        self.cache.dimension
    }

    /// Score each external text against every internal course.
    ///
    /// Returns one row per text (in input order) with one cosine similarity
    /// per internal course (in catalog order).
    pub fn auto_match(&self, ext_texts: &[String]) -> MatchResult<Vec<Vec<f32>>> {
        if self.cache.codes.is_empty() || self.cache.embeddings.is_empty() {
            return Err(MatchError::Embedding(
                "internal embedding cache has not been built".to_string(),
            ));
        }

        if ext_texts.is_empty() {
            return Ok(Vec::new());
        }

        let ext_embeddings = encode_batch(&self.embedder, ext_texts, Some(self.cache.dimension))?;

        let matrix = ext_embeddings
            .iter()
            .map(|ext| {
                let ext_norm = vector_norm(ext);
                self.cache
                    .embeddings
                    .iter()
                    .zip(self.cache.norms.iter())
                    .map(|(int, &int_norm)| similarity_with_norms(ext, ext_norm, int, int_norm))
                    .collect()
            })
            .collect();

        Ok(matrix)
    }

    /// Run [`auto_match`](Self::auto_match) and rank the candidates of every
    /// external course against the engine threshold.
    pub fn match_courses(&self, externals: &[CourseRecord]) -> MatchResult<Vec<CourseMatch>> {
        let texts: Vec<String> = externals.iter().map(|course| course.text.clone()).collect();
        let matrix = self.auto_match(&texts)?;
        let threshold_percent = self.threshold_percent();

        Ok(externals
            .iter()
            .zip(matrix.iter())
            .map(|(course, row)| CourseMatch {
                ext_code: course.code.clone(),
                candidates: rank_candidates(row, &self.cache.codes, threshold_percent),
            })
            .collect())
    }

    /// Score ad-hoc text pairs, embedding all `2 * pairs.len()` texts in one batch.
    pub fn bulk_similarity(&self, pairs: &[(String, String)]) -> MatchResult<Vec<PairSimilarity>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let flat: Vec<String> = pairs
            .iter()
            .flat_map(|(a, b)| [a.clone(), b.clone()])
            .collect();
        let embeddings = encode_batch(&self.embedder, &flat, None)?;
        let threshold_percent = self.threshold_percent();

        Ok(embeddings
            .chunks_exact(2)
            .map(|pair| {
                let score = similarity_with_norms(
                    &pair[0],
                    vector_norm(&pair[0]),
                    &pair[1],
                    vector_norm(&pair[1]),
                );
                let percent = round_percent(score);
                PairSimilarity {
                    score,
                    percent,
                    exceeds_threshold: percent >= threshold_percent,
                }
            })
            .collect())
    }
}

/// Turn one similarity row into candidates sorted by percent, highest first.
///
/// Every internal code yields a candidate, exempt or not. Equal percents keep
/// the order of `internal_codes`. `sim_row` must hold exactly one score per
/// internal code.
pub fn rank_candidates(
    sim_row: &[f32],
    internal_codes: &[String],
    threshold_percent: f64,
) -> Vec<MatchCandidate> {
    debug_assert_eq!(
        sim_row.len(),
        internal_codes.len(),
        "similarity row and internal codes differ in length"
    );

    let mut candidates: Vec<MatchCandidate> = internal_codes
        .iter()
        .zip(sim_row.iter())
        .map(|(code, &score)| {
            let percent = round_percent(score);
            MatchCandidate {
                int_code: code.clone(),
                percent,
                exempt: percent >= threshold_percent,
            }
        })
        .collect();

    // `sort_by` is stable, which keeps ties in catalog order.
    candidates.sort_by(|a, b| {
        b.percent
            .partial_cmp(&a.percent)
            .unwrap_or(Ordering::Equal)
    });

    candidates
}

/// Encode `texts` and reject anything but one finite, non-empty row per text
/// with a single shared dimension.
fn encode_batch<E: Embedder>(
    embedder: &E,
    texts: &[String],
    expected_dimension: Option<usize>,
) -> MatchResult<Vec<Vec<f32>>> {
    let embeddings = embedder.encode(texts).map_err(MatchError::Embedding)?;

    if embeddings.len() != texts.len() {
        return Err(MatchError::Embedding(format!(
            "embedder returned {} rows for {} texts",
            embeddings.len(),
            texts.len()
        )));
    }

    let mut dimension = expected_dimension;
    for (index, row) in embeddings.iter().enumerate() {
        if row.is_empty() {
            return Err(MatchError::Embedding(format!(
                "embedder returned an empty vector for text {index}"
            )));
        }
        if row.iter().any(|value| !value.is_finite()) {
            return Err(MatchError::Embedding(format!(
                "embedder returned a non-finite vector for text {index}"
            )));
        }
        match dimension {
            Some(expected) if expected != row.len() => {
                return Err(MatchError::Embedding(format!(
                    "embedding for text {index} has dimension {}, expected {expected}",
                    row.len()
                )));
            }
            Some(_) => {}
            None => dimension = Some(row.len()),
        }
    }

    Ok(embeddings)
}
