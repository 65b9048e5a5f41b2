//! Similarity engine: brute-force cosine scan over an in-memory corpus.
//!
//! Pure computation — the caller fetches the corpus from storage first and
//! nothing is persisted afterward. At the scale this service is exposed at,
//! a linear scan beats maintaining an index.

use crate::errors::{FaceSearchError, Result};
use crate::vector;

/// A corpus entry that cleared the threshold.
#[derive(Debug, Clone)]
pub struct Scored<R> {
    pub record: R,
    pub similarity: f32,
}

/// Score `corpus` against `query`, keep entries at or above `threshold`,
/// and rank them by similarity descending. Ties keep corpus order (stable
/// sort), so repeated calls return identical orderings.
///
/// # Errors
///
/// - [`FaceSearchError::InvalidThreshold`] when `threshold` is outside
///   [0, 1], rejected before any scoring.
/// - [`FaceSearchError::DimensionMismatch`] when any corpus vector's length
///   differs from the query's. A mismatch means the stored data is corrupt;
///   skipping the entry would hide that, so the whole query fails.
pub fn rank<R: Clone>(
    query: &[f32],
    corpus: &[(R, Vec<f32>)],
    threshold: f32,
) -> Result<Vec<Scored<R>>> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(FaceSearchError::InvalidThreshold(threshold));
    }

    for (_, stored) in corpus {
        if stored.len() != query.len() {
            return Err(FaceSearchError::DimensionMismatch {
                expected: query.len(),
                actual: stored.len(),
            });
        }
    }

    let mut hits: Vec<Scored<R>> = corpus
        .iter()
        .filter_map(|(record, stored)| {
            let similarity = vector::cosine(query, stored);
            (similarity >= threshold).then(|| Scored {
                record: record.clone(),
                similarity,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(hits)
}
