//! Cosine-similarity ranking of stored embeddings.
//!
//! Records are anything that exposes an embedding through [`Embedded`].
//! Ranking never copies records; results borrow from the caller's slice.

use std::cmp::Ordering;

use thiserror::Error;
use tracing::debug;

/// Errors that can occur while ranking.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    /// A record's vector length differs from the query's.
    #[error("Dimension mismatch at record {index}: query has {expected} dimensions, record has {actual}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// A record carrying a precomputed embedding vector.
pub trait Embedded {
    fn embedding(&self) -> &[f32];
}

impl Embedded for Vec<f32> {
    fn embedding(&self) -> &[f32] {
        self
    }
}

impl<const N: usize> Embedded for [f32; N] {
    fn embedding(&self) -> &[f32] {
        self
    }
}

/// A record together with its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a, R> {
    pub record: &'a R,
    /// Position of the record in the input.
    pub index: usize,
    pub score: f32,
}

/// Cosine similarity of two vectors.
///
/// Returns `None` when the lengths differ. A zero-magnitude vector on either
/// side scores 0.0, as does any computation that ends up non-finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }

    // Accumulate in f64 so large or tiny f32 components neither overflow
    // nor flush to zero.
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if score.is_finite() {
        Some(score.clamp(-1.0, 1.0) as f32)
    } else {
        Some(0.0)
    }
}

/// Returns the `k` records most similar to `query`, best first.
///
/// Equal scores keep their input order. `k == 0` yields an empty result
/// without looking at the records; a `k` larger than the input returns every
/// record ranked.
pub fn rank<'a, R: Embedded>(
    query: &[f32],
    records: &'a [R],
    k: usize,
) -> Result<Vec<Ranked<'a, R>>, RankError> {
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut scored = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let vector = record.embedding();
        let score = cosine_similarity(query, vector).ok_or(RankError::DimensionMismatch {
            index,
            expected: query.len(),
            actual: vector.len(),
        })?;
        scored.push(Ranked {
            record,
            index,
            score,
        });
    }

    // Stable sort: ties stay in input order.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(k);

    debug!(
        records = records.len(),
        returned = scored.len(),
        dimensions = query.len(),
        "ranked records"
    );
    Ok(scored)
}
