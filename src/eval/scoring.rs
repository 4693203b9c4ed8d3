//! Dot-product scoring primitives shared by the streaming evaluator and the reference path.
//!
//! Similarity is the raw inner product; embeddings are never normalized.

use crate::error::{Result, TopkEvalError};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Fail with `DimensionMismatch` unless `got == expected`.
pub fn check_width(context: &str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(TopkEvalError::dimension_mismatch(context, expected, got));
    }
    Ok(())
}

/// Validate a query batch against its true positives and return `(N, D)`.
///
/// Rejects an empty batch, since accuracy over zero queries is undefined.
pub fn check_query_pair(
    queries: &ArrayView2<f32>,
    true_positives: &ArrayView2<f32>,
) -> Result<(usize, usize)> {
    let (n, d) = queries.dim();
    if n == 0 {
        return Err(TopkEvalError::InvalidInput(
            "query batch must contain at least one query".to_string(),
        ));
    }
    check_width("true positive rows", n, true_positives.nrows())?;
    check_width("true positive embedding width", d, true_positives.ncols())?;
    Ok((n, d))
}

/// Inner product summed left to right.
///
/// Positive and candidate scores both go through this routine, so a candidate equal to a
/// true positive scores bit-identically to it.
pub(crate) fn dot(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Score of each query against its own true positive. Shapes must already match.
pub(crate) fn positive_scores(
    queries: &ArrayView2<f32>,
    true_positives: &ArrayView2<f32>,
) -> Array1<f32> {
    queries
        .rows()
        .into_iter()
        .zip(true_positives.rows())
        .map(|(q, t)| dot(q, t))
        .collect()
}

/// Scores of every query against every candidate in `batch` (N × B). Widths must already match.
pub(crate) fn candidate_scores(queries: &ArrayView2<f32>, batch: &ArrayView2<f32>) -> Array2<f32> {
    Array2::from_shape_fn((queries.nrows(), batch.nrows()), |(i, j)| {
        dot(queries.row(i), batch.row(j))
    })
}

/// For each row, how many scores are strictly greater than that row's positive.
///
/// Equal scores never count, so ties favor the positive.
pub fn count_higher(scores: &ArrayView2<f32>, positives: &ArrayView1<f32>) -> Vec<usize> {
    scores
        .rows()
        .into_iter()
        .zip(positives.iter())
        .map(|(row, &positive)| row.iter().filter(|&&s| s > positive).count())
        .collect()
}
