//! Brute-force top-k candidate retrieval over a batched corpus.

use crate::error::{Result, TopkEvalError};
use crate::eval::scoring::{candidate_scores, check_width};
use ndarray::{Array2, ArrayView2};
use std::cmp::Ordering;

/// Top-k candidates per query: scores descending, with the candidate's position in the
/// concatenated corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct TopKCandidates {
    /// N × min(k, M) scores, best first.
    pub scores: Array2<f32>,
    /// N × min(k, M) global candidate indices, aligned with `scores`.
    pub indices: Array2<usize>,
}

impl TopKCandidates {
    /// 1-based position of candidate `id` in the retrieved list of query `row`.
    pub fn rank_of(&self, row: usize, id: usize) -> Option<usize> {
        self.indices
            .row(row)
            .iter()
            .position(|&candidate| candidate == id)
            .map(|pos| pos + 1)
    }
}

/// Brute-force top-k retrieval over a corpus that arrives in batches.
///
/// Only the running best `k` per query are kept, so memory stays at N × (k + batch size).
#[derive(Debug, Clone, Copy)]
pub struct StreamingTopK {
    k: usize,
}

/// Higher score first, NaN last, lower index on equal scores.
fn retrieval_order(a: &(f32, usize), b: &(f32, usize)) -> Ordering {
    match (a.0.is_nan(), b.0.is_nan()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => b
            .0
            .partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1)),
    }
}

impl StreamingTopK {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(TopkEvalError::InvalidInput(
                "retrieval k must be greater than 0".to_string(),
            ));
        }
        Ok(Self { k })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Score `queries` against every candidate batch and keep the best `k` per query.
    ///
    /// Candidate indices count rows across batches in arrival order.
    pub fn search<'c, I>(&self, queries: ArrayView2<f32>, candidates: I) -> Result<TopKCandidates>
    where
        I: IntoIterator<Item = ArrayView2<'c, f32>>,
    {
        let (n, d) = queries.dim();
        let mut best: Vec<Vec<(f32, usize)>> = vec![Vec::with_capacity(self.k); n];
        let mut offset = 0usize;

        for (batch_index, batch) in candidates.into_iter().enumerate() {
            check_width(&format!("candidate batch {}", batch_index), d, batch.ncols())?;
            if batch.nrows() == 0 {
                continue;
            }
            let scores = candidate_scores(&queries, &batch);
            for (kept, row) in best.iter_mut().zip(scores.rows()) {
                kept.extend(row.iter().enumerate().map(|(j, &s)| (s, offset + j)));
                kept.sort_by(retrieval_order);
                kept.truncate(self.k);
            }
            log::trace!(
                "Streaming top-{}: batch {} ({} candidates, offset {})",
                self.k,
                batch_index,
                batch.nrows(),
                offset
            );
            offset += batch.nrows();
        }

        let width = self.k.min(offset);
        let scores = Array2::from_shape_fn((n, width), |(i, j)| best[i][j].0);
        let indices = Array2::from_shape_fn((n, width), |(i, j)| best[i][j].1);
        log::debug!(
            "Streaming top-{} retrieved {} per query from {} candidates",
            self.k,
            width,
            offset
        );
        Ok(TopKCandidates { scores, indices })
    }
}
