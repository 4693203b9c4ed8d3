//! Splitting an in-memory candidate corpus into fixed-size batches.

use crate::error::{Result, TopkEvalError};
use ndarray::iter::AxisChunksIter;
use ndarray::{ArrayBase, Axis, Data, Ix2};

/// Row-wise batches of `corpus`, each at most `batch_size` rows; the last one may be shorter.
///
/// An empty corpus yields no batches.
pub fn batched<'a, S: Data<Elem = f32>>(
    corpus: &'a ArrayBase<S, Ix2>,
    batch_size: usize,
) -> Result<AxisChunksIter<'a, f32, Ix2>> {
    if batch_size == 0 {
        return Err(TopkEvalError::InvalidInput(
            "candidate batch size must be greater than 0".to_string(),
        ));
    }
    Ok(corpus.axis_chunks_iter(Axis(0), batch_size))
}
