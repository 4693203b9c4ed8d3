//! Brute-force reference: materialize the full score matrix and rank with `in_top_k`.
//!
//! Memory is N × (M + 1), so this is meant for verifying the streaming evaluator on small
//! corpora, not for production evaluation.

use crate::error::{Result, TopkEvalError};
use crate::eval::result::AccuracyResult;
use crate::eval::scoring::{candidate_scores, check_query_pair, check_width, positive_scores};
use ndarray::{concatenate, Array2, ArrayView2, Axis};

/// N × (M + 1) score matrix: column 0 is the positive score, columns 1..=M the corpus scores.
pub fn score_matrix(
    queries: ArrayView2<f32>,
    true_positives: ArrayView2<f32>,
    corpus: ArrayView2<f32>,
) -> Result<Array2<f32>> {
    let (_, d) = check_query_pair(&queries, &true_positives)?;
    check_width("corpus embedding width", d, corpus.ncols())?;

    let positives = positive_scores(&queries, &true_positives).insert_axis(Axis(1));
    let corpus_scores = candidate_scores(&queries, &corpus);
    concatenate(Axis(1), &[positives.view(), corpus_scores.view()])
        .map_err(|e| TopkEvalError::InvalidInput(e.to_string()))
}

/// Whether each row's `targets[i]` prediction is within the top `k` of that row.
///
/// A target is in the top k when its prediction is finite and fewer than `k` predictions in
/// the row are strictly greater. Predictions tied with the target never push it out.
pub fn in_top_k(predictions: ArrayView2<f32>, targets: &[usize], k: usize) -> Result<Vec<bool>> {
    check_width("in_top_k targets", predictions.nrows(), targets.len())?;
    let classes = predictions.ncols();

    predictions
        .rows()
        .into_iter()
        .zip(targets)
        .map(|(row, &target)| {
            if target >= classes {
                return Err(TopkEvalError::InvalidInput(format!(
                    "target {} out of range for {} classes",
                    target, classes
                )));
            }
            let target_score = row[target];
            if !target_score.is_finite() {
                return Ok(false);
            }
            let higher = row.iter().filter(|&&s| s > target_score).count();
            Ok(higher < k)
        })
        .collect()
}

/// Top-k accuracy for each of `ks`, computed over the full score matrix in one pass.
pub fn brute_force_accuracy(
    queries: ArrayView2<f32>,
    true_positives: ArrayView2<f32>,
    corpus: ArrayView2<f32>,
    ks: &[usize],
) -> Result<AccuracyResult> {
    let all_scores = score_matrix(queries, true_positives, corpus)?;
    let targets = vec![0usize; all_scores.nrows()];

    let mut entries = Vec::with_capacity(ks.len());
    for &k in ks {
        let hits = in_top_k(all_scores.view(), &targets, k)?;
        let hit_count = hits.iter().filter(|&&hit| hit).count();
        entries.push((k, hit_count as f64 / targets.len() as f64));
    }
    Ok(AccuracyResult::new(entries))
}
